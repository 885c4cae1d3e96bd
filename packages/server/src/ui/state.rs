//! アプリケーション状態（依存関係の組み立て）

use std::sync::Arc;

use hiroba_shared::time::SystemClock;

use crate::{
    config::ServerConfig,
    infrastructure::{
        auth::JwtCredentialVerifier, message_pusher::WebSocketMessagePusher,
        repository::inmemory::InMemoryRoomRepository,
    },
    usecase::{
        ConnectionGate, CreateRoomUseCase, EndRoomUseCase, GetRoomDetailUseCase, GetRoomsUseCase,
        RoomRegistry,
    },
};

/// Shared application state
pub struct AppState {
    pub registry: Arc<RoomRegistry>,
    /// ConnectionGate（WebSocket 接続の認証と Room の確認）
    pub connection_gate: Arc<ConnectionGate>,
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    pub end_room_usecase: Arc<EndRoomUseCase>,
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// 接続ごとの送信キューの長さ
    pub outbound_queue_capacity: usize,
}

impl AppState {
    /// 設定から依存関係を組み立てる
    ///
    /// 1. Repository / MessagePusher / 認証
    /// 2. RoomRegistry
    /// 3. UseCase
    pub fn new(config: &ServerConfig) -> Self {
        let repository = Arc::new(InMemoryRoomRepository::new());
        let message_pusher = Arc::new(WebSocketMessagePusher::new());
        let verifier = Arc::new(JwtCredentialVerifier::new(config.jwt_secret.as_bytes()));

        let registry = Arc::new(RoomRegistry::new(
            repository,
            message_pusher,
            Arc::new(SystemClock),
            config.history_capacity,
        ));

        Self {
            connection_gate: Arc::new(ConnectionGate::new(verifier.clone(), registry.clone())),
            create_room_usecase: Arc::new(CreateRoomUseCase::new(
                verifier.clone(),
                registry.clone(),
            )),
            end_room_usecase: Arc::new(EndRoomUseCase::new(verifier, registry.clone())),
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(
                registry.clone(),
                config.room_list_limit,
            )),
            get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(registry.clone())),
            registry,
            outbound_queue_capacity: config.outbound_queue_capacity,
        }
    }
}
