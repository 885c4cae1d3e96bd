//! Room レジストリ
//!
//! Room のメタデータ（Repository）と、稼働中の Room Coordinator の対応を管理する。
//! Coordinator は最初の接続時に起動し、Room の終了時に破棄する。

use std::{collections::HashMap, sync::Arc};

use hiroba_shared::time::Clock;
use tokio::sync::RwLock;

use crate::domain::{
    MessagePusher, Room, RoomId, RoomIdFactory, RoomListing, RoomName, RoomRepository, Timestamp,
    Username,
};

use super::{coordinator::RoomCoordinator, error::RegistryError};

pub struct RoomRegistry {
    coordinators: RwLock<HashMap<RoomId, Arc<RoomCoordinator>>>,
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    history_capacity: usize,
}

impl RoomRegistry {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        history_capacity: usize,
    ) -> Self {
        Self {
            coordinators: RwLock::new(HashMap::new()),
            repository,
            message_pusher,
            clock,
            history_capacity,
        }
    }

    /// 新しい Room を登録する（Coordinator はまだ起動しない）
    pub async fn create_room(
        &self,
        name: RoomName,
        created_by: Username,
    ) -> Result<RoomListing, RegistryError> {
        let listing = RoomListing {
            id: RoomIdFactory::generate(),
            name,
            created_by,
            created_at: Timestamp::new(self.clock.now_millis()),
        };
        self.repository.add_room(listing.clone()).await?;
        tracing::info!(
            "Room '{}' ({}) created by '{}'",
            listing.name.as_str(),
            listing.id,
            listing.created_by
        );
        Ok(listing)
    }

    pub async fn find_listing(&self, id: &RoomId) -> Option<RoomListing> {
        self.repository.find_room(id).await
    }

    pub async fn list_rooms(&self, limit: usize) -> Vec<RoomListing> {
        self.repository.list_rooms(limit).await
    }

    /// 稼働中の Coordinator を取得する（起動はしない）
    pub async fn live_coordinator(&self, id: &RoomId) -> Option<Arc<RoomCoordinator>> {
        self.coordinators.read().await.get(id).cloned()
    }

    /// Room の Coordinator を取得する。登録済みで未起動なら起動する。
    pub async fn resolve_room(&self, id: &RoomId) -> Result<Arc<RoomCoordinator>, RegistryError> {
        if let Some(coordinator) = self.live_coordinator(id).await {
            return Ok(coordinator);
        }

        // end_room と同じ書き込みロックの下で Repository を確認する
        let mut coordinators = self.coordinators.write().await;
        if let Some(coordinator) = coordinators.get(id) {
            return Ok(coordinator.clone());
        }
        let listing = self
            .repository
            .find_room(id)
            .await
            .ok_or_else(|| RegistryError::RoomNotFound(id.to_string()))?;

        let room = Room::new(
            listing.id.clone(),
            listing.name,
            listing.created_at,
            self.history_capacity,
        );
        let coordinator = Arc::new(RoomCoordinator::new(
            room,
            self.message_pusher.clone(),
            self.clock.clone(),
        ));
        coordinators.insert(listing.id, coordinator.clone());
        tracing::info!("Started coordinator for room '{}'", id);
        Ok(coordinator)
    }

    /// Room を終了し、一覧から削除する
    pub async fn end_room(&self, id: &RoomId) -> Result<RoomListing, RegistryError> {
        let mut coordinators = self.coordinators.write().await;
        let listing = self
            .repository
            .find_room(id)
            .await
            .ok_or_else(|| RegistryError::RoomNotFound(id.to_string()))?;
        self.repository.delete_room(id).await?;
        let coordinator = coordinators.remove(id);
        drop(coordinators);

        if let Some(coordinator) = coordinator {
            coordinator.end().await;
        }
        tracing::info!("Room '{}' ({}) removed", listing.name.as_str(), id);
        Ok(listing)
    }
}
