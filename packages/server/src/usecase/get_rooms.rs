//! UseCase: Room 一覧・詳細の取得

use std::sync::Arc;

use crate::domain::{PresenceSnapshot, RoomId, RoomListing};

use super::{error::GetRoomDetailError, registry::RoomRegistry};

/// Room 一覧取得のユースケース
pub struct GetRoomsUseCase {
    registry: Arc<RoomRegistry>,
    default_limit: usize,
}

impl GetRoomsUseCase {
    pub fn new(registry: Arc<RoomRegistry>, default_limit: usize) -> Self {
        Self {
            registry,
            default_limit,
        }
    }

    /// `limit` が未指定・0 の場合は既定の件数を使う
    pub async fn execute(&self, limit: Option<usize>) -> Vec<RoomListing> {
        let limit = limit.filter(|l| *l > 0).unwrap_or(self.default_limit);
        self.registry.list_rooms(limit).await
    }
}

/// Room 詳細
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomDetail {
    pub listing: RoomListing,
    pub presence: PresenceSnapshot,
    pub history_length: usize,
}

/// Room 詳細取得のユースケース
///
/// Coordinator が未起動の Room は、接続 0・履歴 0 として返す。
pub struct GetRoomDetailUseCase {
    registry: Arc<RoomRegistry>,
}

impl GetRoomDetailUseCase {
    pub fn new(registry: Arc<RoomRegistry>) -> Self {
        Self { registry }
    }

    pub async fn execute(&self, room_id: &str) -> Result<RoomDetail, GetRoomDetailError> {
        let room_id =
            RoomId::new(room_id.to_string()).map_err(|_| GetRoomDetailError::RoomNotFound)?;
        let listing = self
            .registry
            .find_listing(&room_id)
            .await
            .ok_or(GetRoomDetailError::RoomNotFound)?;

        let (presence, history_length) = match self.registry.live_coordinator(&room_id).await {
            Some(coordinator) => {
                let overview = coordinator.overview().await;
                (overview.presence, overview.history_length)
            }
            None => (PresenceSnapshot::default(), 0),
        };

        Ok(RoomDetail {
            listing,
            presence,
            history_length,
        })
    }
}
