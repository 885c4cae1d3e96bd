//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ## 技術的負債
//!
//! プロセスを再起動すると Room 一覧は失われます。永続化が必要になったら
//! SQLite などの実装を追加し、`RoomListing` との変換層を設けること。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{RepositoryError, RoomId, RoomListing, RoomRepository};

/// インメモリ Room Repository 実装
#[derive(Default)]
pub struct InMemoryRoomRepository {
    /// Key: RoomId, Value: Room のメタデータ
    rooms: Mutex<HashMap<RoomId, RoomListing>>,
}

impl InMemoryRoomRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn add_room(&self, listing: RoomListing) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        if rooms.contains_key(&listing.id) {
            return Err(RepositoryError::DuplicateRoom(listing.id.into_string()));
        }
        rooms.insert(listing.id.clone(), listing);
        Ok(())
    }

    async fn find_room(&self, id: &RoomId) -> Option<RoomListing> {
        let rooms = self.rooms.lock().await;
        rooms.get(id).cloned()
    }

    async fn list_rooms(&self, limit: usize) -> Vec<RoomListing> {
        let rooms = self.rooms.lock().await;
        let mut listings: Vec<RoomListing> = rooms.values().cloned().collect();
        listings.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        listings.truncate(limit);
        listings
    }

    async fn delete_room(&self, id: &RoomId) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        rooms
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::RoomNotFound(id.as_str().to_string()))
    }
}
