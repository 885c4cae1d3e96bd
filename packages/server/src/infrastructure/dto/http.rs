//! HTTP API の DTO

use serde::{Deserialize, Serialize};

/// GET /api/rooms のクエリ
#[derive(Debug, Default, Deserialize)]
pub struct ListRoomsQuery {
    pub limit: Option<usize>,
}

/// POST /api/rooms のリクエストボディ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    pub name: String,
}

/// Room 一覧の要素、および作成時のレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    pub name: String,
}

/// GET /api/rooms/{room_id} のレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub name: String,
    pub created_by: String,
    /// RFC 3339 (JST)
    pub created_at: String,
    pub connection_count: usize,
    pub online_users: Vec<String>,
    pub history_length: usize,
}
