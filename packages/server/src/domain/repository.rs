//! Repository trait 定義
//!
//! Room 一覧（名前と ID の対応）を保持するメタデータストアへのインターフェース。
//! メッセージ配信には関与せず、Room の発見と作成・削除にだけ使われる。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{RepositoryError, RoomId, RoomListing};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Room のメタデータを追加
    async fn add_room(&self, listing: RoomListing) -> Result<(), RepositoryError>;

    /// ID で Room のメタデータを取得
    async fn find_room(&self, id: &RoomId) -> Option<RoomListing>;

    /// 作成日時の古い順に最大 `limit` 件を取得
    async fn list_rooms(&self, limit: usize) -> Vec<RoomListing>;

    /// Room のメタデータを削除
    async fn delete_room(&self, id: &RoomId) -> Result<(), RepositoryError>;
}
