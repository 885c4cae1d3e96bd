//! UseCase: Room 作成
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CreateRoomUseCase::execute() メソッド
//!
//! ### どのような状況を想定しているか
//! - 正常系：認証済みユーザーが Room を作成し、作成者として記録される
//! - 異常系：資格情報なし・不正、Room 名が空

use std::sync::Arc;

use crate::domain::{CredentialVerifier, RoomListing, RoomName};

use super::{error::CreateRoomError, registry::RoomRegistry};

/// Room 作成のユースケース
pub struct CreateRoomUseCase {
    verifier: Arc<dyn CredentialVerifier>,
    registry: Arc<RoomRegistry>,
}

impl CreateRoomUseCase {
    pub fn new(verifier: Arc<dyn CredentialVerifier>, registry: Arc<RoomRegistry>) -> Self {
        Self { verifier, registry }
    }

    /// Room 作成を実行
    ///
    /// # Arguments
    ///
    /// * `credential` - bearer トークン
    /// * `name` - Room 名（前後の空白は除去される）
    pub async fn execute(
        &self,
        credential: Option<&str>,
        name: String,
    ) -> Result<RoomListing, CreateRoomError> {
        let creator = credential
            .ok_or(CreateRoomError::Unauthenticated)
            .and_then(|c| {
                self.verifier
                    .verify(c)
                    .map_err(|_| CreateRoomError::Unauthenticated)
            })?;
        let name = RoomName::new(name)?;

        Ok(self.registry.create_room(name, creator).await?)
    }
}
