//! UseCase: Room 終了
//!
//! Room を作成したユーザーだけが終了できる。
//! 接続中のメンバーには `ChatroomEnded` が届き、Room は一覧から消える。

use std::sync::Arc;

use crate::domain::{CredentialVerifier, RoomId};

use super::{
    error::{EndRoomError, RegistryError},
    registry::RoomRegistry,
};

pub struct EndRoomUseCase {
    verifier: Arc<dyn CredentialVerifier>,
    registry: Arc<RoomRegistry>,
}

impl EndRoomUseCase {
    pub fn new(verifier: Arc<dyn CredentialVerifier>, registry: Arc<RoomRegistry>) -> Self {
        Self { verifier, registry }
    }

    pub async fn execute(&self, credential: Option<&str>, room_id: &str) -> Result<(), EndRoomError> {
        let requester = credential
            .ok_or(EndRoomError::Unauthenticated)
            .and_then(|c| {
                self.verifier
                    .verify(c)
                    .map_err(|_| EndRoomError::Unauthenticated)
            })?;

        let not_found = || EndRoomError::RoomNotFound(room_id.to_string());
        let room_id = RoomId::new(room_id.to_string()).map_err(|_| not_found())?;
        let listing = self
            .registry
            .find_listing(&room_id)
            .await
            .ok_or_else(not_found)?;
        if listing.created_by != requester {
            tracing::info!(
                "'{}' tried to end room '{}' created by '{}'",
                requester,
                room_id,
                listing.created_by
            );
            return Err(EndRoomError::Forbidden(room_id.into_string()));
        }

        match self.registry.end_room(&room_id).await {
            Ok(_) => Ok(()),
            // 同時に終了された
            Err(RegistryError::RoomNotFound(_)) => Err(not_found()),
            Err(e) => Err(EndRoomError::Registry(e)),
        }
    }
}
