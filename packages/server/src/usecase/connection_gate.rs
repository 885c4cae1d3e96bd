//! Connection Gate
//!
//! 接続要求を Room に渡す前に、資格情報と Room の状態を確認する。
//! 資格情報の確認が先。未認証の要求には Room の有無を明かさない。

use std::sync::Arc;

use crate::domain::{CredentialVerifier, RoomId, Username};

use super::{coordinator::RoomCoordinator, error::AdmissionError, registry::RoomRegistry};

/// 受け入れられた接続
///
/// `identity` は接続の間ずっと固定で、送信者名は常にこの値になる。
pub struct Admission {
    pub identity: Username,
    pub room: Arc<RoomCoordinator>,
}

pub struct ConnectionGate {
    verifier: Arc<dyn CredentialVerifier>,
    registry: Arc<RoomRegistry>,
}

impl ConnectionGate {
    pub fn new(verifier: Arc<dyn CredentialVerifier>, registry: Arc<RoomRegistry>) -> Self {
        Self { verifier, registry }
    }

    pub async fn admit(
        &self,
        room_id: &str,
        credential: Option<&str>,
    ) -> Result<Admission, AdmissionError> {
        let Some(credential) = credential else {
            tracing::warn!("Rejected connection to room '{}': no credential", room_id);
            return Err(AdmissionError::Unauthenticated);
        };
        let identity = self.verifier.verify(credential).map_err(|e| {
            tracing::warn!("Rejected connection to room '{}': {}", room_id, e);
            AdmissionError::Unauthenticated
        })?;

        let room_id =
            RoomId::new(room_id.to_string()).map_err(|_| AdmissionError::RoomUnavailable)?;
        let room = self.registry.resolve_room(&room_id).await.map_err(|e| {
            tracing::warn!("Rejected '{}': {}", identity, e);
            AdmissionError::RoomUnavailable
        })?;
        if !room.is_active().await {
            tracing::warn!("Rejected '{}': room '{}' has ended", identity, room_id);
            return Err(AdmissionError::RoomUnavailable);
        }

        Ok(Admission { identity, room })
    }
}
