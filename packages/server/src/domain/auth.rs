//! 認証サービスへのインターフェース
//!
//! 資格情報（bearer トークン）の形式や真正性の判定は実装側に委ねる。

use super::{AuthError, Username};

#[cfg_attr(test, mockall::automock)]
pub trait CredentialVerifier: Send + Sync {
    /// 資格情報を検証し、束縛するユーザー名を返す
    fn verify(&self, credential: &str) -> Result<Username, AuthError>;
}
