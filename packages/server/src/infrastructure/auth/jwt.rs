//! JWT（HS256）による CredentialVerifier 実装
//!
//! トークンの発行は開発・テスト用途のみ。ユーザー登録やログインは外部の認証サービスが担う。

use std::time::Duration;

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::{AuthError, CredentialVerifier, Username};

/// トークンのクレーム
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// ユーザー名
    pub sub: String,
    /// 有効期限（Unix 秒）
    pub exp: u64,
}

pub struct JwtCredentialVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtCredentialVerifier {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::default(),
        }
    }

    /// `username` 用のトークンを発行する
    pub fn issue(&self, username: &Username, ttl: Duration) -> Result<String, AuthError> {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        let claims = Claims {
            sub: username.as_str().to_string(),
            exp: now + ttl.as_secs(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::IssueFailed(e.to_string()))
    }
}

impl CredentialVerifier for JwtCredentialVerifier {
    fn verify(&self, credential: &str) -> Result<Username, AuthError> {
        let credential = credential.trim();
        if credential.is_empty() {
            return Err(AuthError::MissingCredential);
        }

        let token_data = decode::<Claims>(credential, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!("JWT verification failed: {}", e);
                AuthError::InvalidCredential(e.to_string())
            })?;

        Username::new(token_data.claims.sub).map_err(|e| AuthError::InvalidCredential(e.to_string()))
    }
}
