//! 認証サービスの実装

pub mod jwt;

pub use jwt::JwtCredentialVerifier;
