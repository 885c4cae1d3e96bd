//! HTTP / WebSocket ハンドラー

mod http;
mod websocket;

pub use http::{create_room, end_room, get_room_detail, get_rooms, health_check};
pub use websocket::connect_handler;

use axum::http::{HeaderMap, header::AUTHORIZATION};

/// `Authorization: Bearer <token>` からトークンを取り出す
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token() {
        // テスト項目: Bearer スキームのトークンだけが取り出される
        // given (前提条件):
        let mut bearer = HeaderMap::new();
        bearer.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        let mut basic = HeaderMap::new();
        basic.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        let mut empty = HeaderMap::new();
        empty.insert(AUTHORIZATION, HeaderValue::from_static("Bearer   "));

        // when (操作):
        // then (期待する結果):
        assert_eq!(bearer_token(&bearer), Some("abc.def"));
        assert_eq!(bearer_token(&basic), None);
        assert_eq!(bearer_token(&empty), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
