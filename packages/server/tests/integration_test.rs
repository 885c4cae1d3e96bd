//! Integration tests for the chat server.
//!
//! ルーターをプロセス内でエフェメラルポートに起動し、
//! reqwest（HTTP）と tokio-tungstenite（WebSocket）で操作する。

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use hiroba_server::{
    config::ServerConfig,
    domain::Username,
    infrastructure::{
        auth::JwtCredentialVerifier,
        dto::{
            http::RoomSummaryDto,
            websocket::{ChatMessageDto, ConnectionUpdateDto, OutboundEnvelope},
        },
    },
    ui::{AppState, build_router},
};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{Error as WsError, Message},
};

const SECRET: &str = "integration-test-secret";
const TIMEOUT: Duration = Duration::from_secs(5);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Helper struct to manage an in-process server
struct TestServer {
    addr: SocketAddr,
    verifier: JwtCredentialVerifier,
    http: reqwest::Client,
    task: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn start() -> Self {
        Self::start_with(ServerConfig::new(SECRET)).await
    }

    async fn start_with(config: ServerConfig) -> Self {
        let config = config.validate().unwrap();
        let state = Arc::new(AppState::new(&config));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            axum::serve(listener, build_router(state)).await.unwrap();
        });

        TestServer {
            addr,
            verifier: JwtCredentialVerifier::new(config.jwt_secret.as_bytes()),
            http: reqwest::Client::new(),
            task,
        }
    }

    fn token(&self, user: &str) -> String {
        self.verifier
            .issue(
                &Username::new(user.to_string()).unwrap(),
                Duration::from_secs(3600),
            )
            .unwrap()
    }

    fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    fn connect_url(&self, room_id: &str, user: &str) -> String {
        format!(
            "ws://{}/api/connect/{}?token={}",
            self.addr,
            room_id,
            self.token(user)
        )
    }

    async fn create_room(&self, creator: &str, name: &str) -> RoomSummaryDto {
        let response = self
            .http
            .post(self.http_url("/api/rooms"))
            .bearer_auth(self.token(creator))
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.unwrap()
    }

    async fn connect(&self, room_id: &str, user: &str) -> WsStream {
        let (ws, _) = connect_async(self.connect_url(room_id, user)).await.unwrap();
        ws
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// 次のテキストフレームを受け取ってデコードする
async fn next_envelope(ws: &mut WsStream) -> OutboundEnvelope {
    loop {
        let message = tokio::time::timeout(TIMEOUT, ws.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("stream ended")
            .expect("websocket error");
        if let Message::Text(text) = message {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

async fn send_chat(ws: &mut WsStream, user: &str, contents: &str) {
    let frame = serde_json::json!({
        "message_type": "NewMessage",
        "message": { "user": user, "contents": contents }
    });
    ws.send(Message::text(frame.to_string())).await.unwrap();
}

/// 接続がサーバーから閉じられるのを待つ
async fn expect_closed(ws: &mut WsStream) {
    let next = tokio::time::timeout(TIMEOUT, ws.next())
        .await
        .expect("timed out waiting for close");
    assert!(
        !matches!(next, Some(Ok(Message::Text(_)))),
        "expected close, got {:?}",
        next
    );
}

fn presence(count: usize, users: &[&str]) -> OutboundEnvelope {
    OutboundEnvelope::ConnectionUpdate(ConnectionUpdateDto {
        connection_count: count,
        online_users: users.iter().map(|u| u.to_string()).collect(),
    })
}

fn expect_history(envelope: OutboundEnvelope) -> Vec<ChatMessageDto> {
    match envelope {
        OutboundEnvelope::MessageHistory(h) => h.history,
        other => panic!("expected MessageHistory, got {:?}", other),
    }
}

fn expect_message(envelope: OutboundEnvelope) -> ChatMessageDto {
    match envelope {
        OutboundEnvelope::NewMessage(m) => m,
        other => panic!("expected NewMessage, got {:?}", other),
    }
}

#[tokio::test]
async fn test_chat_scenario() {
    // テスト項目: A 参加 → A 送信 → B 参加 → B 切断 で、A は履歴の後に 4 件のイベントを受け取る
    // given (前提条件):
    let server = TestServer::start().await;
    let room = server.create_room("alice", "general").await;
    let mut alice = server.connect(&room.id, "alice").await;
    assert!(expect_history(next_envelope(&mut alice).await).is_empty());

    // when (操作):
    send_chat(&mut alice, "alice", "Hello there").await;
    let first = next_envelope(&mut alice).await;
    let second = next_envelope(&mut alice).await;

    let mut bob = server.connect(&room.id, "bob").await;
    let bob_history = expect_history(next_envelope(&mut bob).await);
    let bob_presence = next_envelope(&mut bob).await;
    let third = next_envelope(&mut alice).await;

    bob.close(None).await.unwrap();
    let fourth = next_envelope(&mut alice).await;

    // then (期待する結果):
    assert_eq!(first, presence(1, &["alice"]));
    let message = expect_message(second);
    assert_eq!(message.user, "alice");
    assert_eq!(message.contents, "Hello there");
    assert_eq!(message.sequence, 1);
    assert_eq!(third, presence(2, &["alice", "bob"]));
    assert_eq!(fourth, presence(1, &["alice"]));

    assert_eq!(bob_history, vec![message]);
    assert_eq!(bob_presence, presence(2, &["alice", "bob"]));
}

#[tokio::test]
async fn test_author_is_authenticated_identity() {
    // テスト項目: クライアントが名乗ったユーザー名ではなく、認証済みのユーザー名が送信者になる
    // given (前提条件):
    let server = TestServer::start().await;
    let room = server.create_room("alice", "general").await;
    let mut alice = server.connect(&room.id, "alice").await;
    next_envelope(&mut alice).await;
    next_envelope(&mut alice).await;

    // when (操作):
    send_chat(&mut alice, "mallory", "who am I").await;

    // then (期待する結果):
    let message = expect_message(next_envelope(&mut alice).await);
    assert_eq!(message.user, "alice");
}

#[tokio::test]
async fn test_malformed_frames_are_dropped() {
    // テスト項目: 壊れたフレームは捨てられ、接続は維持される
    // given (前提条件):
    let server = TestServer::start().await;
    let room = server.create_room("alice", "general").await;
    let mut alice = server.connect(&room.id, "alice").await;
    next_envelope(&mut alice).await;
    next_envelope(&mut alice).await;

    // when (操作):
    alice.send(Message::text("not json")).await.unwrap();
    alice
        .send(Message::text(r#"{"message_type":"NewMessage","message":{}}"#))
        .await
        .unwrap();
    send_chat(&mut alice, "alice", "").await;
    send_chat(&mut alice, "alice", &"x".repeat(2001)).await;
    alice
        .send(Message::text(r#"{"message_type":"Typing","message":{}}"#))
        .await
        .unwrap();
    send_chat(&mut alice, "alice", "still here").await;

    // then (期待する結果):
    let message = expect_message(next_envelope(&mut alice).await);
    assert_eq!(message.contents, "still here");
    assert_eq!(message.sequence, 1);
}

#[tokio::test]
async fn test_connect_rejected_before_upgrade() {
    // テスト項目: 資格情報が不正なら 401、未知の Room なら 404 でアップグレード前に拒否される
    // given (前提条件):
    let server = TestServer::start().await;
    let room = server.create_room("alice", "general").await;

    // when (操作):
    let forged = connect_async(format!(
        "ws://{}/api/connect/{}?token=forged",
        server.addr, room.id
    ))
    .await;
    let missing = connect_async(format!("ws://{}/api/connect/{}", server.addr, room.id)).await;
    let unknown = connect_async(server.connect_url("no-such-room", "alice")).await;

    // then (期待する結果):
    for (result, expected) in [(forged, 401), (missing, 401), (unknown, 404)] {
        match result {
            Err(WsError::Http(response)) => assert_eq!(response.status().as_u16(), expected),
            other => panic!("expected HTTP {}, got {:?}", expected, other.map(|_| ())),
        }
    }
}

#[tokio::test]
async fn test_end_room_notifies_and_closes_connections() {
    // テスト項目: 作成者が Room を終了すると、接続中の全員に ChatroomEnded が届き接続が閉じる
    // given (前提条件):
    let server = TestServer::start().await;
    let room = server.create_room("alice", "general").await;
    let mut alice = server.connect(&room.id, "alice").await;
    let mut bob = server.connect(&room.id, "bob").await;
    for _ in 0..3 {
        next_envelope(&mut alice).await;
    }
    for _ in 0..2 {
        next_envelope(&mut bob).await;
    }

    // when (操作):
    let forbidden = server
        .http
        .delete(server.http_url(&format!("/api/rooms/{}", room.id)))
        .bearer_auth(server.token("bob"))
        .send()
        .await
        .unwrap();
    let ended = server
        .http
        .delete(server.http_url(&format!("/api/rooms/{}", room.id)))
        .bearer_auth(server.token("alice"))
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(forbidden.status(), reqwest::StatusCode::FORBIDDEN);
    assert_eq!(ended.status(), reqwest::StatusCode::NO_CONTENT);
    for ws in [&mut alice, &mut bob] {
        assert_eq!(next_envelope(ws).await, OutboundEnvelope::ChatroomEnded);
        expect_closed(ws).await;
    }

    let rejoin = connect_async(server.connect_url(&room.id, "alice")).await;
    assert!(matches!(rejoin, Err(WsError::Http(r)) if r.status().as_u16() == 404));
    let detail = server
        .http
        .get(server.http_url(&format!("/api/rooms/{}", room.id)))
        .send()
        .await
        .unwrap();
    assert_eq!(detail.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_http_room_api() {
    // テスト項目: Room の作成・一覧・詳細の HTTP API
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let health: serde_json::Value = server
        .http
        .get(server.http_url("/api/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let unauthenticated = server
        .http
        .post(server.http_url("/api/rooms"))
        .json(&serde_json::json!({ "name": "general" }))
        .send()
        .await
        .unwrap();
    let blank = server
        .http
        .post(server.http_url("/api/rooms"))
        .bearer_auth(server.token("alice"))
        .json(&serde_json::json!({ "name": "  " }))
        .send()
        .await
        .unwrap();
    let general = server.create_room("alice", "general").await;
    let random = server.create_room("bob", "random").await;
    let mut carol = server.connect(&general.id, "carol").await;
    next_envelope(&mut carol).await;
    next_envelope(&mut carol).await;

    let rooms: Vec<RoomSummaryDto> = server
        .http
        .get(server.http_url("/api/rooms"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let limited: Vec<RoomSummaryDto> = server
        .http
        .get(server.http_url("/api/rooms?limit=1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let detail: serde_json::Value = server
        .http
        .get(server.http_url(&format!("/api/rooms/{}", general.id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(health, serde_json::json!({ "status": "ok" }));
    assert_eq!(unauthenticated.status(), reqwest::StatusCode::UNAUTHORIZED);
    assert_eq!(blank.status(), reqwest::StatusCode::BAD_REQUEST);
    assert_eq!(rooms.len(), 2);
    assert!(rooms.contains(&general) && rooms.contains(&random));
    assert_eq!(limited.len(), 1);
    assert_eq!(detail["name"], "general");
    assert_eq!(detail["created_by"], "alice");
    assert_eq!(detail["connection_count"], 1);
    assert_eq!(detail["online_users"], serde_json::json!(["carol"]));
    assert_eq!(detail["history_length"], 0);
}

#[tokio::test]
async fn test_history_retention_limit() {
    // テスト項目: 後から参加した接続には、保持上限の件数の新しいメッセージだけが届く
    // given (前提条件):
    let server = TestServer::start_with(ServerConfig {
        history_capacity: 2,
        ..ServerConfig::new(SECRET)
    })
    .await;
    let room = server.create_room("alice", "general").await;
    let mut alice = server.connect(&room.id, "alice").await;
    next_envelope(&mut alice).await;
    next_envelope(&mut alice).await;
    for i in 1..=3 {
        send_chat(&mut alice, "alice", &format!("message {}", i)).await;
        next_envelope(&mut alice).await;
    }

    // when (操作):
    let mut bob = server.connect(&room.id, "bob").await;

    // then (期待する結果):
    let history = expect_history(next_envelope(&mut bob).await);
    let contents: Vec<&str> = history.iter().map(|m| m.contents.as_str()).collect();
    assert_eq!(contents, vec!["message 2", "message 3"]);
}
