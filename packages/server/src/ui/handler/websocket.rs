//! WebSocket connection handlers (Client Session Adapter).
//!
//! 1 接続につき 2 つのタスクを動かす。
//! - 受信タスク: フレームをデコードして Coordinator の `send` を呼ぶ
//! - 送信タスク（`pusher_loop`）: 送信キューのフレームをソケットに書き込む
//!
//! どちらかが終わった時点で接続は終わり、`leave` をちょうど 1 回呼ぶ。

use std::sync::Arc;

use axum::{
    extract::{
        Path, Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, Username},
    infrastructure::dto::websocket::{InboundFrame, decode_inbound_frame},
    ui::state::AppState,
    usecase::{Admission, AdmissionError, RoomCoordinator},
};

use super::bearer_token;

/// Query parameters for WebSocket connection
///
/// ブラウザの WebSocket API はヘッダーを付けられないため、クエリでもトークンを受け付ける。
#[derive(Debug, Default, Deserialize)]
pub struct ConnectQuery {
    pub token: Option<String>,
}

/// 資格情報を取り出す（`Authorization` ヘッダーを優先）
fn extract_credential<'a>(headers: &'a HeaderMap, query: &'a ConnectQuery) -> Option<&'a str> {
    bearer_token(headers).or_else(|| {
        query
            .token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    })
}

/// GET /api/connect/{room_id}
///
/// Connection Gate を通過した場合だけアップグレードする。
pub async fn connect_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Query(query): Query<ConnectQuery>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, StatusCode> {
    let admission = state
        .connection_gate
        .admit(&room_id, extract_credential(&headers, &query))
        .await
        .map_err(|e| match e {
            AdmissionError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AdmissionError::RoomUnavailable => StatusCode::NOT_FOUND,
        })?;

    let queue_capacity = state.outbound_queue_capacity;
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, admission, queue_capacity)))
}

/// 送信キューのフレームを WebSocket に書き込むタスク
///
/// Coordinator がキューを閉じた（退出・Room 終了）ら、残りを書き切ってから Close フレームを送る。
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
    connection_id: ConnectionId,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if let Err(e) = sender.send(Message::Text(frame.into())).await {
                tracing::debug!("Failed to write to '{}': {}", connection_id, e);
                return;
            }
        }
        tracing::debug!("Outbound queue for '{}' closed", connection_id);
        if let Err(e) = sender.send(Message::Close(None)).await {
            tracing::debug!("Failed to send close frame to '{}': {}", connection_id, e);
        }
    })
}

/// クライアントからのフレームを読み続けるタスク
fn receive_loop(
    mut receiver: SplitStream<WebSocket>,
    room: Arc<RoomCoordinator>,
    connection_id: ConnectionId,
    identity: Username,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_text_frame(&room, &connection_id, &identity, text.as_str()).await
                }
                Message::Binary(_) => {
                    tracing::debug!("Ignoring binary frame from '{}'", connection_id);
                }
                Message::Close(_) => {
                    tracing::info!("'{}' ({}) requested close", identity, connection_id);
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                _ => {}
            }
        }
    })
}

async fn handle_text_frame(
    room: &RoomCoordinator,
    connection_id: &ConnectionId,
    identity: &Username,
    text: &str,
) {
    let (contents, claimed_user) = match decode_inbound_frame(text) {
        Ok(Some(InboundFrame::SendMessage {
            contents,
            claimed_user,
        })) => (contents, claimed_user),
        Ok(None) => {
            tracing::debug!("Ignoring unsupported frame from '{}'", connection_id);
            return;
        }
        Err(e) => {
            tracing::warn!("Dropping malformed frame from '{}': {}", identity, e);
            return;
        }
    };

    if let Some(claimed) = claimed_user.filter(|claimed| claimed != identity.as_str()) {
        tracing::debug!(
            "Ignoring claimed user '{}' from '{}' ({})",
            claimed,
            identity,
            connection_id
        );
    }

    if let Err(e) = room.send(connection_id, contents).await {
        tracing::debug!("Message from '{}' was not accepted: {}", identity, e);
    }
}

async fn handle_socket(socket: WebSocket, admission: Admission, queue_capacity: usize) {
    let Admission { identity, room } = admission;
    let connection_id = ConnectionId::generate();
    let (sender, receiver) = socket.split();

    // join 中に積まれる履歴を書き出せるよう、送信タスクを先に起動する
    let (tx, rx) = mpsc::channel(queue_capacity);
    let mut send_task = pusher_loop(rx, sender, connection_id);

    if let Err(e) = room.join(connection_id, identity.clone(), tx).await {
        // キューは join の中で破棄されているので、送信タスクは Close を送って終わる
        tracing::warn!(
            "'{}' could not join room '{}': {}",
            identity,
            room.room_id(),
            e
        );
        if let Err(e) = send_task.await {
            tracing::debug!("Writer task for '{}' failed: {}", connection_id, e);
        }
        return;
    }

    let mut recv_task = receive_loop(receiver, room.clone(), connection_id, identity.clone());

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    room.leave(&connection_id).await;
    tracing::debug!("Session for '{}' ({}) finished", identity, connection_id);
}
