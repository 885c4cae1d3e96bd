//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use hiroba_server::infrastructure::dto::websocket::{
    ClientFrame, ClientMessageDto, OutboundEnvelope,
};
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{
        Error as WsError, Message,
        client::IntoClientRequest,
        handshake::client::Request,
        http::{HeaderValue, StatusCode, header::AUTHORIZATION},
    },
};

use crate::{
    domain::{ChatView, ViewChange},
    error::ClientError,
    runner::ClientOptions,
};

use super::{formatter::MessageFormatter, ui::redisplay_prompt};

/// Run the WebSocket client session
///
/// 入力が終わった（Ctrl+D / Ctrl+C）場合は `Ok(())`。
/// Room の終了・切断はエラーとして返し、再接続するかは呼び出し側が決める。
pub async fn run_client_session(
    options: &ClientOptions,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let request = build_request(options)?;
    let (ws_stream, _response) = connect_async(request)
        .await
        .map_err(|e| classify_connect_error(e, &options.room))?;

    tracing::info!("Connected to room '{}'", options.room);
    println!(
        "\nYou are '{}'. Type messages and press Enter to send. Press Ctrl+D to exit.\n",
        options.user
    );

    let (mut write, mut read) = ws_stream.split();

    // Spawn a task to handle incoming messages
    let me = options.user.clone();
    let mut read_task = tokio::spawn(async move {
        let mut view = ChatView::new();

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    match serde_json::from_str::<OutboundEnvelope>(text.as_str()) {
                        Ok(envelope) => print!("{}", render(&mut view, &envelope, &me)),
                        Err(_) => print!("{}", MessageFormatter::format_raw_message(&text)),
                    }
                    if view.ended {
                        return ClientError::RoomEnded;
                    }
                    redisplay_prompt(&me);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    return ClientError::ConnectionError("Server closed the connection".into());
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    return ClientError::ConnectionError(e.to_string());
                }
                _ => {}
            }
        }

        ClientError::ConnectionError("Connection lost".to_string())
    });

    loop {
        tokio::select! {
            result = &mut read_task => {
                return Err(result.unwrap_or_else(|e| ClientError::ConnectionError(e.to_string())));
            }
            line = input_rx.recv() => {
                let Some(contents) = line else {
                    // 入力の終了
                    read_task.abort();
                    write.send(Message::Close(None)).await.ok();
                    return Ok(());
                };

                let frame = ClientFrame::NewMessage(ClientMessageDto {
                    user: options.user.clone(),
                    contents,
                });
                let json = match serde_json::to_string(&frame) {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!("Failed to serialize message: {}", e);
                        continue;
                    }
                };

                if let Err(e) = write.send(Message::text(json)).await {
                    tracing::warn!("Failed to send message: {}", e);
                    read_task.abort();
                    return Err(ClientError::ConnectionError(e.to_string()));
                }
            }
        }
    }
}

/// 接続先 `{url}/api/connect/{room}` へのリクエスト（`Authorization: Bearer`）を作る
fn build_request(options: &ClientOptions) -> Result<Request, ClientError> {
    let url = format!(
        "{}/api/connect/{}",
        options.url.trim_end_matches('/'),
        options.room
    );
    let mut request = url
        .into_client_request()
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    let authorization = HeaderValue::from_str(&format!("Bearer {}", options.token))
        .map_err(|_| ClientError::Unauthenticated)?;
    request.headers_mut().insert(AUTHORIZATION, authorization);
    Ok(request)
}

fn classify_connect_error(error: WsError, room: &str) -> ClientError {
    if let WsError::Http(response) = &error {
        match response.status() {
            StatusCode::UNAUTHORIZED => return ClientError::Unauthenticated,
            StatusCode::NOT_FOUND => return ClientError::RoomUnavailable(room.to_string()),
            _ => {}
        }
    }
    ClientError::ConnectionError(error.to_string())
}

/// イベントを表示状態に反映し、表示する文字列を返す
fn render(view: &mut ChatView, envelope: &OutboundEnvelope, me: &str) -> String {
    match view.apply(envelope) {
        ViewChange::HistoryReplaced(_) => MessageFormatter::format_history(&view.messages, me),
        ViewChange::MessageAppended => view
            .last_message()
            .map(|message| MessageFormatter::format_chat_message(message, me))
            .unwrap_or_default(),
        ViewChange::PresenceChanged => {
            MessageFormatter::format_presence(view.connection_count, &view.online_users, me)
        }
        ViewChange::Ended => MessageFormatter::format_room_ended(),
    }
}
