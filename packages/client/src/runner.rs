//! Client execution logic with reconnection support.

use std::time::Duration;

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

use crate::{domain::should_attempt_reconnect, error::ClientError};

use super::session::run_client_session;

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// 接続先と資格情報
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// サーバーの URL（例: `ws://127.0.0.1:8080`）
    pub url: String,
    pub room: String,
    /// bearer トークン
    pub token: String,
    /// プロンプトと自分のメッセージの判定に使う名前
    pub user: String,
}

/// Run the chat client with reconnection logic
pub async fn run_client(options: ClientOptions) -> Result<(), ClientError> {
    let mut input_rx = spawn_readline(options.user.clone());
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to room '{}' at {} (attempt {}/{})",
            options.room,
            options.url,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS + 1
        );

        match run_client_session(&options, &mut input_rx).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                return Ok(());
            }
            Err(ClientError::RoomEnded) => {
                tracing::info!("Room '{}' has ended", options.room);
                return Ok(());
            }
            Err(e) => {
                if !should_attempt_reconnect(&e, reconnect_count, MAX_RECONNECT_ATTEMPTS) {
                    return Err(e);
                }

                tracing::warn!("Connection lost: {}", e);
                reconnect_count += 1;
                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS + 1
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }
}

/// rustyline（同期 API）で標準入力を読むスレッドを起動する
///
/// 入力が終わるとチャネルが閉じる。再接続してもスレッドは 1 つのまま。
fn spawn_readline(user: String) -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", user);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}
