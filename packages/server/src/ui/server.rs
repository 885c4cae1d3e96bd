//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::{
    handler::{
        connect_handler, create_room, end_room, get_room_detail, get_rooms, health_check,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// ルーターを組み立てる
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // WebSocket エンドポイント
        .route("/api/connect/{room_id}", get(connect_handler))
        // HTTP エンドポイント
        .route("/api/health", get(health_check))
        .route("/api/rooms", post(create_room).get(get_rooms))
        .route("/api/rooms/{room_id}", get(get_room_detail).delete(end_room))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// WebSocket chat server
///
/// ```ignore
/// let state = AppState::new(&config);
/// Server::new(state).run(&config.host, config.port).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Run the chat server until Ctrl+C / SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Chat server listening on {}", local_addr);
        tracing::info!("Connect to: ws://{}/api/connect/{{room_id}}", local_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, build_router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}
