//! Hiroba chat client.
//!
//! Connects to a chat room, sends lines typed at the prompt and renders room events.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval),
//! except when the token is rejected, the room does not exist or the room has ended.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-client -- --room <ROOM_ID> --token <JWT> --user alice
//! ```

use clap::Parser;
use hiroba_client::{ClientOptions, run_client};
use hiroba_shared::logger::{LogFormat, setup_logger};

#[derive(Parser, Debug)]
#[command(name = "hiroba-client")]
#[command(about = "CLI client for Hiroba chat rooms", long_about = None)]
struct Args {
    /// Server URL
    #[arg(short = 'u', long, env = "HIROBA_URL", default_value = "ws://127.0.0.1:8080")]
    url: String,

    /// Room ID to join
    #[arg(short = 'r', long, env = "HIROBA_ROOM")]
    room: String,

    /// Bearer token (see `hiroba-server --issue-token`)
    #[arg(short = 't', long, env = "HIROBA_TOKEN", hide_env_values = true)]
    token: String,

    /// Display name used for the prompt
    #[arg(short = 'n', long, default_value = "me")]
    user: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info", LogFormat::Pretty);

    let args = Args::parse();
    let options = ClientOptions {
        url: args.url,
        room: args.room,
        token: args.token,
        user: args.user,
    };

    if let Err(e) = run_client(options).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
