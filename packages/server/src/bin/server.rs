//! Hiroba chat server.
//!
//! Run with:
//! ```not_rust
//! HIROBA_JWT_SECRET=change-me-please-0123 cargo run --bin hiroba-server -- --default-room lobby
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3000 --jwt-secret ...
//! cargo run --bin hiroba-server -- --jwt-secret ... --issue-token alice
//! ```

use std::time::Duration;

use clap::Parser;
use hiroba_server::{
    config::{
        DEFAULT_HISTORY_CAPACITY, DEFAULT_HOST, DEFAULT_OUTBOUND_QUEUE_CAPACITY, DEFAULT_PORT,
        DEFAULT_ROOM_LIST_LIMIT, ServerConfig,
    },
    domain::{RoomName, Username},
    infrastructure::auth::JwtCredentialVerifier,
    ui::{AppState, Server},
};
use hiroba_shared::logger::{LogFormat, setup_logger};

/// 起動時に作成する Room の作成者
const SYSTEM_USER: &str = "hiroba";

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "Real-time chat room server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HIROBA_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "HIROBA_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Number of messages retained per room
    #[arg(long, env = "HIROBA_HISTORY_CAPACITY", default_value_t = DEFAULT_HISTORY_CAPACITY)]
    history_capacity: usize,

    /// Outbound frames buffered per connection before it is dropped
    #[arg(
        long,
        env = "HIROBA_OUTBOUND_QUEUE_CAPACITY",
        default_value_t = DEFAULT_OUTBOUND_QUEUE_CAPACITY
    )]
    outbound_queue_capacity: usize,

    /// Default number of rooms returned by GET /api/rooms
    #[arg(long, env = "HIROBA_ROOM_LIST_LIMIT", default_value_t = DEFAULT_ROOM_LIST_LIMIT)]
    room_list_limit: usize,

    /// HS256 secret used to verify bearer tokens
    #[arg(long, env = "HIROBA_JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// Create a room with this name at startup
    #[arg(long, env = "HIROBA_DEFAULT_ROOM")]
    default_room: Option<String>,

    /// Log output format (pretty or json)
    #[arg(long, env = "HIROBA_LOG_FORMAT", default_value = "pretty")]
    log_format: LogFormat,

    /// Print a token for USER (valid for 24 hours) and exit
    #[arg(long, value_name = "USER")]
    issue_token: Option<String>,
}

impl Args {
    fn to_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            history_capacity: self.history_capacity,
            outbound_queue_capacity: self.outbound_queue_capacity,
            room_list_limit: self.room_list_limit,
            jwt_secret: self.jwt_secret.clone(),
            default_room: self.default_room.clone(),
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info", args.log_format);

    let config = match args.to_config().validate() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };
    tracing::debug!("{:?}", config);

    if let Some(user) = &args.issue_token {
        issue_token(&config, user);
        return;
    }

    let state = AppState::new(&config);

    if let Some(name) = &config.default_room {
        let created = match (
            RoomName::new(name.clone()),
            Username::new(SYSTEM_USER.to_string()),
        ) {
            (Ok(name), Ok(creator)) => state
                .registry
                .create_room(name, creator)
                .await
                .map_err(|e| e.to_string()),
            (Err(e), _) | (_, Err(e)) => Err(e.to_string()),
        };
        match created {
            Ok(listing) => tracing::info!(
                "Default room '{}' created: {}",
                listing.name.as_str(),
                listing.id
            ),
            Err(e) => {
                tracing::error!("Failed to create default room: {}", e);
                std::process::exit(1);
            }
        }
    }

    if let Err(e) = Server::new(state).run(&config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

fn issue_token(config: &ServerConfig, user: &str) {
    let verifier = JwtCredentialVerifier::new(config.jwt_secret.as_bytes());
    let token = Username::new(user.to_string())
        .map_err(|e| e.to_string())
        .and_then(|username| {
            verifier
                .issue(&username, Duration::from_secs(24 * 60 * 60))
                .map_err(|e| e.to_string())
        });
    match token {
        Ok(token) => println!("{}", token),
        Err(e) => {
            tracing::error!("Failed to issue token: {}", e);
            std::process::exit(1);
        }
    }
}
