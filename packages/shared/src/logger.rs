//! Logging setup utilities for the Hiroba binaries.

use std::{fmt, str::FromStr};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Output format of the `fmt` layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable, ANSI coloured
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "unknown log format '{}' (expected 'pretty' or 'json')",
                other
            )),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => f.write_str("pretty"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Build the default filter directive used when `RUST_LOG` is not set.
///
/// Both the library crates and the binary log at `default_log_level`.
pub fn default_directive(binary_name: &str, default_log_level: &str) -> String {
    format!(
        "hiroba_server={level},hiroba_client={level},hiroba_shared={level},{bin}={level},tower_http={level}",
        level = default_log_level,
        bin = binary_name.replace('-', "_"),
    )
}

/// Initialize the tracing subscriber.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Examples
///
/// ```no_run
/// use hiroba_shared::logger::{LogFormat, setup_logger};
///
/// setup_logger("hiroba-server", "debug", LogFormat::Pretty);
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str, format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directive(binary_name, default_log_level).into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(false))
            .init(),
    }
}
