use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Replays chat messages through the subscription tracker and prints the replies.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Inbound messages CSV file (`user,text`). Reads stdin when omitted.
    pub input: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "SUBTRACK_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Log filter directive, e.g. `info` or `subtrack=debug`. `RUST_LOG` wins if set.
    #[arg(long, env = "SUBTRACK_LOG", default_value = "info")]
    pub log_level: String,
}

/// Installs the global tracing subscriber. Logs go to stderr so stdout only
/// carries replies.
pub fn subscribe_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false),
        )
        .with(filter)
        .init();
}
