//! # NAS Connect Back-Office Library
//!
//! Command line front of the back-office. Parses arguments, loads the
//! configuration, builds the session and hands each command to
//! [`cli::execute`].
//!
//! ## Module Organization
//! ```text
//! nas_backoffice/
//! ├── lib.rs            ◄─── You are here (startup & run)
//! ├── cli.rs            ◄─── clap grammar, dispatch, interactive shell
//! ├── state/
//! │   ├── mod.rs        ◄─── AppState
//! │   ├── config.rs     ◄─── defaults → TOML → NAS_* environment
//! │   └── session.rs    ◄─── current role, route guard
//! ├── commands/         ◄─── one module per screen
//! └── error.rs          ◄─── ApiError for commands
//! ```
//!
//! ## Output
//! Results go to stdout (JSON, CSV or HTML). Logs go to stderr so that
//! stdout can be piped.

pub mod cli;
pub mod commands;
pub mod error;
pub mod state;

use clap::Parser;
use tracing::info;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use error::ApiError;
use state::{AppConfig, AppState};

/// Runs the back-office.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Initialize Logging                                                  │
/// │     • stderr, RUST_LOG or "info,nas=debug"                              │
/// │                                                                         │
/// │  2. Load Configuration                                                  │
/// │     • --config FILE, or the platform config directory                   │
/// │     • --role, --latency-ms, --empty override the file                   │
/// │                                                                         │
/// │  3. Build Session State                                                 │
/// │     • Store seeded around today, Api with latency, SessionState         │
/// │                                                                         │
/// │  4. Dispatch                                                            │
/// │     • one command, or the shell when none (or `shell`) is given         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> Result<(), ApiError> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let today = chrono::Local::now().date_naive();
    let state = AppState::new(config, today);
    info!(role = %state.session.role(), "Starting NAS Connect back-office");

    match cli.command {
        None | Some(Command::Shell) => cli::shell(&state).await,
        Some(command) => {
            let output = cli::execute(&state, command).await?;
            println!("{}", output.render());
            Ok(())
        }
    }
}

/// Configuration file plus command line overrides.
fn load_config(cli: &Cli) -> Result<AppConfig, ApiError> {
    let mut config = AppConfig::load(cli.config.clone())?;

    if let Some(role) = cli.role {
        config.session.role = role;
    }
    if let Some(ms) = cli.latency_ms {
        config.service.simulated_latency_ms = ms;
    }
    if cli.empty {
        config.service.seed_fixtures = false;
    }

    config.validate()?;
    Ok(config)
}

/// Filter used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "info,nas=debug";

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=nas_store=trace` - Show trace for the store only
/// - Default: INFO, DEBUG for the nas crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    subscriber(filter).init();
}

/// stderr subscriber gated by `filter` alone.
fn subscriber(filter: EnvFilter) -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nas_core::rules::navigation::Role;

    #[test]
    fn test_default_filter_is_honoured() {
        let subscriber = subscriber(EnvFilter::new(DEFAULT_LOG_FILTER));
        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(target: "nas_store::access", tracing::Level::DEBUG));
            assert!(!tracing::enabled!(target: "nas_store::access", tracing::Level::TRACE));
            assert!(tracing::enabled!(target: "tokio::runtime", tracing::Level::INFO));
            assert!(!tracing::enabled!(target: "tokio::runtime", tracing::Level::DEBUG));
        });
    }

    #[test]
    fn test_cli_overrides_config() {
        let path = std::env::temp_dir().join(format!("nas-overrides-{}.toml", std::process::id()));
        AppConfig::default().save(Some(path.clone())).unwrap();

        let cli = Cli::try_parse_from([
            "nas-backoffice",
            "--config",
            path.to_str().unwrap(),
            "--role",
            "kitchen",
            "--latency-ms",
            "0",
            "--empty",
            "dashboard",
        ])
        .unwrap();

        let config = load_config(&cli).unwrap();
        assert_eq!(config.session.role, Role::Kitchen);
        assert_eq!(config.service.simulated_latency_ms, 0);
        assert!(!config.service.seed_fixtures);
        std::fs::remove_file(path).unwrap();
    }
}
