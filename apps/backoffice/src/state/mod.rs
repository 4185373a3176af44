//! # State Module
//!
//! Everything a command needs, built once at startup.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  AppConfig::load(--config)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐    │
//! │  │      Api         │ │   SessionState   │ │     AppConfig        │    │
//! │  │                  │ │                  │ │                      │    │
//! │  │  Store (seeded)  │ │  Arc<Mutex<      │ │  check-in hour       │    │
//! │  │  query cache     │ │    Session       │ │  invoice prefix      │    │
//! │  │  latency, clock  │ │  >>              │ │  latency             │    │
//! │  └──────────────────┘ └──────────────────┘ └──────────────────────┘    │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Api: the store sits behind a tokio RwLock, the cache behind a Mutex │
//! │  • SessionState: Arc<Mutex<T>>, changed by `role`                      │
//! │  • AppConfig: read-only after startup                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod session;

pub use config::{
    AppConfig, BusinessSettings, ConfigError, ConfigResult, ServiceSettings, SessionSettings,
};
pub use session::{Session, SessionState};

use chrono::NaiveDate;
use tracing::info;

use nas_store::{Api, Store};

/// State shared by every command of a session.
#[derive(Clone)]
pub struct AppState {
    pub api: Api,
    pub session: SessionState,
    pub config: AppConfig,
}

impl AppState {
    /// Builds the session from `config`. The demo data is placed around
    /// `today`.
    pub fn new(config: AppConfig, today: NaiveDate) -> Self {
        let store = if config.service.seed_fixtures {
            Store::seeded(config.store_config(), today)
        } else {
            Store::new(config.store_config())
        };
        let api = Api::new(store).with_latency(config.latency());
        let session = SessionState::new(config.session.role, config.session.user_name.clone());

        info!(
            role = %config.session.role,
            seeded = config.service.seed_fixtures,
            latency_ms = config.service.simulated_latency_ms,
            "Session state initialized"
        );
        AppState {
            api,
            session,
            config,
        }
    }
}
