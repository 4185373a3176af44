//! # Config Commands
//!
//! Shows the configuration and writes a starter file.

use std::path::PathBuf;
use tracing::debug;

use super::routes;
use crate::error::ApiError;
use crate::state::{AppConfig, AppState};

/// Gets the configuration of the session.
pub fn get_config(state: &AppState) -> Result<AppConfig, ApiError> {
    debug!("get_config command");
    state.session.require(routes::SETTINGS)?;
    Ok(state.config.clone())
}

/// Writes the session's configuration to `path` (or the default location)
/// and returns where it went.
pub fn init_config(state: &AppState, path: Option<PathBuf>) -> Result<PathBuf, ApiError> {
    state.session.require(routes::SETTINGS)?;
    Ok(state.config.save(path)?)
}
