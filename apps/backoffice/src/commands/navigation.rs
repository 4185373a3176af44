//! # Navigation Commands
//!
//! The role's menu and the role switch. Display filter only: the store
//! performs no check of its own.

use serde::Serialize;
use tracing::debug;

use nas_core::rules::navigation::{NavSection, Role};

use crate::error::ApiError;
use crate::state::{AppState, Session};

/// The session and the sections it displays.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuView {
    pub session: Session,
    pub sections: Vec<NavSection>,
}

/// Gets the menu of the current role.
pub fn get_menu(state: &AppState) -> MenuView {
    debug!("get_menu command");
    MenuView {
        session: state.session.current(),
        sections: state.session.menu(),
    }
}

/// Switches the current role and returns its menu.
pub fn switch_role(state: &AppState, role: Role) -> Result<MenuView, ApiError> {
    state.session.switch_role(role);
    Ok(get_menu(state))
}
