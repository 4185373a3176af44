//! # Session State
//!
//! The operator's role and name for the running session.
//!
//! ## Role Switch
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  nas> role waiter                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SessionState::switch_role(Waiter)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  menu: Dashboard + Restaurant (floor, menu, stock, events)             │
//! │  nas> invoices  →  FORBIDDEN_ROUTE (screen hidden for this role)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The role only decides which screens are displayed. The store itself
//! never looks at it.

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

use nas_core::rules::navigation::{can_view, menu_for, NavSection, Role};

use crate::error::ApiError;

/// The operator of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub role: Role,
    pub user_name: String,
}

/// Shared, mutable session.
#[derive(Debug, Clone)]
pub struct SessionState {
    session: Arc<Mutex<Session>>,
}

impl SessionState {
    pub fn new(role: Role, user_name: impl Into<String>) -> Self {
        SessionState {
            session: Arc::new(Mutex::new(Session {
                role,
                user_name: user_name.into(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn current(&self) -> Session {
        self.lock().clone()
    }

    pub fn role(&self) -> Role {
        self.lock().role
    }

    pub fn user_name(&self) -> String {
        self.lock().user_name.clone()
    }

    /// Switches the role. No credential is checked.
    pub fn switch_role(&self, role: Role) -> Session {
        let mut session = self.lock();
        info!(from = %session.role, to = %role, "Role switched");
        session.role = role;
        session.clone()
    }

    /// Sections the current role displays.
    pub fn menu(&self) -> Vec<NavSection> {
        menu_for(self.role())
    }

    /// Fails with `FORBIDDEN_ROUTE` when the current role does not display
    /// `route`.
    pub fn require(&self, route: &str) -> Result<(), ApiError> {
        let role = self.role();
        if can_view(role, route) {
            Ok(())
        } else {
            Err(ApiError::forbidden_route(role.as_str(), route))
        }
    }

    /// Passes when the current role displays at least one of `routes`.
    pub fn require_any(&self, routes: &[&str]) -> Result<(), ApiError> {
        let role = self.role();
        if routes.iter().any(|r| can_view(role, r)) {
            Ok(())
        } else {
            Err(ApiError::forbidden_route(role.as_str(), routes.first().copied().unwrap_or("/")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_guard_follows_role() {
        let session = SessionState::new(Role::Admin, "admin");
        assert!(session.require("/finance").is_ok());

        session.switch_role(Role::Waiter);
        assert!(session.require("/restaurant/floor").is_ok());
        assert!(session.require("/dashboard").is_ok());
        let err = session.require("/finance").unwrap_err();
        assert_eq!(err.code, ErrorCode::ForbiddenRoute);
    }

    #[test]
    fn test_require_any() {
        let session = SessionState::new(Role::Storekeeper, "stock");
        assert!(session
            .require_any(&["/lodging/stock", "/restaurant/stock"])
            .is_ok());
        assert!(session.require_any(&["/finance"]).is_err());
    }

    #[test]
    fn test_menu_starts_with_dashboard() {
        let session = SessionState::new(Role::Kitchen, "chef");
        assert_eq!(session.menu()[0].items[0].route, "/dashboard");
    }
}
