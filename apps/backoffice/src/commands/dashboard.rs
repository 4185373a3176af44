//! # Dashboard Command
//!
//! Daily figures shown to every role after login.

use serde::Serialize;
use tracing::debug;

use nas_core::rules::occupancy::DashboardSummary;
use nas_store::CacheStats;

use super::routes;
use crate::error::ApiError;
use crate::state::AppState;

/// Dashboard figures plus what needs attention now.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    #[serde(flatten)]
    pub summary: DashboardSummary,

    /// Dining reservations that may be marked no-show right now.
    pub no_show_candidates: usize,

    pub cache: CacheStats,
}

/// Gets the dashboard of today.
pub async fn get_dashboard(state: &AppState) -> Result<DashboardView, ApiError> {
    debug!("get_dashboard command");
    state.session.require(routes::DASHBOARD)?;

    let summary = state.api.dashboard().await?;
    let no_show_candidates = state.api.no_show_candidates().await?.len();

    Ok(DashboardView {
        summary,
        no_show_candidates,
        cache: state.api.cache_stats(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{at, state, state_at, today};
    use nas_core::rules::navigation::Role;

    #[tokio::test]
    async fn test_dashboard_for_every_role() {
        for role in Role::ALL {
            assert!(get_dashboard(&state(*role)).await.is_ok());
        }
    }

    #[tokio::test]
    async fn test_dashboard_figures() {
        let view = get_dashboard(&state_at(Role::Admin, at(20, 0))).await.unwrap();
        assert_eq!(view.summary.day, today());
        assert_eq!(view.summary.rooms_in_maintenance, 1);
        // r3 holds a table, so nothing is eligible.
        assert_eq!(view.no_show_candidates, 0);
        assert_eq!(view.cache.misses, 1);
    }
}
