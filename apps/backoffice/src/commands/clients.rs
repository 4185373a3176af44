//! # Client Commands
//!
//! Client records. Clients are never deleted during a session.

use serde::Deserialize;
use tracing::{debug, info};

use nas_core::validation::validate_search_query;
use nas_core::Client;

use super::routes;
use crate::error::ApiError;
use crate::state::AppState;

/// A client as typed at the reception desk.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub dietary_preferences: Option<String>,
}

/// Lists clients, optionally those whose name or phone contains `search`.
pub async fn list_clients(state: &AppState, search: Option<&str>) -> Result<Vec<Client>, ApiError> {
    debug!(search = ?search, "list_clients command");
    state.session.require(routes::CLIENTS)?;

    let clients = state.api.fetch_all::<Client>().await?;
    let Some(search) = search else {
        return Ok(clients);
    };

    let needle = validate_search_query(search)?.to_lowercase();
    Ok(clients
        .into_iter()
        .filter(|c| c.name.to_lowercase().contains(&needle) || c.phone.contains(&needle))
        .collect())
}

/// Creates a client.
pub async fn add_client(state: &AppState, new: NewClient) -> Result<Client, ApiError> {
    state.session.require(routes::CLIENTS)?;

    let client = state
        .api
        .create(Client {
            id: String::new(),
            name: new.name.trim().to_string(),
            phone: new.phone.trim().to_string(),
            email: new.email.filter(|e| !e.trim().is_empty()),
            dietary_preferences: new.dietary_preferences,
        })
        .await?;

    info!(client_id = %client.id, "Client created");
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::state;
    use crate::error::ErrorCode;
    use nas_core::rules::navigation::Role;

    fn new_client(name: &str, phone: &str) -> NewClient {
        NewClient {
            name: name.to_string(),
            phone: phone.to_string(),
            email: Some(String::new()),
            dietary_preferences: None,
        }
    }

    #[tokio::test]
    async fn test_add_and_search() {
        let state = state(Role::Reception);
        let request = new_client("  Rakoto Jean ", "034 12 345 67");
        let created = add_client(&state, request).await.unwrap();
        assert_eq!(created.name, "Rakoto Jean");
        assert_eq!(created.email, None);

        let found = list_clients(&state, Some("rakoto")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(list_clients(&state, None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_invalid_client() {
        let state = state(Role::Admin);
        let err = add_client(&state, new_client("Rakoto", "abc")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_hidden_for_kitchen() {
        let err = list_clients(&state(Role::Kitchen), None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ForbiddenRoute);
    }
}
