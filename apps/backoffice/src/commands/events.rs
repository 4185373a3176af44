//! # Event Commands
//!
//! Restaurant events (concerts, tastings, private parties) by month.

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use tracing::{debug, info};

use nas_core::validation::validate_label;
use nas_core::{Event, EventStatus, EventType, TimeRange, ValidationError};

use super::routes;
use crate::error::ApiError;
use crate::state::AppState;

/// An event as entered on the events screen.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEventRequest {
    pub name: String,
    pub date: NaiveDate,
    /// `HH:MM–HH:MM`.
    pub hours: String,
    pub expected_guests: u32,
    pub contact: String,
    pub event_type: Option<EventType>,
    pub notes: Option<String>,
}

/// Events of `month` (defaults to the current one), by date then hour.
pub async fn list_events(
    state: &AppState,
    month: Option<(i32, u32)>,
) -> Result<Vec<Event>, ApiError> {
    state.session.require(routes::EVENTS)?;

    let (year, month) = month.unwrap_or_else(|| {
        let today = state.api.today();
        (today.year(), today.month())
    });
    debug!(year, month, "list_events command");

    let mut events: Vec<Event> = state
        .api
        .fetch_all::<Event>()
        .await?
        .into_iter()
        .filter(|e| e.date.year() == year && e.date.month() == month)
        .collect();
    events.sort_by_key(|e| (e.date, e.hours.start));
    Ok(events)
}

/// Plans an event. New events start as planned.
pub async fn add_event(state: &AppState, request: NewEventRequest) -> Result<Event, ApiError> {
    state.session.require(routes::EVENTS)?;
    validate_label("event name", &request.name)?;
    validate_label("contact", &request.contact)?;
    if request.expected_guests == 0 {
        return Err(ValidationError::MustBePositive {
            field: "expected guests".to_string(),
        }
        .into());
    }

    let event = state
        .api
        .create(Event {
            id: String::new(),
            name: request.name.trim().to_string(),
            date: request.date,
            hours: TimeRange::parse(&request.hours)?,
            expected_guests: request.expected_guests,
            contact: request.contact.trim().to_string(),
            notes: request.notes,
            status: Some(EventStatus::Planned),
            event_type: request.event_type,
        })
        .await?;

    info!(event_id = %event.id, date = %event.date, "Event planned");
    Ok(event)
}

pub async fn set_event_status(
    state: &AppState,
    event_id: &str,
    status: EventStatus,
) -> Result<Event, ApiError> {
    state.session.require(routes::EVENTS)?;

    let mut event = state.api.fetch::<Event>(event_id).await?;
    event.status = Some(status);
    Ok(state.api.update(event).await?)
}
