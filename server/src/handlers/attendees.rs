use axum::extract::State;
use axum::response::Response;
use serde::Deserialize;
use uuid::Uuid;

use crate::handlers::extract::{Path, Query};
use crate::handlers::principal::OrganizerPrincipal;
use crate::services::export::{export_file_name, to_table};
use crate::state::AppState;
use crate::utils::error::AppResult;
use crate::utils::response::{csv_attachment, success};

#[derive(Debug, Default, Deserialize)]
pub struct AttendeeQuery {
    #[serde(default)]
    pub q: Option<String>,
}

pub async fn list_attendees(
    State(state): State<AppState>,
    OrganizerPrincipal(organizer_id): OrganizerPrincipal,
    Path(event_id): Path<Uuid>,
    Query(query): Query<AttendeeQuery>,
) -> AppResult<Response> {
    let roster = state
        .registrations
        .roster(event_id, organizer_id, query.q.as_deref().unwrap_or(""))
        .await?;

    Ok(success(roster, "Attendees"))
}

pub async fn export_attendees(
    State(state): State<AppState>,
    OrganizerPrincipal(organizer_id): OrganizerPrincipal,
    Path(event_id): Path<Uuid>,
) -> AppResult<Response> {
    let event = state.events.get(event_id).await?;
    let registrations = state
        .registrations
        .list_for_event(event.id, organizer_id)
        .await?;

    Ok(csv_attachment(
        &export_file_name(&event.title),
        to_table(&registrations),
    ))
}

pub async fn toggle_check_in(
    State(state): State<AppState>,
    OrganizerPrincipal(organizer_id): OrganizerPrincipal,
    Path(registration_id): Path<Uuid>,
) -> AppResult<Response> {
    let registration = state
        .check_in
        .toggle_check_in(registration_id, organizer_id)
        .await?;

    let message = if registration.checked_in {
        "Attendee checked in"
    } else {
        "Check-in undone"
    };
    Ok(success(registration, message))
}
