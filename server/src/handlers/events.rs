use axum::extract::State;
use axum::response::Response;
use chrono::Utc;
use uuid::Uuid;

use crate::handlers::extract::{Json, Path};
use crate::handlers::principal::OrganizerPrincipal;
use crate::models::EventInput;
use crate::state::AppState;
use crate::utils::error::AppResult;
use crate::utils::response::{created, empty_success, success};

pub async fn list_upcoming(State(state): State<AppState>) -> AppResult<Response> {
    let events = state.events.list_upcoming(Utc::now()).await?;
    Ok(success(events, "Upcoming events"))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> AppResult<Response> {
    let event = state.events.get(event_id).await?;
    Ok(success(event, "Event found"))
}

pub async fn dashboard(
    State(state): State<AppState>,
    OrganizerPrincipal(organizer_id): OrganizerPrincipal,
) -> AppResult<Response> {
    let stats = state.events.dashboard(organizer_id, Utc::now()).await?;
    Ok(success(stats, "Dashboard statistics"))
}

pub async fn list_own(
    State(state): State<AppState>,
    OrganizerPrincipal(organizer_id): OrganizerPrincipal,
) -> AppResult<Response> {
    let events = state.events.list_for_organizer(organizer_id).await?;
    Ok(success(events, "Organizer events"))
}

pub async fn create_event(
    State(state): State<AppState>,
    OrganizerPrincipal(organizer_id): OrganizerPrincipal,
    Json(input): Json<EventInput>,
) -> AppResult<Response> {
    let event = state.events.create(organizer_id, input).await?;
    Ok(created(event, "Event created"))
}

pub async fn update_event(
    State(state): State<AppState>,
    OrganizerPrincipal(organizer_id): OrganizerPrincipal,
    Path(event_id): Path<Uuid>,
    Json(input): Json<EventInput>,
) -> AppResult<Response> {
    let event = state.events.update(event_id, organizer_id, input).await?;
    Ok(success(event, "Event updated"))
}

pub async fn delete_event(
    State(state): State<AppState>,
    OrganizerPrincipal(organizer_id): OrganizerPrincipal,
    Path(event_id): Path<Uuid>,
) -> AppResult<Response> {
    state.events.delete(event_id, organizer_id).await?;
    Ok(empty_success("Event deleted"))
}
