use axum::extract::State;
use axum::response::Response;
use uuid::Uuid;

use crate::handlers::extract::{Json, Path};
use crate::models::AttendeeDetails;
use crate::state::AppState;
use crate::utils::error::AppResult;
use crate::utils::response::created;

/// Public registration. The confirmation email is sent in the background;
/// this response only says whether the registration was recorded.
pub async fn register(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(attendee): Json<AttendeeDetails>,
) -> AppResult<Response> {
    let registration = state.registrations.register(event_id, attendee).await?;
    Ok(created(
        registration,
        "Registration confirmed, your ticket is on its way",
    ))
}
