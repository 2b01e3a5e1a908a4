use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{attendees, events, health_check, registrations};
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    let public = Router::new()
        .route("/events", get(events::list_upcoming))
        .route("/events/:event_id", get(events::get_event))
        .route(
            "/events/:event_id/registrations",
            post(registrations::register),
        );

    let organizer = Router::new()
        .route("/dashboard", get(events::dashboard))
        .route(
            "/events",
            get(events::list_own).post(events::create_event),
        )
        .route(
            "/events/:event_id",
            put(events::update_event).delete(events::delete_event),
        )
        .route(
            "/events/:event_id/attendees",
            get(attendees::list_attendees),
        )
        .route(
            "/events/:event_id/attendees/export",
            get(attendees::export_attendees),
        )
        .route(
            "/registrations/:registration_id/check-in",
            post(attendees::toggle_check_in),
        );

    Router::new()
        .route("/health", get(health_check))
        .merge(public)
        .nest("/organizer", organizer)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
}
