use axum::response::Response;
use serde::Serialize;

use crate::utils::response::success;

pub mod attendees;
pub mod events;
pub mod extract;
pub mod principal;
pub mod registrations;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "eventreg-api",
    };

    success(payload, "Health check successful")
}
