pub mod checkin;
pub mod events;
pub mod export;
pub mod registration;
pub mod token;

pub use checkin::CheckInController;
pub use events::EventService;
pub use registration::RegistrationService;
pub use token::TokenGenerator;

use uuid::Uuid;

use crate::models::Event;
use crate::store::Store;
use crate::utils::error::{AppError, AppResult};

pub(crate) async fn find_event(store: &dyn Store, event_id: Uuid) -> AppResult<Event> {
    store
        .get_event(event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event '{event_id}' was not found")))
}

/// Loads an event and checks that `organizer_id` owns it.
pub(crate) async fn find_owned_event(
    store: &dyn Store,
    event_id: Uuid,
    organizer_id: Uuid,
) -> AppResult<Event> {
    let event = find_event(store, event_id).await?;
    event.ensure_owned_by(organizer_id)?;
    Ok(event)
}
