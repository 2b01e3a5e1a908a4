use tracing::info;
use uuid::Uuid;

use crate::models::Registration;
use crate::services::find_owned_event;
use crate::store::SharedStore;
use crate::utils::error::{AppError, AppResult};

#[derive(Clone)]
pub struct CheckInController {
    store: SharedStore,
}

impl CheckInController {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Flips the check-in flag and returns the updated record.
    ///
    /// The flip itself happens inside the store, so concurrent toggles each
    /// negate the latest value instead of overwriting each other.
    pub async fn toggle_check_in(
        &self,
        registration_id: Uuid,
        organizer_id: Uuid,
    ) -> AppResult<Registration> {
        let registration = self
            .store
            .get_registration(registration_id)
            .await?
            .ok_or_else(|| not_found(registration_id))?;

        find_owned_event(self.store.as_ref(), registration.event_id, organizer_id).await?;

        let updated = self
            .store
            .toggle_check_in(registration_id)
            .await?
            // removed by an event delete between the two calls
            .ok_or_else(|| not_found(registration_id))?;

        info!(
            registration_id = %updated.id,
            event_id = %updated.event_id,
            checked_in = updated.checked_in,
            "Check-in toggled"
        );

        Ok(updated)
    }
}

fn not_found(registration_id: Uuid) -> AppError {
    AppError::NotFound(format!("Registration '{registration_id}' was not found"))
}
