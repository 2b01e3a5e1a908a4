use crate::delivery::DeliveryQueue;
use crate::services::{CheckInController, EventService, RegistrationService};
use crate::store::SharedStore;

/// Shared by every handler. Each service holds its own handle to the
/// injected store.
#[derive(Clone)]
pub struct AppState {
    pub events: EventService,
    pub registrations: RegistrationService,
    pub check_in: CheckInController,
}

impl AppState {
    pub fn new(store: SharedStore, deliveries: DeliveryQueue) -> Self {
        Self {
            events: EventService::new(store.clone()),
            registrations: RegistrationService::new(store.clone(), deliveries),
            check_in: CheckInController::new(store),
        }
    }
}
