//! Record store client.
//!
//! Services receive a [`SharedStore`] instead of reaching for a global
//! connection, so tests can swap PostgreSQL for [`MemoryStore`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Event, EventInput, Registration};
use crate::utils::error::AppResult;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Which events a scan should return. Results are always ordered by
/// ascending start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFilter {
    OwnedBy(Uuid),
    StartingFrom(DateTime<Utc>),
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn get_event(&self, id: Uuid) -> AppResult<Option<Event>>;

    async fn list_events(&self, filter: EventFilter) -> AppResult<Vec<Event>>;

    async fn insert_event(&self, event: &Event) -> AppResult<Event>;

    /// Replaces the editable fields. `None` when the event does not exist.
    async fn update_event(
        &self,
        id: Uuid,
        input: &EventInput,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Option<Event>>;

    /// Deletes the event and every registration under it.
    async fn delete_event(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait RegistrationStore: Send + Sync {
    async fn get_registration(&self, id: Uuid) -> AppResult<Option<Registration>>;

    /// Newest registration first, ties broken by id.
    async fn list_registrations(&self, event_id: Uuid) -> AppResult<Vec<Registration>>;

    /// Fails with a storage error if the ticket token is already taken.
    async fn insert_registration(&self, registration: &Registration) -> AppResult<Registration>;

    /// Negates `checked_in` in a single store operation.
    async fn toggle_check_in(&self, id: Uuid) -> AppResult<Option<Registration>>;

    async fn count_registrations(&self, event_ids: &[Uuid]) -> AppResult<usize>;
}

pub trait Store: EventStore + RegistrationStore {}

impl<T> Store for T where T: EventStore + RegistrationStore {}

pub type SharedStore = Arc<dyn Store>;
