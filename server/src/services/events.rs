use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::models::{DashboardStats, Event, EventInput};
use crate::services::{find_event, find_owned_event};
use crate::store::{EventFilter, SharedStore};
use crate::utils::error::{AppError, AppResult};

/// Event management for organizers and the public event listing.
#[derive(Clone)]
pub struct EventService {
    store: SharedStore,
}

impl EventService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn create(&self, organizer_id: Uuid, input: EventInput) -> AppResult<Event> {
        let event = Event::new(organizer_id, input.validate()?);
        let event = self.store.insert_event(&event).await?;
        info!(event_id = %event.id, %organizer_id, "Event created");
        Ok(event)
    }

    pub async fn update(
        &self,
        event_id: Uuid,
        organizer_id: Uuid,
        input: EventInput,
    ) -> AppResult<Event> {
        let input = input.validate()?;
        find_owned_event(self.store.as_ref(), event_id, organizer_id).await?;

        let event = self
            .store
            .update_event(event_id, &input, Utc::now())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event '{event_id}' was not found")))?;
        info!(event_id = %event.id, "Event updated");
        Ok(event)
    }

    /// Removes the event together with all of its registrations.
    pub async fn delete(&self, event_id: Uuid, organizer_id: Uuid) -> AppResult<()> {
        find_owned_event(self.store.as_ref(), event_id, organizer_id).await?;
        if self.store.delete_event(event_id).await? {
            info!(%event_id, "Event deleted");
        }
        Ok(())
    }

    pub async fn get(&self, event_id: Uuid) -> AppResult<Event> {
        find_event(self.store.as_ref(), event_id).await
    }

    pub async fn list_upcoming(&self, now: DateTime<Utc>) -> AppResult<Vec<Event>> {
        self.store.list_events(EventFilter::StartingFrom(now)).await
    }

    pub async fn list_for_organizer(&self, organizer_id: Uuid) -> AppResult<Vec<Event>> {
        self.store.list_events(EventFilter::OwnedBy(organizer_id)).await
    }

    pub async fn dashboard(
        &self,
        organizer_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<DashboardStats> {
        let events = self.list_for_organizer(organizer_id).await?;
        let event_ids: Vec<Uuid> = events.iter().map(|e| e.id).collect();
        let total_registrations = self.store.count_registrations(&event_ids).await?;

        Ok(DashboardStats {
            total_events: events.len(),
            upcoming_events: events.iter().filter(|e| e.is_upcoming(now)).count(),
            total_registrations,
        })
    }
}
