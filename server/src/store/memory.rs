use std::cmp::Reverse;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Event, EventInput, Registration};
use crate::store::{EventFilter, EventStore, RegistrationStore};
use crate::utils::error::{AppError, AppResult};

#[derive(Default)]
struct Tables {
    events: HashMap<Uuid, Event>,
    registrations: HashMap<Uuid, Registration>,
}

/// In-process store with the same ordering and cascade rules as
/// [`PgStore`](crate::store::PgStore). Used for tests and `STORE_BACKEND=memory`.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn get_event(&self, id: Uuid) -> AppResult<Option<Event>> {
        Ok(self.tables.read().await.events.get(&id).cloned())
    }

    async fn list_events(&self, filter: EventFilter) -> AppResult<Vec<Event>> {
        let tables = self.tables.read().await;
        let mut events: Vec<Event> = tables
            .events
            .values()
            .filter(|event| match filter {
                EventFilter::OwnedBy(organizer_id) => event.organizer_id == organizer_id,
                EventFilter::StartingFrom(from) => event.start_time >= from,
            })
            .cloned()
            .collect();
        events.sort_by_key(|event| (event.start_time, event.id));
        Ok(events)
    }

    async fn insert_event(&self, event: &Event) -> AppResult<Event> {
        let mut tables = self.tables.write().await;
        if tables.events.contains_key(&event.id) {
            return Err(AppError::StorageError(format!(
                "event '{}' already exists",
                event.id
            )));
        }
        tables.events.insert(event.id, event.clone());
        Ok(event.clone())
    }

    async fn update_event(
        &self,
        id: Uuid,
        input: &EventInput,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Option<Event>> {
        let mut tables = self.tables.write().await;
        let Some(event) = tables.events.get_mut(&id) else {
            return Ok(None);
        };

        event.title = input.title.clone();
        event.description = input.description.clone();
        event.location = input.location.clone();
        event.start_time = input.start_time;
        event.cover_image_url = input.cover_image_url.clone();
        event.max_attendees = input.max_attendees;
        event.updated_at = updated_at;

        Ok(Some(event.clone()))
    }

    async fn delete_event(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.events.remove(&id).is_none() {
            return Ok(false);
        }
        tables.registrations.retain(|_, r| r.event_id != id);
        Ok(true)
    }
}

#[async_trait]
impl RegistrationStore for MemoryStore {
    async fn get_registration(&self, id: Uuid) -> AppResult<Option<Registration>> {
        Ok(self.tables.read().await.registrations.get(&id).cloned())
    }

    async fn list_registrations(&self, event_id: Uuid) -> AppResult<Vec<Registration>> {
        let tables = self.tables.read().await;
        let mut registrations: Vec<Registration> = tables
            .registrations
            .values()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect();
        registrations.sort_by_key(|r| Reverse((r.registered_at, r.id)));
        Ok(registrations)
    }

    async fn insert_registration(&self, registration: &Registration) -> AppResult<Registration> {
        let mut tables = self.tables.write().await;

        if !tables.events.contains_key(&registration.event_id) {
            return Err(AppError::StorageError(format!(
                "event '{}' does not exist",
                registration.event_id
            )));
        }
        if tables
            .registrations
            .values()
            .any(|r| r.ticket_token == registration.ticket_token)
        {
            return Err(AppError::StorageError(
                "ticket token already issued".to_string(),
            ));
        }

        tables
            .registrations
            .insert(registration.id, registration.clone());
        Ok(registration.clone())
    }

    async fn toggle_check_in(&self, id: Uuid) -> AppResult<Option<Registration>> {
        let mut tables = self.tables.write().await;
        Ok(tables.registrations.get_mut(&id).map(|r| {
            r.checked_in = !r.checked_in;
            r.clone()
        }))
    }

    async fn count_registrations(&self, event_ids: &[Uuid]) -> AppResult<usize> {
        let tables = self.tables.read().await;
        let count = tables
            .registrations
            .values()
            .filter(|r| event_ids.contains(&r.event_id))
            .count();
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttendeeDetails;
    use chrono::Duration;

    fn event(organizer_id: Uuid, start_time: DateTime<Utc>) -> Event {
        Event::new(
            organizer_id,
            EventInput {
                title: "Launch".to_string(),
                description: "Product launch".to_string(),
                location: "Online".to_string(),
                start_time,
                cover_image_url: None,
                max_attendees: Some(50),
            },
        )
    }

    fn registration(event_id: Uuid, token: &str) -> Registration {
        Registration::new(
            event_id,
            AttendeeDetails {
                full_name: "Grace Hopper".to_string(),
                email: "grace@example.com".to_string(),
                phone: None,
                company: None,
            },
            token.to_string(),
        )
    }

    #[tokio::test]
    async fn test_delete_event_cascades_to_registrations() {
        let store = MemoryStore::new();
        let event = store
            .insert_event(&event(Uuid::new_v4(), Utc::now()))
            .await
            .unwrap();
        let registration = store
            .insert_registration(&registration(event.id, "t-1"))
            .await
            .unwrap();

        assert!(store.delete_event(event.id).await.unwrap());
        assert!(store
            .get_registration(registration.id)
            .await
            .unwrap()
            .is_none());
        assert!(!store.delete_event(event.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_ticket_token_is_rejected() {
        let store = MemoryStore::new();
        let event = store
            .insert_event(&event(Uuid::new_v4(), Utc::now()))
            .await
            .unwrap();
        store
            .insert_registration(&registration(event.id, "same"))
            .await
            .unwrap();

        let duplicate = store
            .insert_registration(&registration(event.id, "same"))
            .await;
        assert!(matches!(duplicate, Err(AppError::StorageError(_))));
    }

    #[tokio::test]
    async fn test_registrations_listed_newest_first() {
        let store = MemoryStore::new();
        let event = store
            .insert_event(&event(Uuid::new_v4(), Utc::now()))
            .await
            .unwrap();

        let mut older = registration(event.id, "older");
        older.registered_at = Utc::now() - Duration::minutes(5);
        let newer = registration(event.id, "newer");
        store.insert_registration(&older).await.unwrap();
        store.insert_registration(&newer).await.unwrap();

        let listed = store.list_registrations(event.id).await.unwrap();
        let tokens: Vec<&str> = listed.iter().map(|r| r.ticket_token.as_str()).collect();
        assert_eq!(tokens, vec!["newer", "older"]);
    }

    #[tokio::test]
    async fn test_event_filters_order_by_start_time() {
        let store = MemoryStore::new();
        let organizer = Uuid::new_v4();
        let now = Utc::now();
        let later = store
            .insert_event(&event(organizer, now + Duration::days(2)))
            .await
            .unwrap();
        let sooner = store
            .insert_event(&event(organizer, now + Duration::days(1)))
            .await
            .unwrap();
        let past = store
            .insert_event(&event(Uuid::new_v4(), now - Duration::days(1)))
            .await
            .unwrap();

        let owned = store
            .list_events(EventFilter::OwnedBy(organizer))
            .await
            .unwrap();
        assert_eq!(
            owned.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![sooner.id, later.id]
        );

        let upcoming = store
            .list_events(EventFilter::StartingFrom(now))
            .await
            .unwrap();
        assert!(upcoming.iter().all(|e| e.id != past.id));
        assert_eq!(upcoming.len(), 2);
    }

    #[tokio::test]
    async fn test_toggle_and_count() {
        let store = MemoryStore::new();
        let event = store
            .insert_event(&event(Uuid::new_v4(), Utc::now()))
            .await
            .unwrap();
        let registration = store
            .insert_registration(&registration(event.id, "t"))
            .await
            .unwrap();

        let toggled = store.toggle_check_in(registration.id).await.unwrap().unwrap();
        assert!(toggled.checked_in);
        assert!(store.toggle_check_in(Uuid::new_v4()).await.unwrap().is_none());
        assert_eq!(store.count_registrations(&[event.id]).await.unwrap(), 1);
        assert_eq!(store.count_registrations(&[]).await.unwrap(), 0);
    }
}
