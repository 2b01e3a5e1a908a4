use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Event, EventInput, Registration};
use crate::store::{EventFilter, EventStore, RegistrationStore};
use crate::utils::error::{AppError, AppResult};

const EVENT_COLUMNS: &str = "id, organizer_id, title, description, location, start_time, \
     cover_image_url, max_attendees, created_at, updated_at";

const REGISTRATION_COLUMNS: &str = "id, event_id, full_name, email, phone, company, \
     ticket_token, checked_in, registered_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for PgStore {
    async fn get_event(&self, id: Uuid) -> AppResult<Option<Event>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }

    async fn list_events(&self, filter: EventFilter) -> AppResult<Vec<Event>> {
        let events = match filter {
            EventFilter::OwnedBy(organizer_id) => {
                let sql = format!(
                    "SELECT {EVENT_COLUMNS} FROM events WHERE organizer_id = $1 \
                     ORDER BY start_time ASC, id ASC"
                );
                sqlx::query_as::<_, Event>(&sql)
                    .bind(organizer_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            EventFilter::StartingFrom(from) => {
                let sql = format!(
                    "SELECT {EVENT_COLUMNS} FROM events WHERE start_time >= $1 \
                     ORDER BY start_time ASC, id ASC"
                );
                sqlx::query_as::<_, Event>(&sql)
                    .bind(from)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(events)
    }

    async fn insert_event(&self, event: &Event) -> AppResult<Event> {
        let sql = format!(
            "INSERT INTO events ({EVENT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {EVENT_COLUMNS}"
        );
        let stored = sqlx::query_as::<_, Event>(&sql)
            .bind(event.id)
            .bind(event.organizer_id)
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.location)
            .bind(event.start_time)
            .bind(&event.cover_image_url)
            .bind(event.max_attendees)
            .bind(event.created_at)
            .bind(event.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(stored)
    }

    async fn update_event(
        &self,
        id: Uuid,
        input: &EventInput,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Option<Event>> {
        let sql = format!(
            "UPDATE events SET title = $2, description = $3, location = $4, start_time = $5, \
             cover_image_url = $6, max_attendees = $7, updated_at = $8 \
             WHERE id = $1 RETURNING {EVENT_COLUMNS}"
        );
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.location)
            .bind(input.start_time)
            .bind(&input.cover_image_url)
            .bind(input.max_attendees)
            .bind(updated_at)
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }

    async fn delete_event(&self, id: Uuid) -> AppResult<bool> {
        // registrations go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl RegistrationStore for PgStore {
    async fn get_registration(&self, id: Uuid) -> AppResult<Option<Registration>> {
        let sql = format!("SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE id = $1");
        let registration = sqlx::query_as::<_, Registration>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(registration)
    }

    async fn list_registrations(&self, event_id: Uuid) -> AppResult<Vec<Registration>> {
        let sql = format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE event_id = $1 \
             ORDER BY registered_at DESC, id DESC"
        );
        let registrations = sqlx::query_as::<_, Registration>(&sql)
            .bind(event_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(registrations)
    }

    async fn insert_registration(&self, registration: &Registration) -> AppResult<Registration> {
        let sql = format!(
            "INSERT INTO registrations ({REGISTRATION_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {REGISTRATION_COLUMNS}"
        );
        let stored = sqlx::query_as::<_, Registration>(&sql)
            .bind(registration.id)
            .bind(registration.event_id)
            .bind(&registration.full_name)
            .bind(&registration.email)
            .bind(&registration.phone)
            .bind(&registration.company)
            .bind(&registration.ticket_token)
            .bind(registration.checked_in)
            .bind(registration.registered_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(stored)
    }

    async fn toggle_check_in(&self, id: Uuid) -> AppResult<Option<Registration>> {
        let sql = format!(
            "UPDATE registrations SET checked_in = NOT checked_in \
             WHERE id = $1 RETURNING {REGISTRATION_COLUMNS}"
        );
        let registration = sqlx::query_as::<_, Registration>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(registration)
    }

    async fn count_registrations(&self, event_ids: &[Uuid]) -> AppResult<usize> {
        if event_ids.is_empty() {
            return Ok(0);
        }
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM registrations WHERE event_id = ANY($1)")
                .bind(event_ids)
                .fetch_one(&self.pool)
                .await?;
        usize::try_from(count)
            .map_err(|_| AppError::StorageError(format!("Invalid registration count {count}")))
    }
}
