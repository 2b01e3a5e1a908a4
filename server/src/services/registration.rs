use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::delivery::{DeliveryJob, DeliveryQueue};
use crate::models::{AttendanceSummary, AttendeeDetails, Registration};
use crate::services::{find_event, find_owned_event, TokenGenerator};
use crate::store::SharedStore;
use crate::utils::error::AppResult;

/// Public registration flow plus the organizer's read paths over it.
#[derive(Clone)]
pub struct RegistrationService {
    store: SharedStore,
    tokens: TokenGenerator,
    deliveries: DeliveryQueue,
}

impl RegistrationService {
    pub fn new(store: SharedStore, deliveries: DeliveryQueue) -> Self {
        Self {
            store,
            tokens: TokenGenerator::new(),
            deliveries,
        }
    }

    /// Persists a registration and queues its ticket for delivery.
    ///
    /// The result reflects the write only. Whether the ticket later reaches
    /// the registrant is never reported back here.
    pub async fn register(
        &self,
        event_id: Uuid,
        attendee: AttendeeDetails,
    ) -> AppResult<Registration> {
        let attendee = attendee.validate()?;
        let event = find_event(self.store.as_ref(), event_id).await?;

        let token = self.tokens.generate(event.id, &attendee.email);
        let registration = self
            .store
            .insert_registration(&Registration::new(event.id, attendee, token))
            .await?;

        info!(
            registration_id = %registration.id,
            event_id = %event.id,
            "Registration accepted"
        );

        self.deliveries
            .enqueue(DeliveryJob::for_registration(&registration, &event));

        Ok(registration)
    }

    /// All registrations for the event, newest first.
    pub async fn list_for_event(
        &self,
        event_id: Uuid,
        organizer_id: Uuid,
    ) -> AppResult<Vec<Registration>> {
        let event = find_owned_event(self.store.as_ref(), event_id, organizer_id).await?;
        self.store.list_registrations(event.id).await
    }

    /// Case-insensitive substring match on name or email. A blank query
    /// returns the full listing.
    pub async fn search(
        &self,
        event_id: Uuid,
        organizer_id: Uuid,
        query: &str,
    ) -> AppResult<Vec<Registration>> {
        Ok(self.roster(event_id, organizer_id, query).await?.registrations)
    }

    /// Search results plus attendance counts, from a single load. The counts
    /// always cover the whole event, whatever the query.
    pub async fn roster(
        &self,
        event_id: Uuid,
        organizer_id: Uuid,
        query: &str,
    ) -> AppResult<AttendeeRoster> {
        let registrations = self.list_for_event(event_id, organizer_id).await?;
        let summary = AttendanceSummary::from_registrations(&registrations);

        Ok(AttendeeRoster {
            summary,
            registrations: filter_registrations(registrations, query),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendeeRoster {
    pub summary: AttendanceSummary,
    pub registrations: Vec<Registration>,
}

fn filter_registrations(registrations: Vec<Registration>, query: &str) -> Vec<Registration> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return registrations;
    }
    registrations
        .into_iter()
        .filter(|r| r.matches(&needle))
        .collect()
}
