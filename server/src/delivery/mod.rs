//! Ticket delivery.
//!
//! A committed registration becomes a [`DeliveryJob`] on the
//! [`DeliveryQueue`]; the [`DeliveryWorker`] hands each job to the
//! [`DeliveryDispatcher`], which renders the QR ticket, composes the
//! confirmation and sends it through a [`DeliveryTransport`]. Nothing here
//! can fail a registration.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Event, Registration};

pub mod dispatcher;
pub mod message;
pub mod queue;
pub mod render;
pub mod transport;

pub use dispatcher::DeliveryDispatcher;
pub use message::ConfirmationMessage;
pub use queue::{DeliveryQueue, DeliveryWorker};
pub use render::{RenderError, TicketRenderer};
pub use transport::{DeliveryTransport, LogTransport, SmtpSettings, SmtpTransport};

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("invalid recipient address: {0}")]
    InvalidRecipient(String),

    #[error("transport failure: {0}")]
    Transport(String),
}

/// Everything needed to deliver one ticket, captured at registration time.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryJob {
    pub registration_id: Uuid,
    pub event_id: Uuid,
    pub recipient_email: String,
    pub attendee_name: String,
    pub event_title: String,
    pub event_start: DateTime<Utc>,
    pub event_location: String,
    pub ticket_token: String,
}

impl DeliveryJob {
    pub fn for_registration(registration: &Registration, event: &Event) -> Self {
        Self {
            registration_id: registration.id,
            event_id: event.id,
            recipient_email: registration.email.clone(),
            attendee_name: registration.full_name.clone(),
            event_title: event.title.clone(),
            event_start: event.start_time,
            event_location: event.location.clone(),
            ticket_token: registration.ticket_token.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent,
    Failed { reason: String },
}

impl DeliveryOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, DeliveryOutcome::Sent)
    }
}
