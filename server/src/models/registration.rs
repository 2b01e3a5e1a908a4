use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::event::{optional_field, required_field};
use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Registration {
    pub id: Uuid,
    pub event_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    /// Issued once at insertion; unique across all events.
    pub ticket_token: String,
    pub checked_in: bool,
    pub registered_at: DateTime<Utc>,
}

impl Registration {
    pub fn new(event_id: Uuid, attendee: AttendeeDetails, ticket_token: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            full_name: attendee.full_name,
            email: attendee.email,
            phone: attendee.phone,
            company: attendee.company,
            ticket_token,
            checked_in: false,
            registered_at: Utc::now(),
        }
    }

    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.full_name.to_lowercase().contains(needle)
            || self.email.to_lowercase().contains(needle)
    }
}

/// What a member of the public submits to register.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AttendeeDetails {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
}

impl AttendeeDetails {
    pub fn validate(self) -> AppResult<Self> {
        let full_name = required_field("full_name", self.full_name)?;
        let email = required_field("email", self.email)?;

        if !is_valid_email(&email) {
            return Err(AppError::ValidationError(format!(
                "'{email}' is not a valid email address"
            )));
        }

        Ok(Self {
            full_name,
            email,
            phone: optional_field(self.phone),
            company: optional_field(self.company),
        })
    }
}

/// Shape check only: `local@domain.tld`, no whitespace, a single `@`.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return false;
    }

    domain.split('.').all(|label| !label.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    pub total: usize,
    pub checked_in: usize,
    pub pending: usize,
}

impl AttendanceSummary {
    pub fn from_registrations(registrations: &[Registration]) -> Self {
        let checked_in = registrations.iter().filter(|r| r.checked_in).count();
        Self {
            total: registrations.len(),
            checked_in,
            pending: registrations.len() - checked_in,
        }
    }
}
