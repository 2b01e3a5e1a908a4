use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub cover_image_url: Option<String>,
    /// Advisory only; registrations beyond it are still accepted.
    pub max_attendees: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn new(organizer_id: Uuid, input: EventInput) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            organizer_id,
            title: input.title,
            description: input.description,
            location: input.location,
            start_time: input.start_time,
            cover_image_url: input.cover_image_url,
            max_attendees: input.max_attendees,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.start_time >= now
    }

    /// Rejects any principal other than the event's organizer.
    pub fn ensure_owned_by(&self, organizer_id: Uuid) -> AppResult<()> {
        if self.organizer_id == organizer_id {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Event '{}' is managed by another organizer",
                self.id
            )))
        }
    }
}

/// Organizer-supplied fields for creating or replacing an event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EventInput {
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub max_attendees: Option<i32>,
}

impl EventInput {
    /// Trims text fields, drops a blank cover image and checks required fields.
    pub fn validate(self) -> AppResult<Self> {
        let title = required_field("title", self.title)?;
        let description = required_field("description", self.description)?;
        let location = required_field("location", self.location)?;

        if let Some(limit) = self.max_attendees {
            if limit < 1 {
                return Err(AppError::ValidationError(
                    "max_attendees must be at least 1 when provided".to_string(),
                ));
            }
        }

        Ok(Self {
            title,
            description,
            location,
            start_time: self.start_time,
            cover_image_url: optional_field(self.cover_image_url),
            max_attendees: self.max_attendees,
        })
    }
}

/// Headline numbers for an organizer's dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_events: usize,
    pub upcoming_events: usize,
    pub total_registrations: usize,
}

pub(crate) fn required_field(name: &str, value: String) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(format!("{name} is required")));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn optional_field(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn input() -> EventInput {
        EventInput {
            title: "  RustConf Meetup ".to_string(),
            description: "Talks and pizza".to_string(),
            location: "Hall B".to_string(),
            start_time: Utc.with_ymd_and_hms(2030, 3, 1, 19, 30, 0).unwrap(),
            cover_image_url: Some("   ".to_string()),
            max_attendees: None,
        }
    }

    #[test]
    fn test_validate_trims_and_drops_blank_cover() {
        let validated = input().validate().unwrap();
        assert_eq!(validated.title, "RustConf Meetup");
        assert_eq!(validated.cover_image_url, None);
    }

    #[test]
    fn test_validate_rejects_missing_location() {
        let mut bad = input();
        bad.location = " ".to_string();
        assert!(matches!(bad.validate(), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_validate_rejects_non_positive_limit() {
        let mut bad = input();
        bad.max_attendees = Some(0);
        assert!(matches!(bad.validate(), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_ownership_and_upcoming() {
        let owner = Uuid::new_v4();
        let event = Event::new(owner, input().validate().unwrap());

        assert!(event.ensure_owned_by(owner).is_ok());
        assert!(matches!(
            event.ensure_owned_by(Uuid::new_v4()),
            Err(AppError::Forbidden(_))
        ));
        assert!(event.is_upcoming(event.start_time));
        assert!(!event.is_upcoming(event.start_time + Duration::seconds(1)));
    }
}
