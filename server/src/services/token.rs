use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use uuid::Uuid;

/// Last stamp handed out in this process, in microseconds since the epoch.
static LAST_STAMP: AtomicI64 = AtomicI64::new(0);

/// Issues ticket tokens of the form `{event_id}:{stamp}:{email}`.
///
/// The stamp is the wall clock in microseconds, bumped past the previous
/// stamp when two registrations land in the same microsecond, so tokens from
/// one process never repeat. Tokens are not secrets; the store's unique
/// constraint catches the negligible cross-process collision.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenGenerator;

impl TokenGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, event_id: Uuid, email: &str) -> String {
        format!("{}:{}:{}", event_id, next_stamp(), email.trim())
    }
}

fn next_stamp() -> i64 {
    let now = Utc::now().timestamp_micros();
    let previous = match LAST_STAMP.fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
        Some(now.max(last + 1))
    }) {
        Ok(previous) | Err(previous) => previous,
    };
    now.max(previous + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_token_layout() {
        let event_id = Uuid::new_v4();
        let token = TokenGenerator::new().generate(event_id, " ada@example.com ");

        let parts: Vec<&str> = token.splitn(3, ':').collect();
        assert_eq!(parts[0], event_id.to_string());
        assert!(parts[1].parse::<i64>().unwrap() > 0);
        assert_eq!(parts[2], "ada@example.com");
    }

    #[test]
    fn test_same_event_and_email_never_repeat() {
        let generator = TokenGenerator::new();
        let event_id = Uuid::new_v4();

        let tokens: HashSet<String> = (0..10_000)
            .map(|_| generator.generate(event_id, "ada@example.com"))
            .collect();
        assert_eq!(tokens.len(), 10_000);
    }

    #[test]
    fn test_unique_across_threads() {
        let event_id = Uuid::new_v4();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                std::thread::spawn(move || {
                    (0..2_000)
                        .map(|_| TokenGenerator::new().generate(event_id, "same@example.com"))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let tokens: HashSet<String> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        assert_eq!(tokens.len(), 8_000);
    }
}
