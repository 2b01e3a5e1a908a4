use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use eventreg_server::delivery::{DeliveryDispatcher, DeliveryQueue, DeliveryWorker};
use eventreg_server::mocks::{FailingTransport, RecordingTransport};
use eventreg_server::models::{AttendeeDetails, EventInput};
use eventreg_server::services::export::to_table;
use eventreg_server::state::AppState;
use eventreg_server::store::{MemoryStore, SharedStore};
use eventreg_server::utils::error::AppError;

fn event_input(title: &str) -> EventInput {
    EventInput {
        title: title.to_string(),
        description: "A day of talks on early computing".to_string(),
        location: "Bletchley Park".to_string(),
        start_time: Utc::now() + Duration::days(30),
        cover_image_url: None,
        max_attendees: None,
    }
}

fn attendee(full_name: &str, email: &str) -> AttendeeDetails {
    AttendeeDetails {
        full_name: full_name.to_string(),
        email: email.to_string(),
        phone: None,
        company: None,
    }
}

#[tokio::test]
async fn test_register_list_check_in_and_forbid_other_organizer() {
    let store: SharedStore = Arc::new(MemoryStore::new());
    let (queue, _jobs) = DeliveryQueue::bounded(8);
    let state = AppState::new(store, queue);

    let organizer_a = Uuid::new_v4();
    let organizer_b = Uuid::new_v4();
    let event = state
        .events
        .create(organizer_a, event_input("History of Computing"))
        .await
        .unwrap();

    let r1 = state
        .registrations
        .register(event.id, attendee("Ada Lovelace", "ada@example.com"))
        .await
        .unwrap();

    let listed = state
        .registrations
        .list_for_event(event.id, organizer_a)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, r1.id);
    assert!(!listed[0].checked_in);
    assert!(!listed[0].ticket_token.is_empty());

    let toggled = state
        .check_in
        .toggle_check_in(r1.id, organizer_a)
        .await
        .unwrap();
    assert!(toggled.checked_in);

    let forbidden = state
        .registrations
        .list_for_event(event.id, organizer_b)
        .await;
    assert!(matches!(forbidden, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn test_registration_survives_delivery_outage() {
    let store: SharedStore = Arc::new(MemoryStore::new());
    let transport = Arc::new(FailingTransport::new());
    let (queue, receiver) = DeliveryQueue::bounded(8);
    let worker =
        DeliveryWorker::new(receiver, DeliveryDispatcher::new(transport.clone())).spawn();

    let state = AppState::new(store.clone(), queue);
    let organizer = Uuid::new_v4();
    let event = state
        .events
        .create(organizer, event_input("Outage Day"))
        .await
        .unwrap();

    let registration = state
        .registrations
        .register(event.id, attendee("Ada Lovelace", "ada@example.com"))
        .await
        .unwrap();

    // dropping the state closes the queue so the worker can finish
    drop(state);
    worker.await.unwrap();

    assert_eq!(transport.attempts(), 1);
    let stored = store.get_registration(registration.id).await.unwrap();
    assert_eq!(stored, Some(registration));
}

#[tokio::test]
async fn test_delivered_ticket_matches_registration() {
    let store: SharedStore = Arc::new(MemoryStore::new());
    let transport = Arc::new(RecordingTransport::new());
    let (queue, receiver) = DeliveryQueue::bounded(8);
    let worker =
        DeliveryWorker::new(receiver, DeliveryDispatcher::new(transport.clone())).spawn();

    let state = AppState::new(store, queue);
    let event = state
        .events
        .create(Uuid::new_v4(), event_input("Ticketed"))
        .await
        .unwrap();
    let registration = state
        .registrations
        .register(event.id, attendee("Grace Hopper", "grace@example.com"))
        .await
        .unwrap();

    drop(state);
    worker.await.unwrap();

    let sent = transport.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, "grace@example.com");
    assert_eq!(sent[0].subject, "Registration Confirmed: Ticketed");
    assert!(sent[0].body.contains("Grace Hopper"));
    assert!(sent[0].body.contains(&registration.ticket_token));
}

#[tokio::test]
async fn test_tokens_unique_across_events_and_repeat_registrations() {
    let store: SharedStore = Arc::new(MemoryStore::new());
    let (queue, _jobs) = DeliveryQueue::bounded(64);
    let state = AppState::new(store, queue);
    let organizer = Uuid::new_v4();

    let first = state
        .events
        .create(organizer, event_input("First"))
        .await
        .unwrap();
    let second = state
        .events
        .create(organizer, event_input("Second"))
        .await
        .unwrap();

    let mut tokens = HashSet::new();
    for event_id in [first.id, second.id] {
        for _ in 0..10 {
            let registration = state
                .registrations
                .register(event_id, attendee("Ada Lovelace", "ada@example.com"))
                .await
                .unwrap();
            assert!(!registration.ticket_token.is_empty());
            assert!(tokens.insert(registration.ticket_token));
        }
    }
    assert_eq!(tokens.len(), 20);
}

#[tokio::test]
async fn test_empty_search_matches_listing_and_export_covers_all() {
    let store: SharedStore = Arc::new(MemoryStore::new());
    let (queue, _jobs) = DeliveryQueue::bounded(16);
    let state = AppState::new(store, queue);
    let organizer = Uuid::new_v4();
    let event = state
        .events
        .create(organizer, event_input("Search Party"))
        .await
        .unwrap();

    for (name, email) in [
        ("John Doe", "john@example.com"),
        ("Ada Lovelace", "ada@example.com"),
        ("Alan Turing", "alan@example.com"),
    ] {
        state
            .registrations
            .register(event.id, attendee(name, email))
            .await
            .unwrap();
    }

    let listed = state
        .registrations
        .list_for_event(event.id, organizer)
        .await
        .unwrap();
    let searched = state
        .registrations
        .search(event.id, organizer, "")
        .await
        .unwrap();
    assert_eq!(searched, listed);

    let doe = state
        .registrations
        .search(event.id, organizer, "doe")
        .await
        .unwrap();
    assert_eq!(doe.len(), 1);
    assert_eq!(doe[0].full_name, "John Doe");

    let table = to_table(&listed);
    assert_eq!(table.lines().count(), listed.len() + 1);
}
