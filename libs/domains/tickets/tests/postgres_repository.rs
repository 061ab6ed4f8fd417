//! PostgreSQL repository integration tests.
//!
//! These need a local Docker daemon for the testcontainers PostgreSQL image;
//! run them explicitly with `cargo test -p domain_tickets -- --ignored`.

use chrono::Utc;
use domain_tickets::entity;
use domain_tickets::{
    PgTicketRepository, Registration, RegistrationStatus, Ticket, TicketRepository, TicketStatus,
};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection};
use test_utils::TestDatabase;
use uuid::Uuid;

async fn seed_registration(db: &DatabaseConnection) -> Registration {
    let organizer_id = Uuid::new_v4();
    let event_id = Uuid::new_v4();

    entity::event::ActiveModel {
        id: Set(event_id),
        title: Set("Integration Night".to_string()),
        organizer_id: Set(organizer_id),
        starts_at: Set(Utc::now().into()),
        location: Set("Hall B".to_string()),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await
    .expect("Failed to seed event");

    let registration = Registration {
        id: Uuid::new_v4(),
        event_id,
        name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        status: RegistrationStatus::Approved,
    };

    entity::registration::ActiveModel {
        id: Set(registration.id),
        event_id: Set(registration.event_id),
        name: Set(registration.name.clone()),
        email: Set(registration.email.clone()),
        status: Set(registration.status),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await
    .expect("Failed to seed registration");

    registration
}

#[tokio::test]
#[ignore = "requires a local Docker daemon"]
async fn ticket_roundtrip_through_postgres() {
    let db = TestDatabase::new().await;
    let registration = seed_registration(&db.connection).await;
    let repository = PgTicketRepository::new(db.connection.clone());

    let ticket = Ticket::issue(&registration, "integration-qr-token".to_string());
    repository.insert(&ticket).await.unwrap();

    let found = repository
        .find_by_qr("integration-qr-token")
        .await
        .unwrap()
        .expect("ticket should be found by QR");
    assert_eq!(found.id, ticket.id);
    assert_eq!(found.status, TicketStatus::Issued);

    let by_registration = repository
        .find_by_registration(registration.id)
        .await
        .unwrap();
    assert!(by_registration.is_some());
}

#[tokio::test]
#[ignore = "requires a local Docker daemon"]
async fn mark_used_is_a_one_shot_transition() {
    let db = TestDatabase::new().await;
    let registration = seed_registration(&db.connection).await;
    let repository = PgTicketRepository::new(db.connection.clone());

    let ticket = Ticket::issue(&registration, "one-shot-qr".to_string());
    repository.insert(&ticket).await.unwrap();

    let now = Utc::now();
    assert!(repository.mark_used(ticket.id, now).await.unwrap());
    // Second attempt loses: the row is no longer `issued`
    assert!(!repository.mark_used(ticket.id, Utc::now()).await.unwrap());

    let used = repository.find_by_id(ticket.id).await.unwrap().unwrap();
    assert_eq!(used.status, TicketStatus::Used);
    assert!(used.used_at.is_some());
}

#[tokio::test]
#[ignore = "requires a local Docker daemon"]
async fn concurrent_scans_validate_at_most_once() {
    let db = TestDatabase::new().await;
    let registration = seed_registration(&db.connection).await;
    let repository = PgTicketRepository::new(db.connection.clone());

    let ticket = Ticket::issue(&registration, "race-qr".to_string());
    repository.insert(&ticket).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let repo = PgTicketRepository::new(db.connection.clone());
        let id = ticket.id;
        handles.push(tokio::spawn(
            async move { repo.mark_used(id, Utc::now()).await },
        ));
    }

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap() {
            winners += 1;
        }
    }

    assert_eq!(winners, 1);
}

#[tokio::test]
#[ignore = "requires a local Docker daemon"]
async fn cancel_clears_used_at() {
    let db = TestDatabase::new().await;
    let registration = seed_registration(&db.connection).await;
    let repository = PgTicketRepository::new(db.connection.clone());

    let ticket = Ticket::issue(&registration, "cancel-qr".to_string());
    repository.insert(&ticket).await.unwrap();
    assert!(repository.mark_used(ticket.id, Utc::now()).await.unwrap());

    assert!(repository.cancel(ticket.id).await.unwrap());

    let cancelled = repository.find_by_id(ticket.id).await.unwrap().unwrap();
    assert_eq!(cancelled.status, TicketStatus::Cancelled);
    assert!(cancelled.used_at.is_none());
}
