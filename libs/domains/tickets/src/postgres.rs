//! PostgreSQL implementations of the domain ports.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::{
    directory::{Event, EventDirectory, Registration, RegistrationStatus},
    entity,
    error::TicketResult,
    models::{Ticket, TicketStatus},
    repository::TicketRepository,
};

pub struct PgTicketRepository {
    db: DatabaseConnection,
}

impl PgTicketRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TicketRepository for PgTicketRepository {
    async fn insert(&self, ticket: &Ticket) -> TicketResult<()> {
        let active_model: entity::ticket::ActiveModel = ticket.into();
        entity::ticket::Entity::insert(active_model)
            .exec(&self.db)
            .await?;

        tracing::info!(ticket_id = %ticket.id, registration_id = %ticket.registration_id, "Created ticket");
        Ok(())
    }

    async fn insert_many(&self, tickets: &[Ticket]) -> TicketResult<()> {
        if tickets.is_empty() {
            return Ok(());
        }

        let models: Vec<entity::ticket::ActiveModel> = tickets.iter().map(Into::into).collect();
        entity::ticket::Entity::insert_many(models)
            .exec(&self.db)
            .await?;

        tracing::info!(count = tickets.len(), "Created tickets in batch");
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> TicketResult<Option<Ticket>> {
        let model = entity::ticket::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn find_by_qr(&self, qr_code: &str) -> TicketResult<Option<Ticket>> {
        let model = entity::ticket::Entity::find()
            .filter(entity::ticket::Column::QrCode.eq(qr_code))
            .one(&self.db)
            .await?;
        Ok(model.map(Into::into))
    }

    async fn find_by_registration(&self, registration_id: Uuid) -> TicketResult<Option<Ticket>> {
        let model = entity::ticket::Entity::find()
            .filter(entity::ticket::Column::RegistrationId.eq(registration_id))
            .one(&self.db)
            .await?;
        Ok(model.map(Into::into))
    }

    async fn list_by_event(&self, event_id: Uuid) -> TicketResult<Vec<Ticket>> {
        let models = entity::ticket::Entity::find()
            .filter(entity::ticket::Column::EventId.eq(event_id))
            .order_by_asc(entity::ticket::Column::IssuedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn list_by_email(&self, email: &str) -> TicketResult<Vec<Ticket>> {
        let models = entity::ticket::Entity::find()
            .filter(entity::ticket::Column::ParticipantEmail.eq(email))
            .order_by_desc(entity::ticket::Column::IssuedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn mark_used(&self, id: Uuid, used_at: DateTime<Utc>) -> TicketResult<bool> {
        // Single conditional UPDATE: the row count decides who won a
        // concurrent double-scan. A separate read-then-write here would
        // lose updates under concurrency.
        let result = entity::ticket::Entity::update_many()
            .col_expr(entity::ticket::Column::Status, Expr::value(TicketStatus::Used))
            .col_expr(entity::ticket::Column::UsedAt, Expr::value(Some(used_at)))
            .filter(entity::ticket::Column::Id.eq(id))
            .filter(entity::ticket::Column::Status.eq(TicketStatus::Issued))
            .exec(&self.db)
            .await?;

        let won = result.rows_affected == 1;
        if won {
            tracing::info!(ticket_id = %id, "Ticket marked used");
        } else {
            tracing::info!(ticket_id = %id, "Ticket was not in issued state; mark_used skipped");
        }
        Ok(won)
    }

    async fn cancel(&self, id: Uuid) -> TicketResult<bool> {
        // used_at is cleared so that it is set exactly when status is `used`
        let result = entity::ticket::Entity::update_many()
            .col_expr(
                entity::ticket::Column::Status,
                Expr::value(TicketStatus::Cancelled),
            )
            .col_expr(
                entity::ticket::Column::UsedAt,
                Expr::value(Option::<DateTime<Utc>>::None),
            )
            .filter(entity::ticket::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        tracing::info!(ticket_id = %id, "Ticket cancelled");
        Ok(result.rows_affected > 0)
    }
}

pub struct PgEventDirectory {
    db: DatabaseConnection,
}

impl PgEventDirectory {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EventDirectory for PgEventDirectory {
    async fn event_by_id(&self, id: Uuid) -> TicketResult<Option<Event>> {
        let model = entity::event::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn registration_by_id(&self, id: Uuid) -> TicketResult<Option<Registration>> {
        let model = entity::registration::Entity::find_by_id(id)
            .one(&self.db)
            .await?;
        Ok(model.map(Into::into))
    }

    async fn approved_registrations(&self, event_id: Uuid) -> TicketResult<Vec<Registration>> {
        let models = entity::registration::Entity::find()
            .filter(entity::registration::Column::EventId.eq(event_id))
            .filter(entity::registration::Column::Status.eq(RegistrationStatus::Approved))
            .order_by_asc(entity::registration::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }
}
