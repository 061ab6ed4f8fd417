use crate::models::TicketStatus;
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

/// SeaORM Entity for the tickets table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tickets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub registration_id: Uuid,
    pub event_id: Uuid,
    pub participant_name: String,
    pub participant_email: String,
    #[sea_orm(unique)]
    pub qr_code: String,
    pub status: TicketStatus,
    pub issued_at: DateTimeWithTimeZone,
    pub used_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// Conversion from SeaORM Model to domain Ticket
impl From<Model> for crate::models::Ticket {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            registration_id: model.registration_id,
            event_id: model.event_id,
            participant_name: model.participant_name,
            participant_email: model.participant_email,
            qr_code: model.qr_code,
            status: model.status,
            issued_at: model.issued_at.into(),
            used_at: model.used_at.map(Into::into),
        }
    }
}

// Conversion from domain Ticket to SeaORM ActiveModel
impl From<&crate::models::Ticket> for ActiveModel {
    fn from(ticket: &crate::models::Ticket) -> Self {
        ActiveModel {
            id: Set(ticket.id),
            registration_id: Set(ticket.registration_id),
            event_id: Set(ticket.event_id),
            participant_name: Set(ticket.participant_name.clone()),
            participant_email: Set(ticket.participant_email.clone()),
            qr_code: Set(ticket.qr_code.clone()),
            status: Set(ticket.status),
            issued_at: Set(ticket.issued_at.into()),
            used_at: Set(ticket.used_at.map(Into::into)),
        }
    }
}
