//! Read-only view of the registration subsystem.
//!
//! Events and registrations are owned elsewhere; this core only resolves
//! them through the narrow [`EventDirectory`] port. Nothing here mutates.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::TicketResult;

/// Registration status, owned by the registration subsystem.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
    TS,
)]
#[ts(export)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "registration_status")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RegistrationStatus {
    #[sea_orm(string_value = "waitlist")]
    Waitlist,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// An event, as far as ticketing needs to know it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub organizer_id: Uuid,
    pub starts_at: DateTime<Utc>,
    pub location: String,
}

/// A person's application to attend one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub email: String,
    pub status: RegistrationStatus,
}

/// Read port over events and registrations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventDirectory: Send + Sync {
    /// Resolve an event by ID.
    async fn event_by_id(&self, id: Uuid) -> TicketResult<Option<Event>>;

    /// Resolve a registration by ID.
    async fn registration_by_id(&self, id: Uuid) -> TicketResult<Option<Registration>>;

    /// All `approved` registrations for an event.
    async fn approved_registrations(&self, event_id: Uuid) -> TicketResult<Vec<Registration>>;
}
