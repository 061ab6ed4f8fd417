use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM Entity for the events table (read-only to this domain)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub organizer_id: Uuid,
    pub starts_at: DateTimeWithTimeZone,
    pub location: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::directory::Event {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            organizer_id: model.organizer_id,
            starts_at: model.starts_at.into(),
            location: model.location,
        }
    }
}
