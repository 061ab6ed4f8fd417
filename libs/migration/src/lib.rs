pub use sea_orm_migration::prelude::*;

mod m20250110_000001_create_events;
mod m20250110_000002_create_registrations;
mod m20250112_000001_create_tickets;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250110_000001_create_events::Migration),
            Box::new(m20250110_000002_create_registrations::Migration),
            Box::new(m20250112_000001_create_tickets::Migration),
        ]
    }
}
