use sea_orm_migration::sea_query::extension::postgres::Type;
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create registration_status enum
        manager
            .create_type(
                Type::create()
                    .as_enum(RegistrationStatus::Enum)
                    .values([
                        RegistrationStatus::Waitlist,
                        RegistrationStatus::Approved,
                        RegistrationStatus::Rejected,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Registrations::Table)
                    .if_not_exists()
                    .col(pk_uuid(Registrations::Id))
                    .col(uuid(Registrations::EventId))
                    .col(string(Registrations::Name))
                    .col(string(Registrations::Email))
                    .col(
                        ColumnDef::new(Registrations::Status)
                            .enumeration(
                                RegistrationStatus::Enum,
                                [
                                    RegistrationStatus::Waitlist,
                                    RegistrationStatus::Approved,
                                    RegistrationStatus::Rejected,
                                ],
                            )
                            .not_null()
                            .default("waitlist"),
                    )
                    .col(
                        timestamp_with_time_zone(Registrations::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_registrations_event_id")
                            .from(Registrations::Table, Registrations::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_registrations_event_id")
                    .table(Registrations::Table)
                    .col(Registrations::EventId)
                    .to_owned(),
            )
            .await?;

        // One application per person per event
        manager
            .create_index(
                Index::create()
                    .name("uq_registrations_event_email")
                    .table(Registrations::Table)
                    .col(Registrations::EventId)
                    .col(Registrations::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Registrations::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(RegistrationStatus::Enum).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Registrations {
    Table,
    Id,
    EventId,
    Name,
    Email,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum RegistrationStatus {
    #[sea_orm(iden = "registration_status")]
    Enum,
    #[sea_orm(iden = "waitlist")]
    Waitlist,
    #[sea_orm(iden = "approved")]
    Approved,
    #[sea_orm(iden = "rejected")]
    Rejected,
}

#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
}
