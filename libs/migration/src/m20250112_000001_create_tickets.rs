use sea_orm_migration::sea_query::extension::postgres::Type;
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create ticket_status enum
        manager
            .create_type(
                Type::create()
                    .as_enum(TicketStatus::Enum)
                    .values([
                        TicketStatus::Issued,
                        TicketStatus::Used,
                        TicketStatus::Cancelled,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tickets::Table)
                    .if_not_exists()
                    .col(pk_uuid(Tickets::Id))
                    .col(uuid(Tickets::RegistrationId))
                    .col(uuid(Tickets::EventId))
                    .col(string(Tickets::ParticipantName))
                    .col(string(Tickets::ParticipantEmail))
                    .col(string(Tickets::QrCode))
                    .col(
                        ColumnDef::new(Tickets::Status)
                            .enumeration(
                                TicketStatus::Enum,
                                [
                                    TicketStatus::Issued,
                                    TicketStatus::Used,
                                    TicketStatus::Cancelled,
                                ],
                            )
                            .not_null()
                            .default("issued"),
                    )
                    .col(
                        timestamp_with_time_zone(Tickets::IssuedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(timestamp_with_time_zone_null(Tickets::UsedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_registration_id")
                            .from(Tickets::Table, Tickets::RegistrationId)
                            .to(Registrations::Table, Registrations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_event_id")
                            .from(Tickets::Table, Tickets::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One ticket per registration
        manager
            .create_index(
                Index::create()
                    .name("uq_tickets_registration_id")
                    .table(Tickets::Table)
                    .col(Tickets::RegistrationId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // QR payload is the validation lookup key and must be globally unique
        manager
            .create_index(
                Index::create()
                    .name("uq_tickets_qr_code")
                    .table(Tickets::Table)
                    .col(Tickets::QrCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tickets_event_id")
                    .table(Tickets::Table)
                    .col(Tickets::EventId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tickets_participant_email")
                    .table(Tickets::Table)
                    .col(Tickets::ParticipantEmail)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tickets::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(TicketStatus::Enum).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Tickets {
    Table,
    Id,
    RegistrationId,
    EventId,
    ParticipantName,
    ParticipantEmail,
    QrCode,
    Status,
    IssuedAt,
    UsedAt,
}

#[derive(DeriveIden)]
enum TicketStatus {
    #[sea_orm(iden = "ticket_status")]
    Enum,
    #[sea_orm(iden = "issued")]
    Issued,
    #[sea_orm(iden = "used")]
    Used,
    #[sea_orm(iden = "cancelled")]
    Cancelled,
}

#[derive(DeriveIden)]
enum Registrations {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
}
