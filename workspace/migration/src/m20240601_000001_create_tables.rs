use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create accounts table
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(pk_auto(Accounts::Id))
                    .col(string(Accounts::Username).unique_key())
                    .col(string(Accounts::DisplayName))
                    .col(string(Accounts::PasswordHash))
                    .col(string_len(Accounts::Role, 16).default("employee"))
                    .col(string_len_null(Accounts::Specialization, 16))
                    .to_owned(),
            )
            .await?;

        // Create work_updates table
        manager
            .create_table(
                Table::create()
                    .table(WorkUpdates::Table)
                    .if_not_exists()
                    .col(pk_auto(WorkUpdates::Id))
                    .col(string(WorkUpdates::Username))
                    .col(string(WorkUpdates::DisplayName))
                    .col(string_len(WorkUpdates::Specialization, 16))
                    .col(date(WorkUpdates::Date))
                    .col(string(WorkUpdates::ProjectType))
                    .col(string(WorkUpdates::ProjectName).default(""))
                    .col(text(WorkUpdates::WorkDone))
                    .col(text_null(WorkUpdates::Task))
                    .col(text_null(WorkUpdates::HelpTaken))
                    .col(string_len(WorkUpdates::Status, 16))
                    .col(timestamp_with_time_zone(WorkUpdates::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_update_account")
                            .from(WorkUpdates::Table, WorkUpdates::Username)
                            .to(Accounts::Table, Accounts::Username)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Listing is always newest-created first
        manager
            .create_index(
                Index::create()
                    .name("idx_work_updates_created_at")
                    .table(WorkUpdates::Table)
                    .col(WorkUpdates::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WorkUpdates::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
    Username,
    DisplayName,
    PasswordHash,
    Role,
    Specialization,
}

#[derive(DeriveIden)]
enum WorkUpdates {
    Table,
    Id,
    Username,
    DisplayName,
    Specialization,
    Date,
    ProjectType,
    ProjectName,
    WorkDone,
    Task,
    HelpTaken,
    Status,
    CreatedAt,
}
