use crate::entity_iden::EntityIden;
use model::entities::prelude::*;
use model::entities::work_update;
use sea_orm_migration::prelude::*;

const INDEX_NAME: &str = "idx_work_updates_username_date";

/// Moves the one-update-per-day rule into the store.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name(INDEX_NAME)
                    .table(WorkUpdate::table())
                    .col(WorkUpdate::column(work_update::Column::Username))
                    .col(WorkUpdate::column(work_update::Column::Date))
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(INDEX_NAME)
                    .table(WorkUpdate::table())
                    .to_owned(),
            )
            .await
    }
}
