pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_tables;
mod m20240615_000001_unique_daily_update;
pub mod entity_iden;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_tables::Migration),
            Box::new(m20240615_000001_unique_daily_update::Migration),
        ]
    }
}
