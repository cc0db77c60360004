use anyhow::Result;
use tracing::info;

use super::initdb::connect_and_migrate;
use crate::services::accounts::{upsert_account, SeedAccount};

pub async fn create_account(database_url: &str, seed: SeedAccount) -> Result<()> {
    let db = connect_and_migrate(database_url).await?;
    let account = upsert_account(&db, seed).await?;
    info!(
        "Account {} ({}) is ready with role {}",
        account.username, account.display_name, account.role
    );
    Ok(())
}
