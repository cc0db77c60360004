use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use super::initdb::connect_and_migrate;
use crate::clock::SystemClock;
use crate::config::Settings;
use crate::services::auto_leave::{check_all_employees, watch};

pub async fn auto_leave(settings: &Settings, once: bool) -> Result<()> {
    let db = connect_and_migrate(&settings.database_url).await?;
    let policy = settings.auto_leave_policy();

    if once {
        let recorded = check_all_employees(&db, &policy, &SystemClock).await?;
        info!("Auto-leave round recorded {} leave(s)", recorded);
        return Ok(());
    }

    watch(db, policy, Arc::new(SystemClock), settings.auto_leave_poll()).await;
    Ok(())
}
