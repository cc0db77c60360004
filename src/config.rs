use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use compute::{AutoLeavePolicy, EditWindow};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use tracing::{debug, info};

use crate::auth::SessionStore;
use crate::clock::SystemClock;
use crate::schemas::AppState;

/// Runtime settings.
///
/// Sources, later ones winning: built-in defaults, an optional `worklog.toml`
/// (or any format the `config` crate understands) in the working directory,
/// then `WORKLOG_*` environment variables such as `WORKLOG_EDIT_WINDOW_SECS`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,
    /// Idle time after which a login session expires
    pub session_ttl_secs: u64,
    /// How long after creation a work update stays editable
    pub edit_window_secs: i64,
    /// Local hour from which a missing update is recorded as leave
    pub auto_leave_cutoff_hour: u32,
    /// Interval of the auto-leave watcher
    pub auto_leave_poll_secs: u64,
}

impl Settings {
    /// Reads settings. `.env` is loaded by the binary before this runs.
    pub fn load() -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("database_url", "sqlite://worklog.db?mode=rwc")?
            .set_default("bind_address", "0.0.0.0:5000")?
            .set_default("session_ttl_secs", 12 * 60 * 60)?
            .set_default("edit_window_secs", compute::rules::DEFAULT_EDIT_WINDOW_SECS)?
            .set_default("auto_leave_cutoff_hour", i64::from(compute::auto_leave::DEFAULT_CUTOFF_HOUR))?
            .set_default("auto_leave_poll_secs", 5 * 60)?
            .add_source(config::File::with_name("worklog").required(false))
            .add_source(config::Environment::with_prefix("WORKLOG"))
            .build()?
            .try_deserialize::<Settings>()?;

        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    /// Replaces the configured database URL when a command-line value is given
    pub fn override_database_url(&mut self, database_url: Option<String>) {
        if let Some(url) = database_url {
            self.database_url = url;
        }
    }

    pub fn edit_window(&self) -> EditWindow {
        EditWindow::from_secs(self.edit_window_secs)
    }

    pub fn auto_leave_policy(&self) -> AutoLeavePolicy {
        AutoLeavePolicy::new(self.auto_leave_cutoff_hour)
    }

    pub fn auto_leave_poll(&self) -> Duration {
        Duration::from_secs(self.auto_leave_poll_secs.max(1))
    }
}

/// Build the shared handler state around an already migrated connection
pub fn initialize_app_state(settings: &Settings, db: DatabaseConnection) -> AppState {
    info!(
        "Application state ready: edit window {}s, auto-leave cutoff {}:00",
        settings.edit_window_secs, settings.auto_leave_cutoff_hour
    );

    AppState {
        db,
        sessions: SessionStore::new(Duration::from_secs(settings.session_ttl_secs)),
        clock: Arc::new(SystemClock),
        edit_window: settings.edit_window(),
        auto_leave: settings.auto_leave_policy(),
    }
}
