#[cfg(test)]
pub mod test_utils {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::auth::SessionStore;
    use crate::clock::FixedClock;
    use crate::router::create_router;
    use crate::schemas::AppState;
    use crate::services::accounts::{upsert_account, SeedAccount};
    use axum::http::{header::AUTHORIZATION, HeaderName, HeaderValue};
    use axum::Router;
    use chrono::{DateTime, TimeZone, Utc};
    use compute::{AutoLeavePolicy, EditWindow};
    use migration::{Migrator, MigratorTrait};
    use model::entities::account::{Role, Specialization};
    use sea_orm::{Database, DatabaseConnection};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    pub const ADMIN: (&str, &str) = ("admin", "admin-secret");
    pub const ALICE: (&str, &str) = ("alice", "alice-secret");
    pub const BOB: (&str, &str) = ("bob", "bob-secret");

    /// Monday 2024-06-10 10:00 UTC
    pub fn test_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 10, 0, 0).unwrap()
    }

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    async fn seed(
        db: &DatabaseConnection,
        (username, secret): (&str, &str),
        role: Role,
        specialization: Option<Specialization>,
    ) {
        upsert_account(
            db,
            SeedAccount {
                username: username.to_string(),
                secret: secret.to_string(),
                display_name: None,
                role,
                specialization,
            },
        )
        .await
        .expect("Failed to seed account");
    }

    /// Create AppState for testing with an admin, a software employee
    /// (alice) and a hardware employee (bob). The returned clock drives
    /// every time-dependent rule.
    pub async fn setup_test_app_state() -> (AppState, Arc<FixedClock>) {
        let db = setup_test_db().await;

        seed(&db, ADMIN, Role::Admin, None).await;
        seed(&db, ALICE, Role::Employee, Some(Specialization::Software)).await;
        seed(&db, BOB, Role::Employee, Some(Specialization::Hardware)).await;

        let clock = Arc::new(FixedClock::new(test_start()));
        let state = AppState {
            db,
            sessions: SessionStore::new(Duration::from_secs(60 * 60)),
            clock: clock.clone(),
            edit_window: EditWindow::from_secs(compute::rules::DEFAULT_EDIT_WINDOW_SECS),
            auto_leave: AutoLeavePolicy::new(compute::auto_leave::DEFAULT_CUTOFF_HOUR),
        };
        (state, clock)
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is taken from RUST_LOG and defaults to WARN.
    pub fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create axum app for testing along with its clock
    pub async fn setup_test_app() -> (Router, Arc<FixedClock>) {
        let (state, clock) = setup_test_app_state().await;
        (create_router(state), clock)
    }

    /// `Authorization` header for a bearer token
    pub fn bearer(token: &str) -> (HeaderName, HeaderValue) {
        let value = HeaderValue::from_str(&format!("Bearer {}", token))
            .expect("Token is not a valid header value");
        (AUTHORIZATION, value)
    }
}
