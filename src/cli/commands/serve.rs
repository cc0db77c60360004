use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{debug, error, info, trace};

use super::initdb::connect_and_migrate;
use crate::config::{initialize_app_state, Settings};
use crate::router::create_router;
use crate::services::auto_leave::watch;

pub async fn serve(settings: &Settings, with_auto_leave: bool) -> Result<()> {
    trace!("Entering serve function");
    info!("Worklog application starting up");
    debug!("Database URL: {}", settings.database_url);
    debug!("Bind address: {}", settings.bind_address);

    let db = connect_and_migrate(&settings.database_url).await?;

    // Initialize application state
    trace!("Initializing application state");
    let state = initialize_app_state(settings, db);
    debug!("Application state initialized successfully");

    if with_auto_leave {
        tokio::spawn(watch(
            state.db.clone(),
            state.auto_leave,
            state.clock.clone(),
            settings.auto_leave_poll(),
        ));
    }

    // Create router
    let app = create_router(state);
    debug!("Router created successfully");

    // Start server
    info!("Starting server on {}", settings.bind_address);
    let listener = match TcpListener::bind(&settings.bind_address).await {
        Ok(listener) => {
            debug!("Successfully bound to address: {}", settings.bind_address);
            listener
        }
        Err(e) => {
            error!("Failed to bind to address {}: {}", settings.bind_address, e);
            return Err(e.into());
        }
    };

    info!("Worklog API server running on http://{}", settings.bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", settings.bind_address);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server shutdown gracefully");
    Ok(())
}
