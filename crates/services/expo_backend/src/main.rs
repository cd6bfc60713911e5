// File: crates/services/expo_backend/src/main.rs
use expo_backend::{app, AppState};
use expo_common::logging;
use expo_config::load_config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Arc::new(load_config()?);

    // Keep the guard alive so buffered file output is flushed on exit.
    let _log_guard = match config.logging.as_ref() {
        Some(logging_config) => logging::init_with_config(logging_config),
        None => {
            logging::init();
            None
        }
    };

    let state = AppState::new(config.clone()).map_err(|e| {
        error!("Could not initialize services: {}", e);
        e
    })?;
    let app = app(&state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
