pub mod api; // HTTP router, handlers and server lifecycle
pub mod config;
pub mod diagnosis; // Symptom extraction + disease ranking

use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::{ConfigError, ServiceConfig};
use crate::diagnosis::{load_model_bundle, SymptomScorer};

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Server error: {0}")]
    Server(#[from] api::ServerError),

    #[error("Signal handling error: {0}")]
    Signal(#[from] std::io::Error),
}

/// Initialize tracing, load the model, serve until Ctrl-C.
///
/// A model that fails to load does not stop the process: the service
/// starts degraded and reports `MODEL_UNAVAILABLE` on `/predict`.
pub async fn run() -> Result<(), StartupError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = ServiceConfig::from_env()?;
    tracing::info!(
        bind_addr = %config.bind_addr,
        model_dir = %config.model_dir.display(),
        "Configuration loaded"
    );

    // Model and vocabulary are fully loaded before the listener is bound.
    let scorer = Arc::new(SymptomScorer::from_load_result(load_model_bundle(
        &config.model_dir,
    )));

    let mut server = api::start_server_on(scorer, config.bind_addr).await?;
    tracing::info!(
        addr = %server.session.server_addr,
        session = %server.session.session_id,
        "MediBot API ready"
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("Ctrl-C received, shutting down");

    server.shutdown();
    server.stopped().await;
    Ok(())
}
