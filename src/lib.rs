pub mod api; // Local HTTP API
pub mod config;
pub mod core_state; // Transport-agnostic session state
pub mod export;
pub mod models;
pub mod pipeline;

use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::pipeline::documentation::{BackendError, DocumentationService, GeminiClient};

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Cannot create AI client: {0}")]
    Backend(#[from] BackendError),
    #[error("Cannot start async runtime: {0}")]
    Runtime(std::io::Error),
    #[error("{0}")]
    Server(String),
}

pub fn run() -> Result<(), StartupError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = config::AppConfig::from_env()?;

    // The blocking client owns its own runtime and must be built outside tokio.
    let client = GeminiClient::new(&config.api_base, &config.api_key, config.request_timeout_secs)?;
    let service = Arc::new(DocumentationService::new(Arc::new(client), config.model.clone()));
    let core = Arc::new(core_state::CoreState::new(service));

    tracing::info!(
        model = %config.model,
        timeout_secs = ?config.request_timeout_secs,
        "Documentation service ready"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(StartupError::Runtime)?;

    // `core` outlives the runtime so the blocking client is never dropped inside it.
    let server_core = Arc::clone(&core);
    let result = runtime.block_on(async move {
        let mut server = api::start_api_server(server_core, config.bind_addr)
            .await
            .map_err(StartupError::Server)?;
        tracing::info!(addr = %server.addr, "Listening, press Ctrl+C to stop");

        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Cannot listen for Ctrl+C: {e}");
        }
        server.shutdown();
        server.wait().await;
        Ok::<(), StartupError>(())
    });

    drop(runtime);
    drop(core);
    result
}
