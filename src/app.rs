use std::sync::Arc;

use actix_web::web;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::application::{IngestionUseCase, InsightsUseCase};
use crate::domain::data_source::DataSource;
use crate::infrastructure::config::ConfigService;
use crate::infrastructure::data_source::HttpDataSource;
use crate::infrastructure::llm_clients::GeminiClient;
use crate::interfaces::http::{add_log, start_server, HttpState};

pub async fn run() -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let config = ConfigService::new().load().map_err(|err| {
        error!(error = %err, "Failed to load configuration");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string())
    })?;

    if !config.llm.is_enabled() {
        info!("No generation API key configured; insights will be unavailable");
    }

    let ingestion = IngestionUseCase::new(Arc::new(HttpDataSource::new()));
    let insights = InsightsUseCase::new(Arc::new(GeminiClient::new()));
    let state = web::Data::new(HttpState::new(config, ingestion, insights));

    if state.config.load_on_startup && state.config.data_source != DataSource::Unset {
        let source = state.config.data_source.clone();
        match state.load(&source).await {
            Ok(summary) => add_log(
                &state.logs,
                "INFO",
                "Startup",
                &format!("Loaded {} records from {}", summary.records, summary.source),
            ),
            // the server still starts; a later POST /api/load can retry
            Err(err) => add_log(&state.logs, "ERROR", "Startup", &err.to_string()),
        }
    }

    info!(
        host = %state.config.server.host,
        port = state.config.server.port,
        "Starting dashboard server"
    );
    start_server(state)?.await
}
