//! AQ-10 screening service entry point

use anyhow::Result;
use aq_screen::{config::Config, http::HttpState, model::Artifacts};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    aq_screen::init_tracing(&config.runtime.log_filter);
    config.log_fallbacks();

    info!("Starting AQ-10 screening service");
    info!(
        "Artifacts: model={}, encoders={}",
        config.artifacts.model_path.display(),
        config.artifacts.encoders_path.display()
    );

    // A failed load still starts the server; /api/predict then reports unavailable
    let artifacts = Artifacts::load(&config.artifacts.model_path, &config.artifacts.encoders_path);
    if !artifacts.model_loaded() {
        tracing::warn!("Serving without a model; predictions will fail until restart");
    }

    aq_screen::http::start_http_server(HttpState::new(config, artifacts)).await?;

    Ok(())
}
