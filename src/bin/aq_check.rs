//! Artifact and request checker for the AQ-10 screening service.
//!
//! Usage:
//!   cargo run --bin aq-check -- artifacts
//!   cargo run --bin aq-check -- predict request.json

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use aq_screen::{config::Config, model::Artifacts};

#[derive(Parser)]
#[command(name = "aq-check")]
#[command(about = "AQ-10 screening artifact utilities", long_about = None)]
struct Cli {
    /// Override the model artifact path from the configuration
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    /// Override the encoders artifact path from the configuration
    #[arg(long, global = true)]
    encoders: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load both artifacts and report what was found
    Artifacts,
    /// Run one JSON request file through the prediction path
    Predict {
        /// Request body file
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    aq_screen::init_tracing(&config.runtime.log_filter);
    config.log_fallbacks();
    if let Some(model) = cli.model {
        config.artifacts.model_path = model;
    }
    if let Some(encoders) = cli.encoders {
        config.artifacts.encoders_path = encoders;
    }

    match cli.command {
        Commands::Artifacts => check_artifacts(&config),
        Commands::Predict { file } => predict_file(&config, &file),
    }
}

/// Load the artifacts strictly, surfacing the first failure
fn check_artifacts(config: &Config) -> Result<()> {
    let artifacts =
        Artifacts::try_load(&config.artifacts.model_path, &config.artifacts.encoders_path)?;
    let (model, encoders) = artifacts.require()?;

    println!("model:    {} ({})", config.artifacts.model_path.display(), model.kind());
    println!("classes:  {:?}", model.classes());
    println!(
        "encoders: {} ({} columns: {})",
        config.artifacts.encoders_path.display(),
        encoders.len(),
        encoders.columns().join(", ")
    );
    Ok(())
}

fn predict_file(config: &Config, file: &Path) -> Result<()> {
    let body = std::fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let artifacts = Artifacts::load(&config.artifacts.model_path, &config.artifacts.encoders_path);

    match aq_screen::screen(&artifacts, &body) {
        Ok(response) => println!("{}", serde_json::to_string_pretty(&response)?),
        Err(e) => anyhow::bail!("request rejected with status {}: {}", e.status().as_u16(), e),
    }
    Ok(())
}
