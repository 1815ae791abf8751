pub mod config;
pub mod error;
pub mod features;
pub mod http;
pub mod model;
pub mod page;
pub mod predictor;
pub mod questions;
pub mod request;
pub mod responder;

use crate::error::Result;
use crate::model::Artifacts;
use crate::request::PredictionRequest;
use crate::responder::PredictionResponse;

/// Run one raw request body through the whole prediction path:
/// validate, build features, infer, compose the response.
///
/// Artifact availability is checked before the body is looked at.
pub fn screen(artifacts: &Artifacts, body: &[u8]) -> Result<PredictionResponse> {
    let (model, encoders) = artifacts.require()?;
    let request = PredictionRequest::from_body(body)?;

    let features = features::build_features(&request, encoders)?;
    let prediction = predictor::predict(model, &features)?;
    let aq_total = features::aq_total_score(&request)?;
    tracing::debug!("AQ total score: {}", aq_total);

    Ok(responder::respond(&prediction, aq_total, &request))
}

/// Initialise the fmt subscriber with the given `EnvFilter` directive
pub fn init_tracing(filter: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .try_init();
}
