//! HTTP transport for the screening service
//!
//! Axum router exposing the questionnaire, the prediction endpoint and a
//! health probe. All API responses are JSON.

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::{
    config::Config,
    error::{Result, ScreeningError},
    model::Artifacts,
    page::render_index,
    questions::AQ10_QUESTIONS,
};

/// Shared state for HTTP handlers; artifacts are read-only after start-up
#[derive(Clone)]
pub struct HttpState {
    pub config: Arc<Config>,
    pub artifacts: Arc<Artifacts>,
}

impl HttpState {
    pub fn new(config: Config, artifacts: Artifacts) -> Self {
        Self {
            config: Arc::new(config),
            artifacts: Arc::new(artifacts),
        }
    }
}

/// Questionnaire page
pub async fn index_handler() -> Html<String> {
    Html(render_index(&AQ10_QUESTIONS))
}

/// Static AQ-10 question list
pub async fn questions_handler() -> impl IntoResponse {
    Json(AQ10_QUESTIONS)
}

/// Prediction endpoint
pub async fn predict_handler(State(state): State<HttpState>, body: Bytes) -> Response {
    match crate::screen(&state.artifacts, &body) {
        Ok(response) => {
            tracing::info!(
                "Prediction {} (risk {}, confidence {}%)",
                response.prediction,
                response.risk_level,
                response.confidence
            );
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            match &e {
                ScreeningError::Prediction { message } => {
                    tracing::error!("Prediction error: {}", message)
                }
                other => tracing::warn!("Rejected prediction request: {}", other),
            }
            e.into_response()
        }
    }
}

/// Health check endpoint
pub async fn health_handler(State(state): State<HttpState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "model_loaded": state.artifacts.model_loaded(),
        "encoders_loaded": state.artifacts.encoders_loaded(),
    }))
}

/// Build the application router
pub fn router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/questions", get(questions_handler))
        .route("/api/predict", post(predict_handler))
        .route("/api/health", get(health_handler))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(state)
}

/// Start the HTTP server and serve until Ctrl-C
pub async fn start_http_server(state: HttpState) -> Result<()> {
    let bind = state.config.bind_addr();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| ScreeningError::Server {
            message: format!("Failed to bind HTTP listener on {bind}: {e}"),
        })?;

    tracing::info!("Starting HTTP server on {}", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ScreeningError::Server {
            message: e.to_string(),
        })?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
