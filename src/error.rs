//! Domain-specific error types for the screening service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Main error type for the screening service
#[derive(Error, Debug)]
pub enum ScreeningError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Artifact error ({path}): {message}")]
    Artifact { path: String, message: String },

    #[error("Model or encoders not loaded properly")]
    ArtifactsUnavailable,

    #[error("No data provided")]
    NoData,

    #[error("Invalid JSON body: {message}")]
    InvalidJson { message: String },

    #[error("Missing required fields: {}", python_list(.fields))]
    MissingFields { fields: Vec<String> },

    #[error("Prediction failed: {message}")]
    Prediction { message: String },

    #[error("HTTP server error: {message}")]
    Server { message: String },
}

impl ScreeningError {
    /// HTTP status code reported to clients for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ScreeningError::NoData
            | ScreeningError::InvalidJson { .. }
            | ScreeningError::MissingFields { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn prediction(message: impl Into<String>) -> Self {
        ScreeningError::Prediction {
            message: message.into(),
        }
    }
}

// Field names rendered the way the legacy API reported them: ['a', 'b']
fn python_list(fields: &[String]) -> String {
    let quoted: Vec<String> = fields.iter().map(|f| format!("'{f}'")).collect();
    format!("[{}]", quoted.join(", "))
}

impl From<toml::de::Error> for ScreeningError {
    fn from(err: toml::de::Error) -> Self {
        ScreeningError::Config {
            message: err.to_string(),
        }
    }
}

/// Convert ScreeningError to the JSON error envelope `{success: false, error}`
impl IntoResponse for ScreeningError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = json!({
            "success": false,
            "error": self.to_string(),
        });
        if let ScreeningError::MissingFields { fields } = &self {
            body["missing_fields"] = json!(fields);
        }
        (status, axum::Json(body)).into_response()
    }
}

/// Result type alias for screening operations
pub type Result<T> = std::result::Result<T, ScreeningError>;
