//! Start-up artifact loading.
//!
//! `Artifacts` is built once before the server starts and shared read-only
//! with every handler. A failed load leaves both artifacts absent; the
//! process keeps serving and prediction requests fail fast.

use std::path::Path;

use crate::error::{Result, ScreeningError};
use crate::model::{Classifier, EncoderSet, ModelArtifact};

pub struct Artifacts {
    model: Option<Box<dyn Classifier>>,
    encoders: Option<EncoderSet>,
}

impl Artifacts {
    /// Load both artifacts, degrading to the unavailable state on any error
    pub fn load(model_path: &Path, encoders_path: &Path) -> Self {
        match Self::try_load(model_path, encoders_path) {
            Ok(artifacts) => {
                if let Some(model) = &artifacts.model {
                    tracing::info!("Model and encoders loaded successfully");
                    tracing::info!("Model type: {}", model.kind());
                }
                if let Some(encoders) = &artifacts.encoders {
                    tracing::info!("Available encoders: {:?}", encoders.columns());
                }
                artifacts
            }
            Err(e) => {
                tracing::error!("Error loading model or encoders: {}", e);
                Self::unavailable()
            }
        }
    }

    /// Load both artifacts, surfacing the first failure
    pub fn try_load(model_path: &Path, encoders_path: &Path) -> Result<Self> {
        let model_src = read_artifact(model_path)?;
        let model = ModelArtifact::from_json(&model_src).map_err(|e| ScreeningError::Artifact {
            path: model_path.display().to_string(),
            message: e.to_string(),
        })?;

        let encoders_src = read_artifact(encoders_path)?;
        let encoders =
            EncoderSet::from_json(&encoders_src).map_err(|e| ScreeningError::Artifact {
                path: encoders_path.display().to_string(),
                message: e.to_string(),
            })?;

        Ok(Self::from_parts(model, encoders))
    }

    pub fn from_parts(model: impl Classifier + 'static, encoders: EncoderSet) -> Self {
        Self {
            model: Some(Box::new(model)),
            encoders: Some(encoders),
        }
    }

    /// Sentinel state used when loading failed
    pub fn unavailable() -> Self {
        Self {
            model: None,
            encoders: None,
        }
    }

    pub fn model_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn encoders_loaded(&self) -> bool {
        self.encoders.is_some()
    }

    /// Both artifacts, or `ArtifactsUnavailable`
    pub fn require(&self) -> Result<(&dyn Classifier, &EncoderSet)> {
        match (&self.model, &self.encoders) {
            (Some(model), Some(encoders)) => Ok((model.as_ref(), encoders)),
            _ => Err(ScreeningError::ArtifactsUnavailable),
        }
    }
}

impl std::fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifacts")
            .field("model", &self.model.as_ref().map(|m| m.kind()))
            .field("encoders", &self.encoders)
            .finish()
    }
}

fn read_artifact(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| ScreeningError::Artifact {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
