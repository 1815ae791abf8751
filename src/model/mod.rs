//! Loaded model collaborators: the classifier, the categorical encoders and
//! the start-up state that owns them.

pub mod artifacts;
pub mod classifier;
pub mod encoder;

pub use artifacts::Artifacts;
pub use classifier::{Classifier, Estimator, ModelArtifact, ModelError, Tree};
pub use encoder::{CategoricalEncoder, CategoricalField, EncodeError, EncoderSet, LabelEncoder};
