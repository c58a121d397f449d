//! Symptom-to-diagnosis core.
//!
//! Raw text flows through the `SymptomExtractor` into a canonical symptom
//! set, which the `SymptomScorer` turns into a feature vector, runs through
//! the opaque `SymptomClassifier`, and ranks into at most three predictions.

pub mod classifier;
pub mod extractor;
pub mod loader;
pub mod scorer;
pub mod vocabulary;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use classifier::{ClassLabels, SymptomClassifier};
pub use extractor::{CanonicalSymptoms, SymptomExtractor};
pub use loader::{load_model_bundle, ModelBundle};
pub use scorer::SymptomScorer;
pub use vocabulary::Vocabulary;

/// User-facing message returned when no known symptom could be extracted.
pub const NO_SYMPTOMS_MESSAGE: &str = "I couldn't identify any specific symptoms. \
Please describe them clearly (e.g., 'high fever, headache').";

/// A single ranked diagnosis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub disease: String,
    pub confidence: f32,
}

/// Errors raised while loading the model artifacts at startup.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Model artifact not found: {0}")]
    NotFound(PathBuf),

    #[error("Malformed model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid vocabulary: {0}")]
    InvalidVocabulary(String),

    #[error("Invalid class labels: {0}")]
    InvalidLabels(String),

    #[error("Classifier initialization: {0}")]
    Init(String),

    #[error("Classifier inference: {0}")]
    Inference(String),

    #[error("Built without ONNX support (enable the `onnx-classifier` feature)")]
    Unsupported,
}

/// Outcome kinds of `SymptomScorer::predict` other than a ranked list.
#[derive(Error, Debug)]
pub enum PredictError {
    /// The classifier failed to load at startup; no inference is attempted.
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// Extraction found nothing in the vocabulary. A normal negative result.
    #[error("{message}")]
    NoSymptomsFound {
        message: String,
        original_input: Vec<String>,
    },

    #[error("Inference failed: {0}")]
    Inference(String),
}

impl From<ModelError> for PredictError {
    fn from(err: ModelError) -> Self {
        PredictError::Inference(err.to_string())
    }
}
