use std::collections::HashSet;

use super::ModelError;

/// Opaque probabilistic classifier over the symptom feature vector.
///
/// `features` has one 0/1 entry per vocabulary name, in vocabulary order.
/// The result has one probability per class, in label order.
pub trait SymptomClassifier: Send + Sync {
    fn predict_proba(&self, features: &[f32]) -> Result<Vec<f32>, ModelError>;
}

/// Label decoder: class index → disease name.
#[derive(Debug, Clone)]
pub struct ClassLabels {
    labels: Vec<String>,
}

impl ClassLabels {
    pub fn new(labels: Vec<String>) -> Result<Self, ModelError> {
        if labels.is_empty() {
            return Err(ModelError::InvalidLabels("no class labels".into()));
        }
        let mut seen = HashSet::with_capacity(labels.len());
        for label in &labels {
            if !seen.insert(label.as_str()) {
                return Err(ModelError::InvalidLabels(format!(
                    "duplicate label '{label}'"
                )));
            }
        }
        Ok(Self { labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn decode(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }
}

// ═══════════════════════════════════════════════════════════
// ONNX classifier — behind `onnx-classifier` feature
// ═══════════════════════════════════════════════════════════

#[cfg(feature = "onnx-classifier")]
mod onnx {
    use super::{ModelError, SymptomClassifier};
    use ort::session::Session;
    use std::path::Path;
    use std::sync::Mutex;

    /// Output holding the class probability matrix in scikit-learn exports.
    pub const PROBABILITY_OUTPUT: &str = "probabilities";

    /// Classifier backed by ONNX Runtime.
    ///
    /// Expects one float input of shape `[1, n_features]` and an output named
    /// `probabilities` of shape `[1, n_classes]`. Models exported with a
    /// different output name fall back to their last output.
    ///
    /// `Session::run` requires `&mut self`; the Mutex lets the classifier be
    /// shared behind `&self` across request handlers.
    pub struct OnnxClassifier {
        session: Mutex<Session>,
    }

    impl OnnxClassifier {
        pub fn load(model_path: &Path) -> Result<Self, ModelError> {
            if !model_path.exists() {
                return Err(ModelError::NotFound(model_path.to_path_buf()));
            }

            let session = Session::builder()
                .map_err(|e: ort::Error| ModelError::Init(e.to_string()))?
                .with_intra_threads(1)
                .map_err(|e: ort::Error| ModelError::Init(e.to_string()))?
                .commit_from_file(model_path)
                .map_err(|e: ort::Error| ModelError::Init(format!("ONNX load failed: {e}")))?;

            tracing::info!("ONNX classifier loaded from {}", model_path.display());

            Ok(Self {
                session: Mutex::new(session),
            })
        }
    }

    impl SymptomClassifier for OnnxClassifier {
        fn predict_proba(&self, features: &[f32]) -> Result<Vec<f32>, ModelError> {
            use ort::value::TensorRef;

            let input = ndarray::Array2::from_shape_vec((1, features.len()), features.to_vec())
                .map_err(|e| ModelError::Inference(e.to_string()))?;
            let tensor = TensorRef::from_array_view(&input)
                .map_err(|e| ModelError::Inference(e.to_string()))?;

            let mut session = self
                .session
                .lock()
                .map_err(|_| ModelError::Inference("Session lock poisoned".to_string()))?;

            let outputs = session
                .run(ort::inputs![tensor])
                .map_err(|e| ModelError::Inference(format!("ONNX inference failed: {e}")))?;

            let value = match outputs.get(PROBABILITY_OUTPUT) {
                Some(value) => value,
                None => {
                    let last = outputs
                        .len()
                        .checked_sub(1)
                        .ok_or_else(|| ModelError::Inference("model produced no outputs".into()))?;
                    &outputs[last]
                }
            };

            let (shape, data) = value
                .try_extract_tensor::<f32>()
                .map_err(|e| ModelError::Inference(format!("Output extraction: {e}")))?;

            if shape.len() != 2 || shape[0] != 1 {
                return Err(ModelError::Inference(format!(
                    "Unexpected output shape: {shape:?}, expected [1, n_classes]"
                )));
            }

            Ok(data.to_vec())
        }
    }
}

#[cfg(feature = "onnx-classifier")]
pub use onnx::OnnxClassifier;

/// Test double returning a fixed probability vector.
/// Remembers the last feature vector it was asked about.
#[cfg(test)]
pub struct MockClassifier {
    probabilities: Vec<f32>,
    last_features: std::sync::Mutex<Option<Vec<f32>>>,
}

#[cfg(test)]
impl MockClassifier {
    pub fn new(probabilities: Vec<f32>) -> Self {
        Self {
            probabilities,
            last_features: std::sync::Mutex::new(None),
        }
    }

    pub fn last_features(&self) -> Option<Vec<f32>> {
        self.last_features.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl SymptomClassifier for MockClassifier {
    fn predict_proba(&self, features: &[f32]) -> Result<Vec<f32>, ModelError> {
        *self.last_features.lock().unwrap() = Some(features.to_vec());
        Ok(self.probabilities.clone())
    }
}

#[cfg(test)]
impl SymptomClassifier for std::sync::Arc<MockClassifier> {
    fn predict_proba(&self, features: &[f32]) -> Result<Vec<f32>, ModelError> {
        (**self).predict_proba(features)
    }
}
