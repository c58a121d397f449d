use std::cmp::Ordering;

use super::extractor::CanonicalSymptoms;
use super::loader::ModelBundle;
use super::{ModelError, PredictError, Prediction, NO_SYMPTOMS_MESSAGE};

/// Maximum number of diagnoses returned per request.
pub const TOP_K: usize = 3;

enum ScorerState {
    Ready(ModelBundle),
    Unavailable { reason: String },
}

/// Turns raw symptom text into ranked diagnoses.
///
/// Constructed once at startup and shared read-only. When the model failed
/// to load, the scorer is built degraded and every call reports
/// `ModelUnavailable`.
pub struct SymptomScorer {
    state: ScorerState,
}

impl SymptomScorer {
    pub fn new(bundle: ModelBundle) -> Self {
        Self {
            state: ScorerState::Ready(bundle),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            state: ScorerState::Unavailable {
                reason: reason.into(),
            },
        }
    }

    /// Ready scorer on success, degraded scorer on a load error.
    pub fn from_load_result(result: Result<ModelBundle, ModelError>) -> Self {
        match result {
            Ok(bundle) => Self::new(bundle),
            Err(e) => {
                tracing::error!(error = %e, "Model failed to load, serving in degraded mode");
                Self::unavailable(e.to_string())
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ScorerState::Ready(_))
    }

    pub fn vocabulary_size(&self) -> usize {
        match &self.state {
            ScorerState::Ready(bundle) => bundle.extractor.vocabulary().len(),
            ScorerState::Unavailable { .. } => 0,
        }
    }

    pub fn class_count(&self) -> usize {
        match &self.state {
            ScorerState::Ready(bundle) => bundle.labels.len(),
            ScorerState::Unavailable { .. } => 0,
        }
    }

    /// Extract symptoms, run the classifier and return the top diagnoses.
    ///
    /// Returns at most `TOP_K` predictions, highest confidence first, each
    /// with confidence strictly above zero. An empty list is a valid result
    /// and differs from `NoSymptomsFound`.
    pub fn predict<S: AsRef<str>>(&self, raw_inputs: &[S]) -> Result<Vec<Prediction>, PredictError> {
        let bundle = match &self.state {
            ScorerState::Ready(bundle) => bundle,
            ScorerState::Unavailable { reason } => {
                return Err(PredictError::ModelUnavailable(reason.clone()));
            }
        };

        let symptoms = bundle.extractor.extract(raw_inputs);
        if symptoms.is_empty() {
            let original_input: Vec<String> =
                raw_inputs.iter().map(|s| s.as_ref().to_string()).collect();
            tracing::info!(input = ?original_input, "No symptoms found in input");
            return Err(PredictError::NoSymptomsFound {
                message: NO_SYMPTOMS_MESSAGE.to_string(),
                original_input,
            });
        }

        let features = feature_vector(&symptoms, bundle.extractor.vocabulary().len());
        let probabilities = bundle.classifier.predict_proba(&features)?;

        if probabilities.len() != bundle.labels.len() {
            return Err(PredictError::Inference(format!(
                "classifier returned {} probabilities for {} classes",
                probabilities.len(),
                bundle.labels.len()
            )));
        }

        let mut predictions = Vec::with_capacity(TOP_K);
        for index in top_indices(&probabilities, TOP_K) {
            let disease = bundle.labels.decode(index).ok_or_else(|| {
                PredictError::Inference(format!("no label for class {index}"))
            })?;
            predictions.push(Prediction {
                disease: disease.to_string(),
                confidence: probabilities[index],
            });
        }

        tracing::debug!(
            symptoms = ?symptoms.iter().collect::<Vec<_>>(),
            predictions = predictions.len(),
            "Prediction complete"
        );

        Ok(predictions)
    }
}

/// One 0/1 entry per vocabulary position.
fn feature_vector(symptoms: &CanonicalSymptoms, width: usize) -> Vec<f32> {
    (0..width)
        .map(|pos| if symptoms.contains_position(pos) { 1.0 } else { 0.0 })
        .collect()
}

/// Indices of the `k` largest strictly positive probabilities, descending.
///
/// Equal probabilities keep classifier index order (the sort is stable).
/// NaN never compares greater than zero and is dropped.
fn top_indices(probabilities: &[f32], k: usize) -> Vec<usize> {
    let mut ranked: Vec<usize> = (0..probabilities.len())
        .filter(|&i| probabilities[i] > 0.0)
        .collect();
    ranked.sort_by(|&a, &b| {
        probabilities[b]
            .partial_cmp(&probabilities[a])
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(k);
    ranked
}
