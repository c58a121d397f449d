//! Model directory loading.
//!
//! A model directory holds three artifacts:
//! - `symptom_columns.json` — vocabulary, in classifier input order
//! - `labels.json` — class labels, in classifier output order
//! - `model.onnx` — the classifier itself

use std::path::Path;

use super::classifier::{ClassLabels, SymptomClassifier};
use super::extractor::SymptomExtractor;
use super::vocabulary::Vocabulary;
use super::ModelError;

pub const VOCABULARY_FILE: &str = "symptom_columns.json";
pub const LABELS_FILE: &str = "labels.json";
pub const MODEL_FILE: &str = "model.onnx";

/// Everything the scorer needs, loaded once at startup.
pub struct ModelBundle {
    pub extractor: SymptomExtractor,
    pub labels: ClassLabels,
    pub classifier: Box<dyn SymptomClassifier>,
}

impl ModelBundle {
    pub fn new(
        vocabulary: Vocabulary,
        labels: ClassLabels,
        classifier: Box<dyn SymptomClassifier>,
    ) -> Result<Self, ModelError> {
        Ok(Self {
            extractor: SymptomExtractor::new(vocabulary)?,
            labels,
            classifier,
        })
    }
}

/// Load vocabulary, labels and classifier from `dir`.
pub fn load_model_bundle(dir: &Path) -> Result<ModelBundle, ModelError> {
    let vocabulary = read_vocabulary(&dir.join(VOCABULARY_FILE))?;
    let labels = read_labels(&dir.join(LABELS_FILE))?;
    let classifier = load_classifier(&dir.join(MODEL_FILE))?;

    tracing::info!(
        dir = %dir.display(),
        features = vocabulary.len(),
        classes = labels.len(),
        "Model bundle loaded"
    );

    ModelBundle::new(vocabulary, labels, classifier)
}

pub fn read_vocabulary(path: &Path) -> Result<Vocabulary, ModelError> {
    Vocabulary::new(read_string_list(path)?)
}

pub fn read_labels(path: &Path) -> Result<ClassLabels, ModelError> {
    ClassLabels::new(read_string_list(path)?)
}

fn read_string_list(path: &Path) -> Result<Vec<String>, ModelError> {
    if !path.exists() {
        return Err(ModelError::NotFound(path.to_path_buf()));
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(feature = "onnx-classifier")]
fn load_classifier(path: &Path) -> Result<Box<dyn SymptomClassifier>, ModelError> {
    let classifier = super::classifier::OnnxClassifier::load(path)?;
    Ok(Box::new(classifier))
}

#[cfg(not(feature = "onnx-classifier"))]
fn load_classifier(_path: &Path) -> Result<Box<dyn SymptomClassifier>, ModelError> {
    Err(ModelError::Unsupported)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn reads_vocabulary_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), VOCABULARY_FILE, r#"["itching", "skin_rash", "high_fever"]"#);

        let vocab = read_vocabulary(&tmp.path().join(VOCABULARY_FILE)).unwrap();
        assert_eq!(vocab.names(), ["itching", "skin_rash", "high_fever"]);
    }

    #[test]
    fn missing_file_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let err = read_labels(&tmp.path().join(LABELS_FILE)).unwrap_err();
        assert!(matches!(err, ModelError::NotFound(p) if p.ends_with(LABELS_FILE)));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), LABELS_FILE, r#"{"not": "a list"}"#);
        let err = read_labels(&tmp.path().join(LABELS_FILE)).unwrap_err();
        assert!(matches!(err, ModelError::Parse(_)));
    }

    #[test]
    fn duplicate_vocabulary_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), VOCABULARY_FILE, r#"["cough", "cough"]"#);
        let err = read_vocabulary(&tmp.path().join(VOCABULARY_FILE)).unwrap_err();
        assert!(matches!(err, ModelError::InvalidVocabulary(_)));
    }

    #[test]
    fn bundle_fails_without_vocabulary() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), LABELS_FILE, r#"["Malaria"]"#);
        assert!(matches!(
            load_model_bundle(tmp.path()),
            Err(ModelError::NotFound(_))
        ));
    }

    #[cfg(not(feature = "onnx-classifier"))]
    #[test]
    fn bundle_reports_unsupported_build() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), VOCABULARY_FILE, r#"["cough"]"#);
        write(tmp.path(), LABELS_FILE, r#"["Bronchitis"]"#);
        assert!(matches!(
            load_model_bundle(tmp.path()),
            Err(ModelError::Unsupported)
        ));
    }

    #[cfg(feature = "onnx-classifier")]
    #[test]
    fn bundle_reports_missing_onnx_model() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), VOCABULARY_FILE, r#"["cough"]"#);
        write(tmp.path(), LABELS_FILE, r#"["Bronchitis"]"#);
        assert!(matches!(
            load_model_bundle(tmp.path()),
            Err(ModelError::NotFound(p)) if p.ends_with(MODEL_FILE)
        ));
    }

    #[cfg(feature = "onnx-classifier")]
    #[test]
    fn bundle_scores_with_onnx_model() {
        use crate::diagnosis::SymptomScorer;

        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), VOCABULARY_FILE, r#"["high_fever", "headache", "cough"]"#);
        write(tmp.path(), LABELS_FILE, r#"["Malaria", "Migraine", "Bronchitis"]"#);
        let fixture = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("resources")
            .join("test_models")
            .join("softmax_probabilities.onnx");
        std::fs::copy(fixture, tmp.path().join(MODEL_FILE)).unwrap();

        let scorer = SymptomScorer::from_load_result(load_model_bundle(tmp.path()));
        assert!(scorer.is_ready());

        let predictions = scorer.predict(&["high fever and a cough"]).unwrap();
        let diseases: Vec<&str> = predictions.iter().map(|p| p.disease.as_str()).collect();
        assert_eq!(diseases, vec!["Malaria", "Bronchitis", "Migraine"]);
    }
}
