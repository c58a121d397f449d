use std::collections::HashMap;

use super::ModelError;

/// Ordered, immutable list of canonical symptom feature names.
///
/// The order is the classifier's input layout. Matching is case-insensitive,
/// so names must also be unique once lowercased.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    names: Vec<String>,
    lowercase: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    pub fn new(names: Vec<String>) -> Result<Self, ModelError> {
        if names.is_empty() {
            return Err(ModelError::InvalidVocabulary("vocabulary is empty".into()));
        }

        let mut lowercase = Vec::with_capacity(names.len());
        let mut index = HashMap::with_capacity(names.len());

        for (i, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(ModelError::InvalidVocabulary(format!(
                    "entry {i} is blank"
                )));
            }
            let lower = name.to_lowercase();
            if index.insert(lower.clone(), i).is_some() {
                return Err(ModelError::InvalidVocabulary(format!(
                    "duplicate feature name '{name}'"
                )));
            }
            lowercase.push(lower);
        }

        Ok(Self {
            names,
            lowercase,
            index,
        })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Canonical names in classifier input order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Lowercase underscore forms, aligned with `names()`.
    pub fn lowercase_names(&self) -> &[String] {
        &self.lowercase
    }

    pub fn canonical(&self, i: usize) -> Option<&str> {
        self.names.get(i).map(String::as_str)
    }

    /// Position of a feature, looked up case-insensitively.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(&name.to_lowercase()).copied()
    }
}
