//! Shared types for the HTTP API layer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::diagnosis::{Prediction, SymptomScorer};

// ═══════════════════════════════════════════════════════════
// API context — shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes.
/// The scorer is fully constructed before the router exists and is never
/// mutated afterwards.
#[derive(Clone)]
pub struct ApiContext {
    pub scorer: Arc<SymptomScorer>,
}

impl ApiContext {
    pub fn new(scorer: Arc<SymptomScorer>) -> Self {
        Self { scorer }
    }
}

// ═══════════════════════════════════════════════════════════
// Request / response bodies
// ═══════════════════════════════════════════════════════════

/// `POST /predict` body. Entries may be single symptoms or whole sentences.
#[derive(Debug, Clone, Deserialize)]
pub struct SymptomsInput {
    pub symptoms: Vec<String>,
}

/// `POST /predict` response.
///
/// `error` carries the user-facing message when no symptom was recognized;
/// `predictions` is then empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub predictions: Vec<Prediction>,
    pub error: Option<String>,
}
