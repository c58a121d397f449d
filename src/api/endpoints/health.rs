//! Status and health check endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct RootResponse {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
    pub vocabulary_size: usize,
    pub class_count: usize,
    pub version: &'static str,
}

/// `GET /` — liveness banner.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        status: "ok",
        message: "MediBot API is running.",
    })
}

/// `GET /health` — 200 when the model is loaded, 503 when degraded.
pub async fn check(State(ctx): State<ApiContext>) -> (StatusCode, Json<HealthResponse>) {
    let model_loaded = ctx.scorer.is_ready();
    let status = if model_loaded {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if model_loaded { "ok" } else { "degraded" },
            model_loaded,
            vocabulary_size: ctx.scorer.vocabulary_size(),
            class_count: ctx.scorer.class_count(),
            version: crate::config::APP_VERSION,
        }),
    )
}
