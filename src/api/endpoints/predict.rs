//! `POST /predict` — symptoms in, ranked diagnoses out.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, PredictionResponse, SymptomsInput};
use crate::diagnosis::{PredictError, Prediction};

/// Run extraction and scoring for the submitted symptoms.
///
/// Classifier inference is synchronous, so it runs on the blocking pool
/// rather than on an async worker.
pub async fn predict(
    State(ctx): State<ApiContext>,
    payload: Result<Json<SymptomsInput>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let Json(input) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let scorer = ctx.scorer.clone();
    let result = tokio::task::spawn_blocking(move || scorer.predict(input.symptoms.as_slice()))
        .await
        .map_err(|e| ApiError::Internal(format!("Prediction task failed: {e}")))?;

    respond(result).map(Json)
}

/// Map a scoring outcome onto the HTTP contract.
///
/// An unrecognized input is a normal answer: 200 with no predictions and
/// a message in `error`. Only a missing model or an inference failure is
/// reported as an HTTP error.
fn respond(
    result: Result<Vec<Prediction>, PredictError>,
) -> Result<PredictionResponse, ApiError> {
    match result {
        Ok(predictions) => Ok(PredictionResponse {
            predictions,
            error: None,
        }),
        Err(PredictError::NoSymptomsFound { message, .. }) => Ok(PredictionResponse {
            predictions: Vec::new(),
            error: Some(message),
        }),
        Err(PredictError::ModelUnavailable(reason)) => Err(ApiError::ModelUnavailable(reason)),
        Err(PredictError::Inference(reason)) => Err(ApiError::Internal(reason)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use crate::diagnosis::NO_SYMPTOMS_MESSAGE;

    #[test]
    fn ranked_predictions_have_no_error() {
        let response = respond(Ok(vec![Prediction {
            disease: "Malaria".into(),
            confidence: 0.6,
        }]))
        .unwrap();
        assert_eq!(response.predictions.len(), 1);
        assert!(response.error.is_none());
    }

    #[test]
    fn no_symptoms_is_a_normal_answer() {
        let response = respond(Err(PredictError::NoSymptomsFound {
            message: NO_SYMPTOMS_MESSAGE.to_string(),
            original_input: vec!["xyz123".into()],
        }))
        .unwrap();
        assert!(response.predictions.is_empty());
        assert_eq!(response.error.as_deref(), Some(NO_SYMPTOMS_MESSAGE));
    }

    #[test]
    fn model_unavailable_maps_to_503() {
        let err = respond(Err(PredictError::ModelUnavailable("gone".into()))).unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn inference_failure_maps_to_500() {
        let err = respond(Err(PredictError::Inference("shape".into()))).unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
