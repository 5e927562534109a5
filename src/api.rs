//! HTTP API: health check and the prediction endpoint.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::error::PredictError;
use crate::inference::Predictor;
use crate::models::{PredictionInput, PredictionResponse};
use crate::validation::ValidationErrors;

/// Application state shared across handlers
pub struct AppState {
    pub predictor: Predictor,
}

/// Build the router. An empty origin list allows any origin.
pub fn router(state: Arc<AppState>, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(health_handler))
        .route("/predict", post(predict_handler))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    info!("CORS restricted to {} origins", origins.len());

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any)
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    message: &'static str,
}

/// Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: "Property Value Prediction API is running",
    })
}

/// Error body: per-field detail for validation failures, a fixed message otherwise
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: ErrorDetail,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Fields(ValidationErrors),
    Message(String),
}

/// Predict the value of a parcel
pub async fn predict_handler(
    State(state): State<Arc<AppState>>,
    Json(input): Json<PredictionInput>,
) -> Result<Json<PredictionResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.predictor.predict(&input) {
        Ok(prediction) => {
            info!("Prediction for {} / {}: {}", input.region, input.city, prediction);
            Ok(Json(PredictionResponse { prediction }))
        }
        Err(PredictError::Invalid(errors)) => {
            warn!("Rejected input: {}", errors);
            Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse {
                    detail: ErrorDetail::Fields(errors),
                }),
            ))
        }
        Err(e) => {
            error!("Prediction request failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    detail: ErrorDetail::Message(e.to_string()),
                }),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{FeaturePipeline, FeatureVector, StandardScaler, SCALED_COLUMNS};
    use crate::inference::Regressor;
    use crate::models::input::sample_input;
    use crate::reference::ReferenceData;

    struct Constant(f64);

    impl Regressor for Constant {
        fn predict(&self, _features: &FeatureVector) -> anyhow::Result<f64> {
            Ok(self.0)
        }
    }

    fn state(raw_output: f64) -> Arc<AppState> {
        let reference = ReferenceData::builder()
            .city("Riyadh", "Riyadh", 24.7136, 46.6753)
            .capital("Riyadh", "Riyadh")
            .build();
        let n = SCALED_COLUMNS.len();
        let pipeline = FeaturePipeline::new(
            Arc::new(reference),
            StandardScaler::new(vec![0.0; n], vec![1.0; n]),
        )
        .unwrap();
        Arc::new(AppState {
            predictor: Predictor::new(pipeline, Box::new(Constant(raw_output)), None),
        })
    }

    #[tokio::test]
    async fn test_health() {
        let Json(body) = health_handler().await;
        assert_eq!(body.status, "healthy");
    }

    #[tokio::test]
    async fn test_predict_ok() {
        let Json(body) = predict_handler(State(state(1.0)), Json(sample_input()))
            .await
            .unwrap();
        assert!((body.prediction - 1f64.exp_m1()).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_predict_invalid_is_422() {
        let mut input = sample_input();
        input.area = 0.0;
        input.region = "Nowhere".to_string();

        let (status, Json(body)) = predict_handler(State(state(1.0)), Json(input))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let json = serde_json::to_value(&body).unwrap();
        let fields: Vec<&str> = json["detail"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert!(fields.contains(&"Area"));
        assert!(fields.contains(&"PropAssetRegionName"));
    }

    #[tokio::test]
    async fn test_predict_failure_is_opaque_500() {
        let (status, Json(body)) = predict_handler(State(state(f64::NAN)), Json(sample_input()))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "detail": "Prediction failed" })
        );
    }

    #[tokio::test]
    async fn test_router_builds_with_origins() {
        let origins = vec![
            "https://infath.example".to_string(),
            "not a header\n".to_string(),
        ];
        let _ = router(state(0.0), &origins);
        let _ = router(state(0.0), &[]);
    }
}
