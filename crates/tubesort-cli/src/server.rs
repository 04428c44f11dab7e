//! Web form and JSON routes.

use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::info;
use tubesort_core::{LinkHistory, Prediction, Predictor, VideoLink};

use crate::error::{ApiError, ApiResult};
use crate::page::{self, PageView};

/// Plain-text body returned when the model could not produce a category.
pub const PREDICTION_FAILED: &str = "Failed to predict the category";

/// Shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub predictor: Predictor,
    pub history: Arc<LinkHistory>,
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(predictor: Predictor, history_capacity: usize) -> Self {
        Self {
            predictor,
            history: Arc::new(LinkHistory::new(history_capacity)),
            startup_time: Utc::now(),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .route("/api/predict", post(api_predict))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Deserialize)]
pub struct SubmitForm {
    pub video_link: String,
}

/// GET / - empty form plus history.
async fn index(State(state): State<AppState>) -> Html<String> {
    let history = state.history.snapshot().await;
    Html(page::render(&PageView {
        history: &history,
        ..Default::default()
    }))
}

/// POST / - classify the submitted link and render the result.
async fn submit(State(state): State<AppState>, Form(form): Form<SubmitForm>) -> Response {
    let link = VideoLink::new(form.video_link);
    let prediction = record_and_predict(&state, link).await;

    let Some(headline) = prediction.headline() else {
        return (StatusCode::OK, PREDICTION_FAILED).into_response();
    };

    let history = state.history.snapshot().await;
    Html(page::render(&PageView {
        prediction: Some(headline),
        probabilities: prediction.probabilities(),
        title: prediction.title(),
        history: &history,
    }))
    .into_response()
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PredictResponse {
    Classified {
        title: String,
        label: String,
        probabilities: Vec<f32>,
    },
    ExtractionFailed {
        message: String,
    },
}

#[derive(Deserialize)]
pub struct PredictRequest {
    pub video_link: String,
}

/// POST /api/predict - JSON flavour of the form.
async fn api_predict(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> ApiResult<Json<PredictResponse>> {
    if req.video_link.trim().is_empty() {
        return Err(ApiError::BadRequest("video_link is empty".into()));
    }

    let prediction = record_and_predict(&state, VideoLink::new(req.video_link)).await;
    let body = match prediction {
        Prediction::Classified {
            title,
            label,
            probabilities,
        } => PredictResponse::Classified {
            title,
            label,
            probabilities,
        },
        Prediction::ExtractionFailed(_) => PredictResponse::ExtractionFailed {
            message: tubesort_core::EXTRACTION_FAILED.to_string(),
        },
        Prediction::ClassificationFailed { .. } => return Err(ApiError::PredictionFailed),
    };
    Ok(Json(body))
}

async fn record_and_predict(state: &AppState, link: VideoLink) -> Prediction {
    state.history.push(link.clone()).await;
    let prediction = state.predictor.predict(&link).await;
    info!(link = %link, outcome = ?prediction.headline(), "prediction served");
    prediction
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub history_len: usize,
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime.num_seconds().max(0) as u64,
        history_len: state.history.len().await,
    })
}
