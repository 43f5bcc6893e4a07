//! Posture HTTP server: accepts questionnaire submissions and returns the
//! rendered readiness report.
//!
//! Routes:
//! - `POST /submit` scores a submission and returns `{ html, categoryScores }`
//! - `GET /health` liveness check
//! - anything else is served from the static directory (the client form)

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use posture::config::ServerSettings;
use posture::reporter::{HtmlReporter, SubmitResponse};
use posture::{AssessmentEngine, AssessmentError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::services::ServeDir;

/// Shared, immutable per-request state
#[derive(Debug, Clone, Copy, Default)]
pub struct AppState {
    pub engine: AssessmentEngine,
    pub html: HtmlReporter,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            engine: AssessmentEngine::new(),
            html: HtmlReporter::new(),
        }
    }
}

/// Errors returned to HTTP clients
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Assessment(#[from] AssessmentError),
}

/// Body of a 400 response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub problems: Vec<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let problems = match &self {
            ApiError::Assessment(e) => e.problems(),
        };
        let body = ErrorBody {
            error: self.to_string(),
            problems,
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Build the application router
pub fn router(state: AppState, settings: &ServerSettings) -> Router {
    Router::new()
        .route("/submit", post(submit))
        .route("/health", get(health))
        .fallback_service(ServeDir::new(&settings.static_dir))
        .layer(DefaultBodyLimit::max(settings.max_body_bytes))
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn submit(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SubmitResponse>, ApiError> {
    let report = state.engine.assess_json(&body).inspect_err(|e| {
        log::warn!("rejected submission ({} problem(s)): {}", e.problems().len(), e);
    })?;

    log::info!(
        "assessed submission: scores={:?} maturity={} gaps={}",
        report.category_scores.to_array(),
        report.maturity,
        report.gaps.len()
    );

    Ok(Json(SubmitResponse::from_report(&report, &state.html)))
}
