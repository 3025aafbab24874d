//! HTTP request handlers

use axum::{extract::State, http::StatusCode, response::Html, Form, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::analysis::{analyze, Analysis, AnalysisError};

use super::page::render_page;
use super::AppState;

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_error: Option<String>,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn index() -> Html<String> {
    Html(render_page("", None))
}

async fn run(state: &AppState, url: &str) -> Result<Analysis, AnalysisError> {
    let result = analyze(
        state.source.as_ref(),
        state.detector.as_ref(),
        url,
        &state.options,
    )
    .await;

    match &result {
        Ok(analysis) => info!(
            languages = analysis.report.rows().len(),
            classified = analysis.classified,
            "request analyzed"
        ),
        Err(e) if e.is_warning() => info!(error = %e, "request rejected"),
        Err(e) => error!(error = %e, "analysis failed"),
    }
    result
}

/// Form submission: re-renders the page with the outcome below the form.
pub async fn analyze_form(
    State(state): State<AppState>,
    Form(request): Form<AnalyzeRequest>,
) -> Html<String> {
    let outcome = run(&state, &request.url).await;
    Html(render_page(&request.url, Some(&outcome)))
}

pub async fn analyze_json(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<Analysis>, (StatusCode, Json<ErrorResponse>)> {
    match run(&state, &request.url).await {
        Ok(analysis) => Ok(Json(analysis)),
        Err(e) => {
            let status = match &e {
                AnalysisError::EmptyUrl => StatusCode::BAD_REQUEST,
                AnalysisError::NoComments { .. } | AnalysisError::NoClassifiableComments => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                AnalysisError::Detection(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let collection_error = match &e {
                AnalysisError::NoComments { collection_error } => collection_error.clone(),
                _ => None,
            };
            Err((
                status,
                Json(ErrorResponse {
                    error: e.to_string(),
                    collection_error,
                }),
            ))
        }
    }
}
