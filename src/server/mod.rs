//! Single-page web form for running analyses from a browser.

mod handlers;
mod page;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::collector::CommentSource;
use crate::config::AnalysisOptions;
use crate::language::LanguageDetector;

pub use handlers::{AnalyzeRequest, HealthResponse};
pub use page::render_page;

/// Collaborators shared by all requests. Nothing in here changes between runs.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn CommentSource>,
    pub detector: Arc<dyn LanguageDetector>,
    pub options: AnalysisOptions,
}

impl AppState {
    pub fn new(
        source: Arc<dyn CommentSource>,
        detector: Arc<dyn LanguageDetector>,
        options: AnalysisOptions,
    ) -> Self {
        Self {
            source,
            detector,
            options,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/analyze", post(handlers::analyze_form))
        .route("/api/v1/analyze", post(handlers::analyze_json))
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve on an already bound listener.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Serving comment language analyzer on http://{}", addr);
    }
    axum::serve(listener, build_router(state)).await
}

pub async fn start_server(addr: &str, state: AppState) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    serve(listener, state).await
}
