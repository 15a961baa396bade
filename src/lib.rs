pub mod config;
pub mod editor;
pub mod error;
pub mod llm;
pub mod report;
pub mod routes;
pub mod scrape;
pub mod telemetry;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};

pub use config::Config;

/// Per-process handles shared by every request; no request state lives here.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<dyn scrape::ContentFetcher>,
    pub llm_client: Arc<llm::LlmClient>,
    /// Deadline for one report, scrape and completion together.
    pub request_timeout: Duration,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health::health))
        .route("/api/generate-report", post(routes::reports::create_report))
        .with_state(state)
}
