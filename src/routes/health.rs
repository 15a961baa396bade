use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::AppState;

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "insight-report",
        "version": env!("CARGO_PKG_VERSION"),
        "fetcher": state.fetcher.name(),
        "llm_provider": state.llm_client.provider_name(),
    }))
}
