use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use opentelemetry::trace::TraceContextExt;
use serde_json::json;
use thiserror::Error;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Message returned to callers for every failure kind.
pub const GENERIC_FAILURE: &str = "Failed to generate report";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("Completion failed: {0}")]
    CompletionFailed(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "invalid_input",
            AppError::FetchFailed(_) => "fetch_failed",
            AppError::CompletionFailed(_) => "completion_failed",
            AppError::Unexpected(_) => "unexpected_error",
        }
    }
}

fn get_trace_id() -> Option<String> {
    let span = Span::current();
    let context = span.context();
    let span_ref = context.span();
    let span_context = span_ref.span_context();

    if span_context.is_valid() {
        Some(span_context.trace_id().to_string())
    } else {
        None
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error.kind = self.kind(), error = %self, "Report generation failed");

        let body = if let Some(trace_id) = get_trace_id() {
            json!({
                "error": GENERIC_FAILURE,
                "trace_id": trace_id,
            })
        } else {
            json!({
                "error": GENERIC_FAILURE,
            })
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
