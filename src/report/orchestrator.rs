use std::time::Instant;

use opentelemetry::KeyValue;
use serde::Serialize;
use url::Url;
use uuid::Uuid;

use crate::error::AppError;
use crate::llm::LlmClient;
use crate::scrape::{ContentFetcher, scrape_content};
use crate::telemetry::metrics::{REPORT_FAILURES, REPORT_GENERATION_DURATION};

use super::{GenerationRequest, prompt};

/// Successful result: the model's HTML, untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedReport {
    pub html: String,
}

pub fn validate_url(raw: &str) -> Result<Url, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::InvalidInput("url is required".into()));
    }

    let url = Url::parse(raw)
        .map_err(|e| AppError::InvalidInput(format!("malformed url {raw:?}: {e}")))?;

    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        scheme => Err(AppError::InvalidInput(format!(
            "unsupported url {raw:?} (scheme {scheme})"
        ))),
    }
}

#[tracing::instrument(
    name = "pipeline report",
    skip(fetcher, llm_client, request),
    fields(
        report.id = %Uuid::new_v4(),
        report.type = %request.report_type,
        report.advanced_analysis = request.advanced_analysis,
        report.html_length,
        report.duration_ms,
        error.kind,
    )
)]
pub async fn generate_report(
    fetcher: &dyn ContentFetcher,
    llm_client: &LlmClient,
    request: &GenerationRequest,
) -> Result<GeneratedReport, AppError> {
    let start = Instant::now();
    let result = run_pipeline(fetcher, llm_client, request).await;
    let duration = start.elapsed();

    let span = tracing::Span::current();
    span.record("report.duration_ms", duration.as_millis() as u64);

    let type_kv = KeyValue::new("report.type", request.report_type.as_str());
    match &result {
        Ok(report) => {
            span.record("report.html_length", report.html.len());
            REPORT_GENERATION_DURATION.record(duration.as_secs_f64(), &[type_kv]);
        }
        Err(err) => {
            span.record("error.kind", err.kind());
            REPORT_FAILURES.add(1, &[type_kv, KeyValue::new("error.kind", err.kind())]);
        }
    }

    result
}

async fn run_pipeline(
    fetcher: &dyn ContentFetcher,
    llm_client: &LlmClient,
    request: &GenerationRequest,
) -> Result<GeneratedReport, AppError> {
    // Stage 1: Validate before touching either upstream
    let url = validate_url(&request.url)?;

    // Stage 2: Scrape; empty content stops here so no completion is paid for
    let content = scrape_content(fetcher, &url).await?;

    // Stage 3: Build the prompt
    let system = prompt::system_prompt(request.advanced_analysis, request.report_type);
    let message = prompt::user_message(
        &content,
        &request.instructions,
        request.report_type,
        request.advanced_analysis,
    );

    // Stage 4: Single completion call, output passed through as-is
    let resp = llm_client
        .generate(&llm_client.request(system, message, "report"))
        .await
        .map_err(|e| AppError::CompletionFailed(format!("{e:#}")))?;

    tracing::info!(
        provider = %resp.provider,
        model = %resp.model,
        output_tokens = resp.output_tokens,
        "Report generated"
    );

    Ok(GeneratedReport { html: resp.content })
}
