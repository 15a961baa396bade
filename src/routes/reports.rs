use axum::{Json, extract::State, extract::rejection::JsonRejection};
use opentelemetry::KeyValue;
use tracing::Instrument;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::report::{GeneratedReport, GenerationRequest, generate_report};
use crate::telemetry::metrics::REPORT_FAILURES;

/// `POST /api/generate-report`. Every failure, including a body that cannot
/// be decoded and a deadline overrun, is answered with the same opaque 500.
pub async fn create_report(
    State(state): State<AppState>,
    body: Result<Json<GenerationRequest>, JsonRejection>,
) -> AppResult<Json<GeneratedReport>> {
    let Json(request) = body.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    tracing::info!(
        url = %request.url,
        report_type = %request.report_type,
        advanced_analysis = request.advanced_analysis,
        "Report requested"
    );

    let deadline = state.request_timeout;
    let report_type = request.report_type;

    // A panic inside the pipeline surfaces as a JoinError instead of a dropped connection.
    let mut task = tokio::spawn(
        async move {
            generate_report(
                state.fetcher.as_ref(),
                state.llm_client.as_ref(),
                &request,
            )
            .await
        }
        .instrument(tracing::Span::current()),
    );

    let joined = match tokio::time::timeout(deadline, &mut task).await {
        Ok(joined) => joined,
        Err(_) => {
            task.abort();
            let err = AppError::CompletionFailed(format!(
                "timed out after {}ms",
                deadline.as_millis()
            ));
            REPORT_FAILURES.add(
                1,
                &[
                    KeyValue::new("report.type", report_type.as_str()),
                    KeyValue::new("error.kind", err.kind()),
                ],
            );
            return Err(err);
        }
    };

    let report = joined.map_err(|e| AppError::Unexpected(format!("report task aborted: {e}")))??;

    Ok(Json(report))
}
