use serde::Deserialize;

use super::error::ShellError;
use crate::report::GenerationRequest;

/// The shell's view of the Report Orchestrator boundary.
#[async_trait::async_trait]
pub trait ReportService: Send + Sync {
    /// Returns the generated HTML.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ShellError>;
}

#[derive(Deserialize)]
struct SuccessBody {
    html: String,
}

#[derive(Deserialize)]
struct FailureBody {
    error: String,
}

pub struct HttpReportService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpReportService {
    pub fn new(server: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/api/generate-report", server.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl ReportService for HttpReportService {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ShellError> {
        let response = self.client.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<FailureBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            return Err(ShellError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str::<SuccessBody>(&body)
            .map(|b| b.html)
            .map_err(|e| ShellError::MalformedResponse(e.to_string()))
    }
}
