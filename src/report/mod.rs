pub mod orchestrator;
pub mod prompt;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use orchestrator::{GeneratedReport, generate_report, validate_url};

/// Report style selector; drives the system prompt unless advanced analysis
/// is requested. The same lowercase names are used on the wire and by the CLI.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    #[default]
    Detailed,
    Executive,
    Technical,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Detailed => "detailed",
            ReportType::Executive => "executive",
            ReportType::Technical => "technical",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /api/generate-report`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub report_type: ReportType,
    #[serde(default)]
    pub advanced_analysis: bool,
}

impl GenerationRequest {
    pub fn new(url: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            instructions: instructions.into(),
            ..Default::default()
        }
    }

    pub fn report_type(mut self, report_type: ReportType) -> Self {
        self.report_type = report_type;
        self
    }

    pub fn advanced_analysis(mut self, enabled: bool) -> Self {
        self.advanced_analysis = enabled;
        self
    }
}
