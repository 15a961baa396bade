use super::ReportType;

pub const DEEP_ANALYSIS_PROMPT: &str = "Perform an in-depth, multi-dimensional analysis of the content. \
    Extract nuanced insights, potential implications, and provide a comprehensive breakdown.";

pub const EXECUTIVE_PROMPT: &str = "Generate a concise, high-level summary focusing on key strategic \
    insights and main takeaways.";

pub const TECHNICAL_PROMPT: &str = "Create a detailed, technically-oriented report with precise \
    analysis, data points, and technical observations.";

pub const COMPREHENSIVE_PROMPT: &str =
    "Generate a comprehensive report covering the most important aspects of the content.";

/// Advanced analysis wins over the report type.
pub fn system_prompt(advanced_analysis: bool, report_type: ReportType) -> &'static str {
    if advanced_analysis {
        return DEEP_ANALYSIS_PROMPT;
    }
    match report_type {
        ReportType::Executive => EXECUTIVE_PROMPT,
        ReportType::Technical => TECHNICAL_PROMPT,
        ReportType::Detailed => COMPREHENSIVE_PROMPT,
    }
}

/// Embeds the scraped content and instructions verbatim, echoes the flags,
/// and asks for a complete HTML report.
pub fn user_message(
    content: &str,
    instructions: &str,
    report_type: ReportType,
    advanced_analysis: bool,
) -> String {
    format!(
        "Scraped Content: {content}\n\
        User Instructions: {instructions}\n\
        Report Details:\n\
        - Report Type: {report_type}\n\
        - Advanced Analysis: {advanced_analysis}\n\n\
        Generate a comprehensive HTML report that meets the specified requirements."
    )
}
