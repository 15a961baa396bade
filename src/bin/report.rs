use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use insight_report::editor::{EditorShell, HttpReportService, MemoryDocument, Notification};
use insight_report::report::{GenerationRequest, ReportType};

/// Generate an HTML report for a web page and save it to disk.
#[derive(Parser, Debug)]
#[command(name = "report", version, about)]
struct Cli {
    /// Page to analyse
    url: String,

    /// Free-text focus for the report
    #[arg(short, long, default_value = "")]
    instructions: String,

    #[arg(short = 't', long, value_enum, default_value_t = ReportType::Detailed)]
    report_type: ReportType,

    /// Deep analysis; overrides the report type's prompt
    #[arg(short, long)]
    advanced: bool,

    /// Base URL of the report server
    #[arg(short, long, default_value = "http://localhost:8080")]
    server: String,

    /// Directory the exported report is written to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let service = HttpReportService::new(&cli.server);
    tracing::info!(endpoint = service.endpoint(), url = %cli.url, "Requesting report");

    let mut shell = EditorShell::new(MemoryDocument::new(), service);

    let mut progress = shell.watch_progress();
    let ticker = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let value = *progress.borrow_and_update();
            tracing::info!(progress = %format!("{value:.0}%"), "Generating insights");
        }
    });

    let request = GenerationRequest::new(cli.url, cli.instructions)
        .report_type(cli.report_type)
        .advanced_analysis(cli.advanced);
    let notification = shell.submit(request).await;
    ticker.abort();

    if notification.is_failure() {
        tracing::error!(title = notification.title(), "{}", notification.description());
        anyhow::bail!("report generation failed");
    }
    tracing::info!(title = notification.title(), "{}", notification.description());

    let exported = shell.save_export(&cli.out_dir)?;
    if let Notification::ReportExported { path } = &exported {
        println!("{}", path.display());
    }

    Ok(())
}
