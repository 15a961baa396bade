//! Editor Shell: collects a generation request, calls the report boundary,
//! and loads the returned HTML into an editable document.
//!
//! States run `Idle -> Submitting -> Idle`; `submit` takes `&mut self`, so a
//! second request cannot start while one is in flight.

pub mod client;
pub mod document;
pub mod error;
pub mod export;
pub mod progress;

use std::path::{Path, PathBuf};

use tokio::sync::watch;

use crate::report::GenerationRequest;

pub use client::{HttpReportService, ReportService};
pub use document::{Alignment, DocumentEditor, Format, ListKind, MemoryDocument};
pub use error::ShellError;
pub use export::ExportedReport;
pub use progress::{ProgressGuard, ProgressIndicator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellState {
    Idle,
    Submitting,
}

/// What the user is told after an action. Failures never carry a cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    ReportGenerated,
    GenerationFailed,
    ReportExported { path: PathBuf },
}

impl Notification {
    pub fn title(&self) -> &'static str {
        match self {
            Notification::ReportGenerated => "Report Generated Successfully",
            Notification::GenerationFailed => "Generation Error",
            Notification::ReportExported { .. } => "Report Exported",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Notification::ReportGenerated => "Dive into the insights!",
            Notification::GenerationFailed => "Something went wrong. Please try again.",
            Notification::ReportExported { .. } => "Your report is now downloaded",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Notification::GenerationFailed)
    }
}

/// Puts the shell back to `Idle` however `submit` exits.
struct Submitting<'a>(&'a watch::Sender<ShellState>);

impl<'a> Submitting<'a> {
    fn enter(state: &'a watch::Sender<ShellState>) -> Self {
        state.send_replace(ShellState::Submitting);
        Self(state)
    }
}

impl Drop for Submitting<'_> {
    fn drop(&mut self) {
        self.0.send_replace(ShellState::Idle);
    }
}

pub struct EditorShell<D, S> {
    document: D,
    service: S,
    state: watch::Sender<ShellState>,
    progress: ProgressIndicator,
}

impl<D: DocumentEditor, S: ReportService> EditorShell<D, S> {
    pub fn new(document: D, service: S) -> Self {
        let (state, _rx) = watch::channel(ShellState::Idle);
        Self {
            document,
            service,
            state,
            progress: ProgressIndicator::new(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressIndicator) -> Self {
        self.progress = progress;
        self
    }

    pub fn state(&self) -> ShellState {
        *self.state.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<ShellState> {
        self.state.subscribe()
    }

    pub fn watch_progress(&self) -> watch::Receiver<f64> {
        self.progress.subscribe()
    }

    pub fn progress(&self) -> f64 {
        self.progress.value()
    }

    pub fn can_submit(&self) -> bool {
        self.state() == ShellState::Idle
    }

    /// The document view is dimmed and read-only while a request is in flight.
    pub fn is_document_dimmed(&self) -> bool {
        self.state() == ShellState::Submitting
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    #[tracing::instrument(
        name = "shell submit",
        skip(self, request),
        fields(
            url = %request.url,
            report.type = %request.report_type,
            report.advanced_analysis = request.advanced_analysis,
        )
    )]
    pub async fn submit(&mut self, request: GenerationRequest) -> Notification {
        let _submitting = Submitting::enter(&self.state);

        let outcome = {
            let _progress = self.progress.start();
            self.service.generate(&request).await
        };

        match outcome {
            Ok(html) => {
                tracing::info!(html_length = html.len(), "Report loaded into document");
                self.document.set_content(html);
                Notification::ReportGenerated
            }
            Err(err) => {
                tracing::warn!(error = %err, "Report generation failed");
                Notification::GenerationFailed
            }
        }
    }

    pub fn format(&mut self, format: Format) {
        match format {
            Format::Bold => self.document.apply_bold(),
            Format::Italic => self.document.apply_italic(),
            Format::Underline => self.document.apply_underline(),
            Format::Align(alignment) => self.document.set_alignment(alignment),
            Format::List(kind) => self.document.toggle_list(kind),
        }
    }

    pub fn is_active(&self, format: Format) -> bool {
        self.document.is_active(format)
    }

    pub fn export(&self) -> ExportedReport {
        ExportedReport::today(self.document.content())
    }

    pub fn save_export(&self, dir: &Path) -> Result<Notification, ShellError> {
        let path = self.export().write_to(dir)?;
        tracing::info!(path = %path.display(), "Report exported");
        Ok(Notification::ReportExported { path })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::document::PLACEHOLDER_DOCUMENT;
    use super::progress::COMPLETE;
    use super::*;
    use crate::report::ReportType;

    struct ScriptedService {
        reply: Result<&'static str, u16>,
        seen: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedService {
        fn ok(html: &'static str) -> Self {
            Self {
                reply: Ok(html),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl ReportService for ScriptedService {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, ShellError> {
            self.seen.lock().unwrap().push(request.clone());
            tokio::task::yield_now().await;
            match self.reply {
                Ok(html) => Ok(html.to_string()),
                Err(status) => Err(ShellError::Rejected {
                    status,
                    message: "Failed to generate report".to_string(),
                }),
            }
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new("https://example.com", "focus on pricing")
            .report_type(ReportType::Executive)
    }

    #[tokio::test]
    async fn test_success_replaces_document() {
        let mut shell = EditorShell::new(MemoryDocument::new(), ScriptedService::ok("<html>OK</html>"));

        let notification = shell.submit(request()).await;

        assert_eq!(notification, Notification::ReportGenerated);
        assert_eq!(shell.document().content(), "<html>OK</html>");
        assert_eq!(shell.state(), ShellState::Idle);
        assert_eq!(shell.progress(), COMPLETE);
        assert_eq!(shell.service.seen.lock().unwrap()[0], request());
    }

    #[tokio::test]
    async fn test_failure_leaves_document_untouched() {
        let mut shell = EditorShell::new(MemoryDocument::new(), ScriptedService::failing(500));

        let notification = shell.submit(request()).await;

        assert!(notification.is_failure());
        assert_eq!(notification.description(), "Something went wrong. Please try again.");
        assert_eq!(shell.document().content(), PLACEHOLDER_DOCUMENT);
        assert_eq!(shell.state(), ShellState::Idle);
        assert_eq!(shell.progress(), COMPLETE);
        assert!(shell.can_submit());
    }

    #[tokio::test]
    async fn test_state_passes_through_submitting() {
        let mut shell = EditorShell::new(MemoryDocument::new(), ScriptedService::ok("<p>x</p>"));
        let mut states = shell.watch_state();
        assert!(!shell.is_document_dimmed());

        let observer = tokio::spawn(async move {
            let mut seen = Vec::new();
            while states.changed().await.is_ok() {
                seen.push(*states.borrow_and_update());
                if seen.last() == Some(&ShellState::Idle) {
                    break;
                }
            }
            seen
        });

        shell.submit(request()).await;
        let seen = observer.await.unwrap();

        assert_eq!(seen.first(), Some(&ShellState::Submitting));
        assert_eq!(seen.last(), Some(&ShellState::Idle));
    }

    #[test]
    fn test_format_commands_delegate_to_document() {
        let mut shell = EditorShell::new(MemoryDocument::new(), ScriptedService::ok(""));

        shell.format(Format::Bold);
        shell.format(Format::Underline);
        shell.format(Format::Align(Alignment::Right));
        shell.format(Format::List(ListKind::Ordered));

        assert!(shell.is_active(Format::Bold));
        assert!(!shell.is_active(Format::Italic));
        assert!(shell.is_active(Format::Underline));
        assert!(shell.is_active(Format::Align(Alignment::Right)));
        assert!(shell.is_active(Format::List(ListKind::Ordered)));

        shell.format(Format::Bold);
        assert!(!shell.is_active(Format::Bold));
    }

    #[test]
    fn test_export_does_not_mutate_document() {
        let shell = EditorShell::new(
            MemoryDocument::with_content("<p>hello</p>"),
            ScriptedService::ok(""),
        );

        let export = shell.export();

        assert_eq!(export.content, "<p>hello</p>");
        assert!(export.file_name.starts_with("report_"));
        assert!(export.file_name.ends_with(".html"));
        assert_eq!(shell.document().content(), "<p>hello</p>");
    }
}
