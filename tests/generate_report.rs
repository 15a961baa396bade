//! Report Orchestrator and HTTP boundary tests with counting stand-ins for
//! the Content Fetcher and Completion Engine.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tokio_test::{assert_err, assert_ok};
use tower::ServiceExt;
use url::Url;

use insight_report::error::GENERIC_FAILURE;
use insight_report::llm::{GenerateRequest, GenerateResponse, LlmClient, Provider};
use insight_report::report::prompt::{DEEP_ANALYSIS_PROMPT, EXECUTIVE_PROMPT, user_message};
use insight_report::report::{GenerationRequest, ReportType, generate_report};
use insight_report::scrape::{ContentFetcher, ScrapedPage};
use insight_report::{AppState, build_router};

const EXAMPLE_CONTENT: &str = "Example Domain. This domain is for use in illustrative examples.";

#[derive(Default)]
struct StubFetcher {
    markdown: Option<String>,
    fail: bool,
    calls: AtomicUsize,
}

impl StubFetcher {
    fn returning(markdown: &str) -> Arc<Self> {
        Arc::new(Self {
            markdown: Some(markdown.to_string()),
            ..Default::default()
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Default::default()
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ContentFetcher for StubFetcher {
    async fn scrape(&self, _url: &Url) -> anyhow::Result<ScrapedPage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("Firecrawl API error (402 Payment Required): insufficient credits");
        }
        Ok(ScrapedPage {
            markdown: self.markdown.clone(),
            title: Some("Example Domain".to_string()),
            source_url: None,
        })
    }

    fn name(&self) -> &str {
        "stub"
    }
}

struct EchoProvider {
    reply: &'static str,
    seen: Mutex<Vec<GenerateRequest>>,
}

impl EchoProvider {
    fn new(reply: &'static str) -> Arc<Self> {
        Arc::new(Self {
            reply,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    fn last(&self) -> GenerateRequest {
        self.seen.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait::async_trait]
impl Provider for EchoProvider {
    async fn generate(&self, req: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        self.seen.lock().unwrap().push(req.clone());
        Ok(GenerateResponse {
            content: self.reply.to_string(),
            model: req.model.clone(),
            input_tokens: 42,
            output_tokens: 7,
            finish_reason: "stop".to_string(),
            provider: String::new(),
        })
    }

    fn name(&self) -> &str {
        "echo"
    }
}

/// Answers only after `delay`; `finished` flips once it does.
struct StalledProvider {
    delay: Duration,
    finished: AtomicBool,
}

#[async_trait::async_trait]
impl Provider for StalledProvider {
    async fn generate(&self, req: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        tokio::time::sleep(self.delay).await;
        self.finished.store(true, Ordering::SeqCst);
        Ok(GenerateResponse {
            content: "<html>late</html>".to_string(),
            model: req.model.clone(),
            input_tokens: 0,
            output_tokens: 0,
            finish_reason: "stop".to_string(),
            provider: String::new(),
        })
    }

    fn name(&self) -> &str {
        "stalled"
    }
}

fn llm(provider: &Arc<EchoProvider>) -> LlmClient {
    LlmClient::new(provider.clone(), "gpt-4", 1500)
}

fn scenario_a() -> GenerationRequest {
    GenerationRequest::new("https://example.com", "focus on pricing")
        .report_type(ReportType::Executive)
}

#[tokio::test]
async fn scenario_a_returns_model_html_verbatim() {
    let fetcher = StubFetcher::returning(EXAMPLE_CONTENT);
    let provider = EchoProvider::new("<html>OK</html>");

    let report = assert_ok!(generate_report(fetcher.as_ref(), &llm(&provider), &scenario_a()).await);

    assert_eq!(report.html, "<html>OK</html>");
    assert_eq!(fetcher.calls(), 1);
    assert_eq!(provider.calls(), 1);

    let sent = provider.last();
    assert_eq!(sent.system, EXECUTIVE_PROMPT);
    assert_eq!(
        sent.prompt,
        user_message(EXAMPLE_CONTENT, "focus on pricing", ReportType::Executive, false)
    );
    assert_eq!(sent.max_tokens, 1500);
}

#[tokio::test]
async fn scenario_b_empty_content_skips_completion() {
    let fetcher = StubFetcher::returning("");
    let provider = EchoProvider::new("<html>OK</html>");

    let err = assert_err!(generate_report(fetcher.as_ref(), &llm(&provider), &scenario_a()).await);

    assert_eq!(err.kind(), "fetch_failed");
    assert_eq!(fetcher.calls(), 1);
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn scenario_c_advanced_analysis_overrides_technical() {
    let fetcher = StubFetcher::returning(EXAMPLE_CONTENT);
    let provider = EchoProvider::new("<html>deep</html>");
    let request = GenerationRequest::new("https://example.com", "")
        .report_type(ReportType::Technical)
        .advanced_analysis(true);

    assert_ok!(generate_report(fetcher.as_ref(), &llm(&provider), &request).await);

    let sent = provider.last();
    assert_eq!(sent.system, DEEP_ANALYSIS_PROMPT);
    assert!(sent.prompt.contains("- Report Type: technical\n"));
    assert!(sent.prompt.contains("- Advanced Analysis: true\n"));
}

#[tokio::test]
async fn invalid_urls_touch_no_upstream() {
    for url in ["", "not a url", "ftp://example.com/file"] {
        let fetcher = StubFetcher::returning(EXAMPLE_CONTENT);
        let provider = EchoProvider::new("<html>OK</html>");
        let request = GenerationRequest::new(url, "anything");

        let err = assert_err!(generate_report(fetcher.as_ref(), &llm(&provider), &request).await);

        assert_eq!(err.kind(), "invalid_input", "url {url:?}");
        assert_eq!(fetcher.calls(), 0);
        assert_eq!(provider.calls(), 0);
    }
}

#[tokio::test]
async fn fetch_errors_skip_completion() {
    let fetcher = StubFetcher::failing();
    let provider = EchoProvider::new("<html>OK</html>");

    let err = assert_err!(generate_report(fetcher.as_ref(), &llm(&provider), &scenario_a()).await);

    assert_eq!(err.kind(), "fetch_failed");
    assert!(err.to_string().contains("insufficient credits"));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn blank_completion_is_a_completion_failure() {
    let fetcher = StubFetcher::returning(EXAMPLE_CONTENT);
    let provider = EchoProvider::new("   ");

    let err = assert_err!(generate_report(fetcher.as_ref(), &llm(&provider), &scenario_a()).await);

    assert_eq!(err.kind(), "completion_failed");
    assert_eq!(provider.calls(), 1);
}

// --- HTTP boundary ---

fn app(fetcher: Arc<StubFetcher>, provider: &Arc<EchoProvider>) -> axum::Router {
    build_router(AppState {
        fetcher,
        llm_client: Arc::new(llm(provider)),
        request_timeout: Duration::from_secs(30),
    })
}

async fn post_json(app: axum::Router, body: String) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/generate-report")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn http_success_returns_html_body() {
    let provider = EchoProvider::new("<html>OK</html>");
    let body = json!({
        "url": "https://example.com",
        "instructions": "focus on pricing",
        "reportType": "executive",
    });

    let (status, json) = post_json(
        app(StubFetcher::returning(EXAMPLE_CONTENT), &provider),
        body.to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "html": "<html>OK</html>" }));
}

#[tokio::test]
async fn http_failures_are_generic_500s() {
    let cases = [
        (StubFetcher::returning(EXAMPLE_CONTENT), json!({ "instructions": "no url" }).to_string()),
        (StubFetcher::returning(EXAMPLE_CONTENT), "{not json".to_string()),
        (StubFetcher::returning(""), json!({ "url": "https://example.com" }).to_string()),
        (StubFetcher::failing(), json!({ "url": "https://example.com" }).to_string()),
    ];

    for (fetcher, body) in cases {
        let provider = EchoProvider::new("<html>OK</html>");

        let (status, json) = post_json(app(fetcher, &provider), body.clone()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "body {body}");
        assert_eq!(json["error"], GENERIC_FAILURE);
        assert!(json.get("html").is_none());
        assert_eq!(provider.calls(), 0);
    }
}

#[tokio::test(start_paused = true)]
async fn http_deadline_overrun_is_a_generic_500() {
    let provider = Arc::new(StalledProvider {
        delay: Duration::from_secs(5),
        finished: AtomicBool::new(false),
    });
    let app = build_router(AppState {
        fetcher: StubFetcher::returning(EXAMPLE_CONTENT),
        llm_client: Arc::new(LlmClient::new(provider.clone(), "gpt-4", 1500)),
        request_timeout: Duration::from_millis(100),
    });

    let (status, json) = post_json(app, json!({ "url": "https://example.com" }).to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], GENERIC_FAILURE);
    assert!(json.get("html").is_none());

    // The abandoned pipeline is cancelled, not left to finish in the background.
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(!provider.finished.load(Ordering::SeqCst));
}

#[tokio::test]
async fn health_reports_upstreams() {
    let provider = EchoProvider::new("");
    let response = app(StubFetcher::returning(""), &provider)
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["fetcher"], "stub");
    assert_eq!(json["llm_provider"], "echo");
}
