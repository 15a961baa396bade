pub mod firecrawl;

use std::time::Instant;

use opentelemetry::KeyValue;
use url::Url;

use crate::error::AppError;
use crate::telemetry::metrics::{SCRAPE_CONTENT_LENGTH, SCRAPE_DURATION};

pub use firecrawl::FirecrawlFetcher;

/// Text extracted from a page by the Content Fetcher.
#[derive(Debug, Clone, Default)]
pub struct ScrapedPage {
    pub markdown: Option<String>,
    pub title: Option<String>,
    pub source_url: Option<String>,
}

#[async_trait::async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn scrape(&self, url: &Url) -> anyhow::Result<ScrapedPage>;
    fn name(&self) -> &str;
}

/// Scrapes `url` and returns its non-blank markdown, or `FetchFailed`.
#[tracing::instrument(
    name = "pipeline_stage scrape",
    skip(fetcher, url),
    fields(
        pipeline.stage = "scrape",
        scrape.provider = fetcher.name(),
        url.full = %url,
        scrape.title,
        scrape.content_length,
    )
)]
pub async fn scrape_content(fetcher: &dyn ContentFetcher, url: &Url) -> Result<String, AppError> {
    let start = Instant::now();
    let result = fetcher.scrape(url).await;
    let provider_kv = KeyValue::new("scrape.provider", fetcher.name().to_string());

    SCRAPE_DURATION.record(start.elapsed().as_secs_f64(), &[provider_kv.clone()]);

    let page = result.map_err(|e| AppError::FetchFailed(format!("{url}: {e:#}")))?;

    let span = tracing::Span::current();
    if let Some(title) = &page.title {
        span.record("scrape.title", title.as_str());
    }

    let markdown = page
        .markdown
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| AppError::FetchFailed(format!("no content found at {url}")))?;

    span.record("scrape.content_length", markdown.len());
    tracing::debug!(
        source_url = page.source_url.as_deref().unwrap_or(url.as_str()),
        "Scraped page content"
    );
    SCRAPE_CONTENT_LENGTH.record(markdown.len() as f64, &[provider_kv]);

    Ok(markdown)
}
