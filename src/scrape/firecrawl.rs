use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use url::Url;

use super::{ContentFetcher, ScrapedPage};

/// Content Fetcher backed by the Firecrawl scrape API.
pub struct FirecrawlFetcher {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl FirecrawlFetcher {
    pub fn new(api_key: Option<&str>, base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.map(str::to_string),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: [&'static str; 1],
}

#[derive(Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    success: bool,
    data: Option<ScrapeData>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct ScrapeData {
    markdown: Option<String>,
    metadata: Option<ScrapeMetadata>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScrapeMetadata {
    title: Option<String>,
    #[serde(rename = "sourceURL")]
    source_url: Option<String>,
}

#[async_trait::async_trait]
impl ContentFetcher for FirecrawlFetcher {
    async fn scrape(&self, url: &Url) -> anyhow::Result<ScrapedPage> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &self.api_key {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {key}"))
                    .map_err(|e| anyhow::anyhow!("invalid API key header: {e}"))?,
            );
        }

        let response = self
            .client
            .post(format!("{}/v1/scrape", self.base_url))
            .headers(headers)
            .json(&ScrapeRequest {
                url: url.as_str(),
                formats: ["markdown"],
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let parsed = serde_json::from_str::<ScrapeResponse>(&body);
        if !status.is_success() {
            let detail = parsed.ok().and_then(|r| r.error).unwrap_or(body);
            return Err(anyhow::anyhow!("Firecrawl API error ({status}): {detail}"));
        }

        let parsed = parsed
            .map_err(|e| anyhow::anyhow!("Firecrawl returned an undecodable body: {e}"))?;
        if !parsed.success {
            return Err(anyhow::anyhow!(
                "Firecrawl scrape unsuccessful: {}",
                parsed.error.as_deref().unwrap_or("no error message")
            ));
        }

        let data = parsed
            .data
            .ok_or_else(|| anyhow::anyhow!("Firecrawl response carried no data"))?;
        let (title, source_url) = data
            .metadata
            .map(|m| (m.title, m.source_url))
            .unwrap_or_default();

        Ok(ScrapedPage {
            markdown: data.markdown,
            title,
            source_url,
        })
    }

    fn name(&self) -> &str {
        "firecrawl"
    }
}
