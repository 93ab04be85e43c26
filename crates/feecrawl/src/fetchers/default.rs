//! Default HTTP fetcher
//!
//! Issues a single GET per document with a bounded total timeout.

use crate::client::CrawlOptions;
use crate::error::FetchError;
use crate::fetchers::{is_pdf_url, parse_url, Fetcher};
use crate::types::FetchResult;
use crate::DEFAULT_USER_AGENT;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use tracing::debug;

/// HTTP fetcher backed by a shared `reqwest` client
///
/// - GET only, no cookies, no authentication
/// - No retries; any failure is returned to the caller
/// - Non-2xx responses are errors
/// - HTML bodies are decoded per the `Content-Type` charset (UTF-8 when
///   absent) and handed on as UTF-8; `<meta charset>` is not consulted
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher from crawl options
    pub fn new(options: &CrawlOptions) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        let user_agent = options.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html, application/pdf, */*;q=0.8"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(options.timeout)
            .timeout(options.timeout)
            .build()
            .map_err(FetchError::ClientBuildError)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError> {
        let parsed = parse_url(url)?;

        let response = self
            .client
            .get(parsed.clone())
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: parsed.to_string(),
            });
        }

        // HTML is decoded with the charset from Content-Type and stored as UTF-8
        let is_pdf = is_pdf_url(&parsed);
        let content = if is_pdf {
            response.bytes().await.map_err(FetchError::from_reqwest)?
        } else {
            let text = response.text().await.map_err(FetchError::from_reqwest)?;
            Bytes::from(text)
        };
        debug!(url = %parsed, is_pdf, bytes = content.len(), "Fetched document");

        Ok(FetchResult {
            url: parsed,
            content,
            is_pdf,
        })
    }
}
