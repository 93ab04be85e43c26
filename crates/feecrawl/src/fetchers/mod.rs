//! Fetcher seam for retrieving fee-schedule documents
//!
//! Design: the crawler only talks to the network through [`Fetcher`], so
//! tests and alternative transports can be injected at build time.

mod default;

pub use default::HttpFetcher;

use crate::error::FetchError;
use crate::types::FetchResult;
use async_trait::async_trait;
use url::Url;

/// Trait for document fetchers
///
/// Implementations perform exactly one attempt per call and classify the
/// result as PDF or HTML from the URL path (see [`is_pdf_url`]). HTML
/// content is handed back as UTF-8.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Unique identifier for this fetcher (for logging/debugging)
    fn name(&self) -> &'static str;

    /// Fetch the document at `url`
    async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError>;
}

/// Parse and validate an absolute http(s) URL
pub fn parse_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        _ => Err(FetchError::InvalidUrlScheme),
    }
}

/// True when the URL path ends in `.pdf` (case-insensitive)
///
/// Query string and fragment are ignored.
pub fn is_pdf_url(url: &Url) -> bool {
    url.path().to_ascii_lowercase().ends_with(".pdf")
}
