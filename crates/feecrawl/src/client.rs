//! Crawler configuration and the run aggregator
//!
//! [`Crawler`] processes every municipality and collects one
//! [`FeeRecord`](crate::FeeRecord) per entry, in input order.

use crate::error::FetchError;
use crate::extract::{LopdfExtractor, PdfExtractor};
use crate::fetchers::{Fetcher, HttpFetcher};
use crate::processor::MunicipalityProcessor;
use crate::types::{MunicipalityEntry, ResultTable};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Municipalities processed at the same time
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Crawl options that can be configured via [`CrawlerBuilder`]
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Custom User-Agent
    pub user_agent: Option<String>,
    /// Timeout for each HTTP request
    pub timeout: Duration,
    /// Maximum municipalities in flight; 1 is fully sequential
    pub concurrency: usize,
    /// Fetch PDFs linked from HTML pages
    pub follow_pdf_links: bool,
    /// Maximum linked PDFs fetched per page
    pub max_pdf_links: Option<usize>,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            user_agent: None,
            timeout: DEFAULT_TIMEOUT,
            concurrency: DEFAULT_CONCURRENCY,
            follow_pdf_links: true,
            max_pdf_links: None,
        }
    }
}

/// Builder for configuring a [`Crawler`]
#[derive(Default)]
pub struct CrawlerBuilder {
    options: CrawlOptions,
    fetcher: Option<Arc<dyn Fetcher>>,
    pdf_extractor: Option<Arc<dyn PdfExtractor>>,
}

impl CrawlerBuilder {
    /// Create a builder with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all options at once
    pub fn options(mut self, options: CrawlOptions) -> Self {
        self.options = options;
        self
    }

    /// Set custom User-Agent
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.options.user_agent = Some(ua.into());
        self
    }

    /// Set the per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Set how many municipalities are processed in parallel
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.options.concurrency = concurrency;
        self
    }

    /// Enable or disable following PDF links found on HTML pages
    pub fn follow_pdf_links(mut self, follow: bool) -> Self {
        self.options.follow_pdf_links = follow;
        self
    }

    /// Cap linked PDFs fetched per page
    pub fn max_pdf_links(mut self, max: usize) -> Self {
        self.options.max_pdf_links = Some(max);
        self
    }

    /// Use a custom fetcher instead of [`HttpFetcher`]
    pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Use a custom PDF extractor instead of [`LopdfExtractor`]
    pub fn pdf_extractor(mut self, extractor: Arc<dyn PdfExtractor>) -> Self {
        self.pdf_extractor = Some(extractor);
        self
    }

    /// Build the crawler
    ///
    /// Fails only when the default HTTP client cannot be created.
    pub fn build(self) -> Result<Crawler, FetchError> {
        let fetcher: Arc<dyn Fetcher> = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(HttpFetcher::new(&self.options)?),
        };
        let pdf_extractor: Arc<dyn PdfExtractor> = match self.pdf_extractor {
            Some(extractor) => extractor,
            None => Arc::new(LopdfExtractor),
        };

        let processor = MunicipalityProcessor::new(fetcher, pdf_extractor)
            .follow_pdf_links(self.options.follow_pdf_links)
            .max_pdf_links(self.options.max_pdf_links);

        Ok(Crawler {
            processor,
            concurrency: self.options.concurrency.max(1),
        })
    }
}

/// Configured crawler
#[derive(Clone)]
pub struct Crawler {
    processor: MunicipalityProcessor,
    concurrency: usize,
}

impl Crawler {
    /// Create a new crawler builder
    pub fn builder() -> CrawlerBuilder {
        CrawlerBuilder::new()
    }

    /// Effective parallelism
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Process every entry and return one row per entry, in input order
    ///
    /// Never fails; a municipality that cannot be scraped gets an empty row.
    pub async fn run(&self, entries: &[MunicipalityEntry]) -> ResultTable {
        info!(
            entries = entries.len(),
            concurrency = self.concurrency,
            "Starting crawl"
        );

        // `buffered` yields in input order regardless of completion order
        let rows = stream::iter(entries)
            .map(|entry| self.processor.process(entry))
            .buffered(self.concurrency)
            .collect::<Vec<_>>()
            .await;

        let table = ResultTable::new(rows);
        let summary = table.summary();
        info!(
            total = summary.total,
            food_control_rates = summary.food_control_rates,
            billing_models = summary.billing_models,
            building_permit_rates = summary.building_permit_rates,
            empty = summary.empty,
            "Crawl finished"
        );
        table
    }
}

/// Crawl `entries` with the default HTTP fetcher and PDF extractor
pub async fn run(entries: &[MunicipalityEntry]) -> Result<ResultTable, FetchError> {
    let crawler = Crawler::builder().build()?;
    Ok(crawler.run(entries).await)
}
