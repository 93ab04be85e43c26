//! feecrawl - municipal fee-schedule crawler
//!
//! Fetches each municipality's fee-schedule page (HTML or PDF), follows PDF
//! links found on HTML pages one hop deep, and pulls three facts out of the
//! combined text:
//!
//! - hourly rate for food control inspections
//! - billing model for food control (`efterhands` or `forskott`)
//! - hourly rate for building permits
//!
//! ## Pipeline
//!
//! [`Crawler`] runs a [`MunicipalityProcessor`] per [`MunicipalityEntry`],
//! a bounded number at a time, and returns a [`ResultTable`] with exactly
//! one [`FeeRecord`] per entry in input order. Network access goes through
//! the [`Fetcher`] trait ([`HttpFetcher`] by default) and PDF parsing
//! through [`PdfExtractor`] ([`LopdfExtractor`] by default); both can be
//! replaced via [`CrawlerBuilder`].

pub mod client;
mod error;
pub mod extract;
pub mod fetchers;
mod processor;
mod types;

pub use client::{run, CrawlOptions, Crawler, CrawlerBuilder};
pub use error::{CrawlError, FetchError, ParseError};
pub use extract::{
    extract_facts, extract_html, extract_pdf_text, parse_billing_model, parse_hourly_rate,
    HtmlDocument, LopdfExtractor, PdfExtractor,
};
pub use fetchers::{Fetcher, HttpFetcher};
pub use processor::MunicipalityProcessor;
pub use types::{
    BillingModel, FeeRecord, FetchResult, MunicipalityEntry, ResultTable, RunSummary,
};

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str = "feecrawl/0.1";
