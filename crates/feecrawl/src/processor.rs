//! Per-municipality pipeline: fetch, extract, follow PDF links, match facts

use crate::error::CrawlError;
use crate::extract::{extract_facts, extract_html, PdfExtractor};
use crate::fetchers::Fetcher;
use crate::types::{FeeRecord, MunicipalityEntry};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Processes one municipality into a [`FeeRecord`]
///
/// Failures of the primary document yield an all-empty record. Failures of
/// linked PDFs are logged and skipped.
#[derive(Clone)]
pub struct MunicipalityProcessor {
    fetcher: Arc<dyn Fetcher>,
    pdf_extractor: Arc<dyn PdfExtractor>,
    follow_pdf_links: bool,
    max_pdf_links: Option<usize>,
}

impl MunicipalityProcessor {
    /// Create a processor that follows every linked PDF
    pub fn new(fetcher: Arc<dyn Fetcher>, pdf_extractor: Arc<dyn PdfExtractor>) -> Self {
        Self {
            fetcher,
            pdf_extractor,
            follow_pdf_links: true,
            max_pdf_links: None,
        }
    }

    /// Enable or disable fetching PDFs linked from HTML pages
    pub fn follow_pdf_links(mut self, follow: bool) -> Self {
        self.follow_pdf_links = follow;
        self
    }

    /// Cap the number of linked PDFs fetched per page
    pub fn max_pdf_links(mut self, max: Option<usize>) -> Self {
        self.max_pdf_links = max;
        self
    }

    /// Produce the record for `entry`; never fails
    pub async fn process(&self, entry: &MunicipalityEntry) -> FeeRecord {
        match self.collect_text(entry).await {
            Ok(text) => extract_facts(entry.name.as_str(), &text),
            Err(err) => {
                warn!(municipality = %entry.name, error = %err, "Failed to scrape municipality");
                FeeRecord::empty(entry.name.as_str())
            }
        }
    }

    /// Gather the lowercased text of the primary document and its linked PDFs
    pub async fn collect_text(&self, entry: &MunicipalityEntry) -> Result<String, CrawlError> {
        let page = self.fetcher.fetch(&entry.source_url).await?;

        let text = if page.is_pdf {
            self.pdf_extractor.extract_text(&page.content)?
        } else {
            let markup = String::from_utf8_lossy(&page.content);
            let document = extract_html(&markup, &page.url);
            let mut text = document.visible_text;

            if self.follow_pdf_links {
                let limit = self.max_pdf_links.unwrap_or(usize::MAX);
                for link in document.pdf_links.into_iter().take(limit) {
                    match self.linked_pdf_text(&link).await {
                        Ok(pdf_text) => {
                            text.push('\n');
                            text.push_str(&pdf_text);
                        }
                        Err(err) => {
                            warn!(
                                municipality = %entry.name,
                                url = %link,
                                error = %err,
                                "Skipping linked PDF"
                            );
                        }
                    }
                }
            }
            text
        };

        debug!(municipality = %entry.name, chars = text.len(), "Collected text");
        Ok(text.to_lowercase())
    }

    async fn linked_pdf_text(&self, link: &Url) -> Result<String, CrawlError> {
        let document = self.fetcher.fetch(link.as_str()).await?;
        Ok(self.pdf_extractor.extract_text(&document.content)?)
    }
}
