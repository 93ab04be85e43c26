//! Core types for feecrawl

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// One municipality and the page (or PDF) holding its fee schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MunicipalityEntry {
    /// Unique municipality name
    pub name: String,
    /// Source URL of the fee schedule
    pub source_url: String,
}

impl MunicipalityEntry {
    /// Create a new entry
    pub fn new(name: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_url: source_url.into(),
        }
    }

    /// Build entries from a name -> URL mapping, keeping iteration order
    pub fn from_mapping<I, N, U>(mapping: I) -> Vec<Self>
    where
        I: IntoIterator<Item = (N, U)>,
        N: Into<String>,
        U: Into<String>,
    {
        mapping
            .into_iter()
            .map(|(name, url)| Self::new(name, url))
            .collect()
    }
}

/// Raw document returned by a [`Fetcher`](crate::Fetcher)
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// URL that was requested
    pub url: Url,
    /// Response body; UTF-8 text for HTML, raw bytes for PDF
    pub content: Bytes,
    /// True when the URL path ends in `.pdf`
    pub is_pdf: bool,
}

/// How food control inspections are billed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingModel {
    /// Billed afterwards, by hours actually spent
    Efterhands,
    /// Billed in advance, by estimated hours
    Forskott,
}

impl BillingModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingModel::Efterhands => "efterhands",
            BillingModel::Forskott => "forskott",
        }
    }
}

impl fmt::Display for BillingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extracted fee facts for one municipality
///
/// `None` means the fact was not found, not that it was not attempted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeRecord {
    pub municipality: String,
    pub food_control_hourly_rate: Option<f64>,
    pub food_control_billing_model: Option<BillingModel>,
    pub building_permit_hourly_rate: Option<f64>,
}

impl FeeRecord {
    /// Record with every fact missing
    pub fn empty(municipality: impl Into<String>) -> Self {
        Self {
            municipality: municipality.into(),
            food_control_hourly_rate: None,
            food_control_billing_model: None,
            building_permit_hourly_rate: None,
        }
    }

    /// True when no fact was found
    pub fn is_empty(&self) -> bool {
        self.food_control_hourly_rate.is_none()
            && self.food_control_billing_model.is_none()
            && self.building_permit_hourly_rate.is_none()
    }
}

/// Ordered result rows, one per input municipality
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultTable {
    rows: Vec<FeeRecord>,
}

impl ResultTable {
    pub fn new(rows: Vec<FeeRecord>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[FeeRecord] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<FeeRecord> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Count how many rows carry each fact
    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary {
            total: self.rows.len(),
            ..Default::default()
        };
        for row in &self.rows {
            if row.food_control_hourly_rate.is_some() {
                summary.food_control_rates += 1;
            }
            if row.food_control_billing_model.is_some() {
                summary.billing_models += 1;
            }
            if row.building_permit_hourly_rate.is_some() {
                summary.building_permit_rates += 1;
            }
            if row.is_empty() {
                summary.empty += 1;
            }
        }
        summary
    }
}

impl IntoIterator for ResultTable {
    type Item = FeeRecord;
    type IntoIter = std::vec::IntoIter<FeeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

/// Per-fact hit counts for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub food_control_rates: usize,
    pub billing_models: usize,
    pub building_permit_rates: usize,
    /// Rows with no fact at all (failed or nothing matched)
    pub empty: usize,
}
