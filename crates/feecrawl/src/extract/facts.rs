//! Regex-based fee fact extraction
//!
//! The patterns run over lowercased document text. They are deliberately
//! loose: each allows arbitrary text between the keyword groups and the
//! number, matched non-greedily. `.` does not cross line breaks.

use crate::types::{BillingModel, FeeRecord};
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

/// "timtaxa ... livsmedelskontroll ... <number>"
pub const FOOD_CONTROL_RATE_PATTERN: &str = r"timtaxa.*?livsmedelskontroll.*?(\d+[,.]?\d*)";

/// "timtaxa ... bygglov ... <number>"
pub const BUILDING_PERMIT_RATE_PATTERN: &str = r"timtaxa.*?bygglov.*?(\d+[,.]?\d*)";

const ARREARS_PATTERN: &str = r"efterhandsdebitering";
const ADVANCE_PATTERN: &str = r"f[oö]rhands|f[oö]rskott";

pub static FOOD_CONTROL_RATE: LazyLock<Regex> =
    LazyLock::new(|| case_insensitive(FOOD_CONTROL_RATE_PATTERN));
pub static BUILDING_PERMIT_RATE: LazyLock<Regex> =
    LazyLock::new(|| case_insensitive(BUILDING_PERMIT_RATE_PATTERN));
static ARREARS: LazyLock<Regex> = LazyLock::new(|| case_insensitive(ARREARS_PATTERN));
static ADVANCE: LazyLock<Regex> = LazyLock::new(|| case_insensitive(ADVANCE_PATTERN));

fn case_insensitive(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("built-in pattern is valid")
}

/// Parse the first number captured by `pattern`
///
/// `pattern` must have one capture group holding a decimal number that
/// may use a comma separator. A miss or an unparsable capture is `None`.
///
/// Only ASCII digits parse. `\d` also matches other Unicode decimal digits
/// (for example Arabic-Indic `١٢٠٠`); such a capture yields `None`.
pub fn parse_hourly_rate(text: &str, pattern: &Regex) -> Option<f64> {
    let captured = pattern.captures(text)?.get(1)?.as_str();
    captured.replace(',', ".").parse::<f64>().ok()
}

/// Detect the billing model; arrears wins over advance
pub fn parse_billing_model(text: &str) -> Option<BillingModel> {
    if ARREARS.is_match(text) {
        Some(BillingModel::Efterhands)
    } else if ADVANCE.is_match(text) {
        Some(BillingModel::Forskott)
    } else {
        None
    }
}

/// Run all three extractions against normalized text
pub fn extract_facts(municipality: impl Into<String>, text: &str) -> FeeRecord {
    FeeRecord {
        municipality: municipality.into(),
        food_control_hourly_rate: parse_hourly_rate(text, &FOOD_CONTROL_RATE),
        food_control_billing_model: parse_billing_model(text),
        building_permit_hourly_rate: parse_hourly_rate(text, &BUILDING_PERMIT_RATE),
    }
}
