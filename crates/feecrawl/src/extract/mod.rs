//! Text extraction from fetched documents and fact extraction from text

mod facts;
mod html;
mod pdf;

pub use facts::{
    extract_facts, parse_billing_model, parse_hourly_rate, BUILDING_PERMIT_RATE,
    BUILDING_PERMIT_RATE_PATTERN, FOOD_CONTROL_RATE, FOOD_CONTROL_RATE_PATTERN,
};
pub use html::{extract_html, HtmlDocument};
pub use pdf::{extract_pdf_text, LopdfExtractor, PdfExtractor};
