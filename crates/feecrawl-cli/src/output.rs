//! Writing the result table as CSV or JSON, and printing it

use clap::ValueEnum;
use feecrawl::{FeeRecord, ResultTable};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const COLUMNS: [&str; 4] = [
    "municipality",
    "food_control_hourly_rate",
    "food_control_billing_model",
    "building_permit_hourly_rate",
];

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    /// Pick the format from the file extension, CSV unless `.json`
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => OutputFormat::Json,
            _ => OutputFormat::Csv,
        }
    }
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize results")]
    Json(#[from] serde_json::Error),
}

/// Serialize `table` to `path`
pub fn write_table(table: &ResultTable, path: &Path, format: OutputFormat) -> Result<(), OutputError> {
    let body = match format {
        OutputFormat::Csv => to_csv(table),
        OutputFormat::Json => serde_json::to_string_pretty(table)? + "\n",
    };
    fs::write(path, body).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Render as CSV; missing facts are empty cells
pub fn to_csv(table: &ResultTable) -> String {
    let mut out = COLUMNS.join(",");
    out.push('\n');
    for row in table.rows() {
        let values = cells(row);
        let escaped: Vec<String> = values.iter().map(|cell| escape_csv(cell)).collect();
        out.push_str(&escaped.join(","));
        out.push('\n');
    }
    out
}

/// Render an aligned plain-text table for the terminal
pub fn format_table(table: &ResultTable) -> String {
    let rows: Vec<[String; 4]> = table.rows().iter().map(cells).collect();
    let mut widths = COLUMNS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header = COLUMNS.map(str::to_string);
    for row in std::iter::once(&header).chain(rows.iter()) {
        let line: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}

fn cells(row: &FeeRecord) -> [String; 4] {
    [
        row.municipality.clone(),
        row.food_control_hourly_rate.map(format_rate).unwrap_or_default(),
        row.food_control_billing_model
            .map(|model| model.to_string())
            .unwrap_or_default(),
        row.building_permit_hourly_rate.map(format_rate).unwrap_or_default(),
    ]
}

fn format_rate(rate: f64) -> String {
    if rate.fract() == 0.0 {
        format!("{rate:.1}")
    } else {
        rate.to_string()
    }
}

fn escape_csv(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
