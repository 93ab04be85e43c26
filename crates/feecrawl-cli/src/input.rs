//! Loading the municipality -> URL mapping from JSON or CSV files

use feecrawl::MunicipalityEntry;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading the municipality list
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid entry {name:?}: URL must be a string")]
    InvalidEntry { name: String },
}

/// Load entries from `path`
///
/// `.json` files hold an object mapping names to URLs. Anything else is
/// read as `municipality,url` lines; an optional header line is skipped.
pub fn load_municipalities(path: &Path) -> Result<Vec<MunicipalityEntry>, InputError> {
    if !path.exists() {
        return Err(InputError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        let map: Map<String, Value> =
            serde_json::from_str(&content).map_err(|source| InputError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        parse_json_mapping(map)
    } else {
        Ok(parse_csv_mapping(&content))
    }
}

fn parse_json_mapping(map: Map<String, Value>) -> Result<Vec<MunicipalityEntry>, InputError> {
    map.into_iter()
        .map(|(name, value)| match value {
            Value::String(url) => Ok(MunicipalityEntry::new(name, url)),
            _ => Err(InputError::InvalidEntry { name }),
        })
        .collect()
}

fn parse_csv_mapping(content: &str) -> Vec<MunicipalityEntry> {
    let mut entries: Vec<MunicipalityEntry> = Vec::new();

    for line in content.lines() {
        let cells: Vec<&str> = line.split(',').map(str::trim).collect();
        if cells.len() < 2 {
            continue;
        }
        let (name, url) = (cells[0], cells[1]);
        if name.eq_ignore_ascii_case("municipality") && url.eq_ignore_ascii_case("url") {
            continue;
        }
        // Later duplicates replace the URL but keep the first position
        match entries.iter_mut().find(|entry| entry.name == name) {
            Some(existing) => existing.source_url = url.to_string(),
            None => entries.push(MunicipalityEntry::new(name, url)),
        }
    }

    entries
}
