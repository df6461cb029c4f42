//! Tabular input: sensor readings and operator notes.
//! Parsing fails fast on the first malformed record and names its line.

mod notes;
mod readings;
mod time;

pub use notes::{load_notes, read_notes, write_notes};
pub use readings::{load_readings, read_readings, write_readings};
pub use time::parse_timestamp;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: missing {field}")]
    MissingField { line: u64, field: &'static str },

    #[error("line {line}: invalid {field} {value:?}: {reason}")]
    InvalidField {
        line: u64,
        field: &'static str,
        value: String,
        reason: String,
    },
}

/// One scalar sample from one signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub signal_id: String,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl Reading {
    pub fn new(signal_id: impl Into<String>, timestamp: DateTime<Utc>, value: f64) -> Self {
        Self {
            signal_id: signal_id.into(),
            timestamp,
            value,
        }
    }
}

fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn required<'a>(
    record: &'a csv::StringRecord,
    index: Option<usize>,
    field: &'static str,
) -> Result<&'a str, IngestError> {
    let line = line_of(record);
    let raw = index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .unwrap_or("");
    if raw.is_empty() {
        return Err(IngestError::MissingField { line, field });
    }
    Ok(raw)
}

fn column(headers: &csv::StringRecord, name: &'static str) -> Option<usize> {
    headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name))
}
