//! Run outputs: summary JSON, window and event tables, event NDJSON.

mod summary;
mod tables;

pub use summary::{
    digest_bytes, health_score, note_links, EventDiagnosis, EventNoteLink, LinkedNote, RunSummary,
};
pub use tables::{write_events_csv, write_events_ndjson, write_windows_csv};

use crate::pipeline::PipelineOutput;
use std::fs::File;
use serde::Serialize;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

fn create(path: &Path) -> Result<BufWriter<File>, ReportError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn write_json(path: &Path, value: &(impl Serialize + ?Sized)) -> Result<(), ReportError> {
    let mut writer = create(path)?;
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush().map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `summary.json`, `windows.csv`, `events.csv`, `events.ndjson` and,
/// when present, `event_notes.json` and `diagnoses.json` into `dir`.
pub fn write_report(
    dir: &Path,
    output: &PipelineOutput,
    summary: &RunSummary,
    links: &[EventNoteLink],
    diagnoses: &[EventDiagnosis],
) -> Result<(), ReportError> {
    std::fs::create_dir_all(dir).map_err(|source| ReportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    write_json(&dir.join("summary.json"), summary)?;
    write_windows_csv(create(&dir.join("windows.csv"))?, &output.frame)?;
    write_events_csv(create(&dir.join("events.csv"))?, &output.events)?;

    let ndjson_path = dir.join("events.ndjson");
    write_events_ndjson(&mut create(&ndjson_path)?, &output.events).map_err(|source| {
        ReportError::Io {
            path: ndjson_path.clone(),
            source,
        }
    })?;

    if !links.is_empty() {
        write_json(&dir.join("event_notes.json"), links)?;
    }
    if !diagnoses.is_empty() {
        write_json(&dir.join("diagnoses.json"), diagnoses)?;
    }

    info!(dir = %dir.display(), events = output.events.len(), "report written");
    Ok(())
}
