//! CSV and NDJSON renderings of windows and events.

use crate::events::Event;
use crate::features::{Verdict, WindowFrame};
use crate::logging::StructuredLogger;
use serde::Serialize;
use std::io::Write;

pub fn write_windows_csv<W: Write>(
    writer: W,
    frame: &WindowFrame<Verdict, Verdict>,
) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut header = vec!["window".to_string()];
    header.extend(frame.layout.column_names());
    header.extend(
        ["behavior_score", "behavior_anomaly", "structure_score", "structure_anomaly"]
            .iter()
            .map(|s| s.to_string()),
    );
    wtr.write_record(&header)?;

    for w in &frame.windows {
        let mut row = Vec::with_capacity(header.len());
        row.push(w.start.to_rfc3339());
        row.extend(w.features.iter().map(|v| v.to_string()));
        row.push(w.behavior.score.to_string());
        row.push(w.behavior.anomaly.to_string());
        row.push(w.structure.score.to_string());
        row.push(w.structure.anomaly.to_string());
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct EventRow<'a> {
    start: String,
    end: String,
    duration_minutes: i64,
    severity: f64,
    windows: usize,
    cluster: Option<u8>,
    tier: &'a str,
}

impl<'a> From<&'a Event> for EventRow<'a> {
    fn from(e: &'a Event) -> Self {
        Self {
            start: e.start.to_rfc3339(),
            end: e.end.to_rfc3339(),
            duration_minutes: e.duration_minutes,
            severity: e.severity,
            windows: e.windows,
            cluster: e.cluster,
            tier: e.tier().as_str(),
        }
    }
}

pub fn write_events_csv<W: Write>(writer: W, events: &[Event]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for e in events {
        wtr.serialize(EventRow::from(e))?;
    }
    wtr.flush()?;
    Ok(())
}

/// One JSON object per event per line.
pub fn write_events_ndjson<W: Write>(writer: &mut W, events: &[Event]) -> std::io::Result<()> {
    for e in events {
        StructuredLogger::emit_json(&EventRow::from(e), writer)?;
    }
    writer.flush()
}
