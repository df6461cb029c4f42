//! Operator notes CSV: `timestamp,log`.

use super::{column, line_of, parse_timestamp, required, IngestError};
use crate::notes::OperatorNote;
use std::io::{Read, Write};
use std::path::Path;

pub fn read_notes<R: Read>(reader: R) -> Result<Vec<OperatorNote>, IngestError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let ts_col = column(&headers, "timestamp");
    let text_col = column(&headers, "log");

    let mut out = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let raw_ts = required(&record, ts_col, "timestamp")?;
        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| IngestError::InvalidField {
            line: line_of(&record),
            field: "timestamp",
            value: raw_ts.to_string(),
            reason: "not an ISO-8601 timestamp".into(),
        })?;
        let text = text_col
            .and_then(|i| record.get(i))
            .unwrap_or("")
            .to_string();
        out.push(OperatorNote { timestamp, text });
    }
    Ok(out)
}

pub fn load_notes(path: &Path) -> Result<Vec<OperatorNote>, IngestError> {
    let file = std::fs::File::open(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_notes(std::io::BufReader::new(file))
}

pub fn write_notes<W: Write>(writer: W, notes: &[OperatorNote]) -> Result<(), IngestError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["timestamp", "log"])?;
    for n in notes {
        wtr.write_record([
            n.timestamp.format("%Y-%m-%d %H:%M:%S").to_string().as_str(),
            n.text.as_str(),
        ])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}
