//! Readings CSV: `signal_id,timestamp,value`.

use super::{column, line_of, parse_timestamp, required, IngestError, Reading};
use std::io::{Read, Write};
use std::path::Path;

pub fn read_readings<R: Read>(reader: R) -> Result<Vec<Reading>, IngestError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let signal_col = column(&headers, "signal_id");
    let ts_col = column(&headers, "timestamp");
    let value_col = column(&headers, "value");

    let mut out = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let line = line_of(&record);

        let signal_id = required(&record, signal_col, "signal_id")?;
        let raw_ts = required(&record, ts_col, "timestamp")?;
        let raw_value = required(&record, value_col, "value")?;

        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| IngestError::InvalidField {
            line,
            field: "timestamp",
            value: raw_ts.to_string(),
            reason: "not an ISO-8601 timestamp".into(),
        })?;
        let value: f64 = raw_value.parse().map_err(|e: std::num::ParseFloatError| {
            IngestError::InvalidField {
                line,
                field: "value",
                value: raw_value.to_string(),
                reason: e.to_string(),
            }
        })?;
        if !value.is_finite() {
            return Err(IngestError::InvalidField {
                line,
                field: "value",
                value: raw_value.to_string(),
                reason: "not finite".into(),
            });
        }

        out.push(Reading::new(signal_id, timestamp, value));
    }
    Ok(out)
}

pub fn load_readings(path: &Path) -> Result<Vec<Reading>, IngestError> {
    let file = std::fs::File::open(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_readings(std::io::BufReader::new(file))
}

pub fn write_readings<W: Write>(writer: W, readings: &[Reading]) -> Result<(), IngestError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["signal_id", "timestamp", "value"])?;
    for r in readings {
        let ts = r.timestamp.format("%Y-%m-%d %H:%M:%S%.3f").to_string();
        let value = r.value.to_string();
        wtr.write_record([r.signal_id.as_str(), ts.as_str(), value.as_str()])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}
