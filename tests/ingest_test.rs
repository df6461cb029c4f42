//! CSV parsing: accepted shapes and fail-fast errors.

use chrono::{TimeZone, Utc};
use sigdrift::ingest::{read_notes, read_readings, IngestError};

#[test]
fn parses_readings() {
    let csv = "signal_id,timestamp,value\n\
               motor_temp,2024-01-01 10:00:00,45.2\n\
               rpm,2024-01-01T10:00:30Z,1500\n\
               motor_temp , 2024-01-01T10:01:00.500 , -3.5e1\n";
    let readings = read_readings(csv.as_bytes()).unwrap();
    assert_eq!(readings.len(), 3);
    assert_eq!(readings[0].signal_id, "motor_temp");
    assert_eq!(
        readings[0].timestamp,
        Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
    );
    assert_eq!(readings[1].value, 1500.0);
    assert_eq!(readings[2].value, -35.0);
}

#[test]
fn column_order_does_not_matter() {
    let csv = "value,signal_id,timestamp\n1.5,a,2024-01-01 00:00:00\n";
    let readings = read_readings(csv.as_bytes()).unwrap();
    assert_eq!(readings[0].signal_id, "a");
    assert_eq!(readings[0].value, 1.5);
}

#[test]
fn bad_timestamp_names_its_line() {
    let csv = "signal_id,timestamp,value\n\
               a,2024-01-01 00:00:00,1\n\
               a,not-a-time,2\n";
    match read_readings(csv.as_bytes()) {
        Err(IngestError::InvalidField { line, field, value, .. }) => {
            assert_eq!(line, 3);
            assert_eq!(field, "timestamp");
            assert_eq!(value, "not-a-time");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn missing_value_is_rejected() {
    let csv = "signal_id,timestamp,value\na,2024-01-01 00:00:00,\n";
    assert!(matches!(
        read_readings(csv.as_bytes()),
        Err(IngestError::MissingField { line: 2, field: "value" })
    ));
}

#[test]
fn non_numeric_and_non_finite_values_are_rejected() {
    for bad in ["abc", "NaN", "inf"] {
        let csv = format!("signal_id,timestamp,value\na,2024-01-01 00:00:00,{bad}\n");
        assert!(matches!(
            read_readings(csv.as_bytes()),
            Err(IngestError::InvalidField { field: "value", .. })
        ));
    }
}

#[test]
fn missing_column_is_rejected() {
    let csv = "signal_id,value\na,1\n";
    assert!(matches!(
        read_readings(csv.as_bytes()),
        Err(IngestError::MissingField { field: "timestamp", .. })
    ));
}

#[test]
fn empty_file_has_no_readings() {
    let readings = read_readings("signal_id,timestamp,value\n".as_bytes()).unwrap();
    assert!(readings.is_empty());
}

#[test]
fn parses_operator_notes() {
    let csv = "timestamp,log\n\
               2024-01-01 10:15:30,\"Thermal alerts, motor housing\"\n";
    let notes = read_notes(csv.as_bytes()).unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].text, "Thermal alerts, motor housing");
}
