//! Readings → windows, with forward/backward fill across sampling gaps.

use super::{FeatureLayout, SignalSummary, Statistic, Unscored, Window, WindowFrame};
use crate::config::WindowConfig;
use crate::ingest::Reading;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

fn bucket_of(ts: &DateTime<Utc>, width_secs: i64) -> i64 {
    let secs = ts.timestamp();
    secs - secs.rem_euclid(width_secs)
}

/// Group readings into `width_secs` buckets. One window per occupied bucket,
/// ascending; each signal contributes mean/std/last columns.
pub fn aggregate_windows(readings: &[Reading], config: &WindowConfig) -> WindowFrame {
    let width = config.width_secs.max(1);

    let signals: BTreeSet<&str> = readings.iter().map(|r| r.signal_id.as_str()).collect();
    let layout = FeatureLayout::new(signals.iter().map(|s| s.to_string()).collect());
    let signal_index: BTreeMap<&str, usize> =
        signals.iter().enumerate().map(|(i, s)| (*s, i)).collect();

    // bucket -> signal -> (timestamp, input position, value)
    let mut buckets: BTreeMap<i64, Vec<Vec<(DateTime<Utc>, usize, f64)>>> = BTreeMap::new();
    for (pos, r) in readings.iter().enumerate() {
        let per_signal = buckets
            .entry(bucket_of(&r.timestamp, width))
            .or_insert_with(|| vec![Vec::new(); signals.len()]);
        if let Some(&idx) = signal_index.get(r.signal_id.as_str()) {
            per_signal[idx].push((r.timestamp, pos, r.value));
        }
    }

    // None marks a signal with no samples in the bucket; filled below.
    let mut rows: Vec<(i64, Vec<Option<SignalSummary>>)> = buckets
        .into_iter()
        .map(|(bucket, mut per_signal)| {
            let summaries = per_signal
                .iter_mut()
                .map(|samples| {
                    samples.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
                    let values: Vec<f64> = samples.iter().map(|s| s.2).collect();
                    SignalSummary::from_samples(&values)
                })
                .collect();
            (bucket, summaries)
        })
        .collect();

    let filled = fill_gaps(&mut rows, signals.len());

    let windows: Vec<Window> = rows
        .into_iter()
        .map(|(bucket, summaries)| {
            let mut features = vec![0.0; layout.dim()];
            for (i, summary) in summaries.into_iter().enumerate() {
                let values = summary.map(SignalSummary::to_array).unwrap_or([0.0; 3]);
                for (stat, v) in Statistic::ALL.iter().zip(values) {
                    features[layout.index(i, *stat)] = v;
                }
            }
            Window {
                start: Utc
                    .timestamp_opt(bucket, 0)
                    .single()
                    .unwrap_or_default(),
                features,
                behavior: Unscored,
                structure: Unscored,
            }
        })
        .collect();

    debug!(
        readings = readings.len(),
        signals = layout.signals().len(),
        windows = windows.len(),
        filled,
        "aggregated windows"
    );

    WindowFrame { layout, windows }
}

/// Forward fill, then backward fill, per signal. Returns the number of cells filled.
fn fill_gaps(rows: &mut [(i64, Vec<Option<SignalSummary>>)], signal_count: usize) -> usize {
    let mut filled = 0;
    for s in 0..signal_count {
        let mut carry: Option<SignalSummary> = None;
        for row in rows.iter_mut() {
            match row.1[s] {
                Some(v) => carry = Some(v),
                None if carry.is_some() => {
                    row.1[s] = carry;
                    filled += 1;
                }
                None => {}
            }
        }
        let mut carry: Option<SignalSummary> = None;
        for row in rows.iter_mut().rev() {
            match row.1[s] {
                Some(v) => carry = Some(v),
                None if carry.is_some() => {
                    row.1[s] = carry;
                    filled += 1;
                }
                None => {}
            }
        }
    }
    filled
}
