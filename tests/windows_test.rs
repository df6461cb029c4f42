//! Window aggregation invariants: bucket count, ordering, fill policy.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use sigdrift::config::WindowConfig;
use sigdrift::features::Statistic;
use sigdrift::{aggregate_windows, Reading};
use std::collections::BTreeSet;

// Minute-aligned epoch second.
const T0: i64 = 1_699_999_980;

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(T0 + secs, 0).unwrap()
}

fn feature(frame: &sigdrift::WindowFrame, window: usize, signal: &str, stat: Statistic) -> f64 {
    let idx = frame
        .layout
        .signals()
        .iter()
        .position(|s| s == signal)
        .unwrap();
    frame.windows[window].features[frame.layout.index(idx, stat)]
}

#[test]
fn unordered_readings_become_ascending_windows() {
    let readings = vec![
        Reading::new("b", at(130), 3.0),
        Reading::new("a", at(5), 1.0),
        Reading::new("a", at(65), 2.0),
        Reading::new("a", at(10), 5.0),
    ];
    let frame = aggregate_windows(&readings, &WindowConfig::default());
    assert_eq!(frame.len(), 3);
    assert_eq!(frame.layout.signals(), &["a".to_string(), "b".to_string()]);
    assert_eq!(frame.layout.dim(), 6);
    assert!(frame.windows.windows(2).all(|p| p[0].start < p[1].start));
    assert_eq!(frame.windows[0].start, at(0));

    assert_eq!(feature(&frame, 0, "a", Statistic::Mean), 3.0);
    assert!((feature(&frame, 0, "a", Statistic::Std) - 8.0f64.sqrt()).abs() < 1e-12);
    assert_eq!(feature(&frame, 0, "a", Statistic::Last), 5.0);
}

#[test]
fn last_value_follows_timestamp_not_input_order() {
    let readings = vec![
        Reading::new("a", at(50), 9.0),
        Reading::new("a", at(10), 1.0),
    ];
    let frame = aggregate_windows(&readings, &WindowConfig::default());
    assert_eq!(feature(&frame, 0, "a", Statistic::Last), 9.0);
}

#[test]
fn single_reading_per_window_has_zero_std() {
    let readings: Vec<Reading> = (0..10)
        .flat_map(|m| {
            [
                Reading::new("x", at(m * 60 + 1), m as f64),
                Reading::new("y", at(m * 60 + 30), (m * m) as f64),
            ]
        })
        .collect();
    let frame = aggregate_windows(&readings, &WindowConfig::default());
    assert_eq!(frame.len(), 10);
    for i in 0..frame.len() {
        assert_eq!(feature(&frame, i, "x", Statistic::Std), 0.0);
        assert_eq!(feature(&frame, i, "y", Statistic::Std), 0.0);
    }
}

#[test]
fn gaps_are_forward_then_backward_filled() {
    let readings = vec![
        Reading::new("a", at(0), 1.0),
        Reading::new("a", at(60), 2.0),
        Reading::new("a", at(120), 3.0),
        Reading::new("a", at(180), 4.0),
        Reading::new("b", at(70), 10.0),
        Reading::new("b", at(80), 20.0),
    ];
    let frame = aggregate_windows(&readings, &WindowConfig::default());
    assert_eq!(frame.len(), 4);
    // backward fill into window 0
    assert_eq!(feature(&frame, 0, "b", Statistic::Mean), 15.0);
    assert_eq!(feature(&frame, 0, "b", Statistic::Last), 20.0);
    // forward fill into windows 2 and 3
    for w in 2..4 {
        assert_eq!(feature(&frame, w, "b", Statistic::Mean), 15.0);
        assert!((feature(&frame, w, "b", Statistic::Std) - 50.0f64.sqrt()).abs() < 1e-12);
        assert_eq!(feature(&frame, w, "b", Statistic::Last), 20.0);
    }
}

#[test]
fn absent_signals_have_no_columns() {
    let readings = vec![Reading::new("only", at(0), 1.0)];
    let frame = aggregate_windows(&readings, &WindowConfig::default());
    assert_eq!(frame.layout.column_names(), vec!["only_mean", "only_std", "only_last"]);
}

#[test]
fn empty_input_gives_empty_frame() {
    let frame = aggregate_windows(&[], &WindowConfig::default());
    assert!(frame.is_empty());
    assert_eq!(frame.layout.dim(), 0);
}

#[test]
fn custom_width_groups_more_readings() {
    let readings: Vec<Reading> = (0..10).map(|m| Reading::new("a", at(m * 60), 1.0)).collect();
    let frame = aggregate_windows(&readings, &WindowConfig { width_secs: 300 });
    assert_eq!(frame.len(), 2);
}

proptest! {
    #[test]
    fn window_count_matches_distinct_buckets(
        samples in prop::collection::vec((0usize..3, 0i64..20_000, -1e3f64..1e3), 0..200)
    ) {
        let names = ["s0", "s1", "s2"];
        let readings: Vec<Reading> = samples
            .iter()
            .map(|(s, secs, v)| Reading::new(names[*s], at(*secs), *v))
            .collect();
        let frame = aggregate_windows(&readings, &WindowConfig::default());

        let buckets: BTreeSet<i64> = samples
            .iter()
            .map(|(_, secs, _)| secs.div_euclid(60))
            .collect();
        prop_assert_eq!(frame.len(), buckets.len());
        prop_assert!(frame.windows.windows(2).all(|p| p[0].start < p[1].start));
        for w in &frame.windows {
            prop_assert_eq!(w.features.len(), frame.layout.dim());
            prop_assert!(w.features.iter().all(|v| v.is_finite()));
        }
    }
}
