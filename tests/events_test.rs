//! Event building and severity clustering.

use chrono::{DateTime, Duration, TimeZone, Utc};
use sigdrift::config::ClusterConfig;
use sigdrift::events::kmeans_1d;
use sigdrift::features::FeatureLayout;
use sigdrift::{build_events, cluster_events, Event, SeverityTier, Verdict, Window, WindowFrame};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
}

/// `flags[i]` = (behavior anomaly, structure anomaly); behavior score is `i + 1`.
fn scored(flags: &[(bool, bool)]) -> WindowFrame<Verdict, Verdict> {
    WindowFrame {
        layout: FeatureLayout::new(vec!["s".into()]),
        windows: flags
            .iter()
            .enumerate()
            .map(|(i, (b, s))| Window {
                start: t0() + Duration::minutes(i as i64),
                features: vec![0.0; 3],
                behavior: Verdict {
                    score: (i + 1) as f64,
                    anomaly: *b,
                },
                structure: Verdict {
                    score: 0.0,
                    anomaly: *s,
                },
            })
            .collect(),
    }
}

fn event(severity: f64, minute: i64) -> Event {
    let start = t0() + Duration::minutes(minute);
    Event {
        start,
        end: start,
        duration_minutes: 1,
        severity,
        windows: 1,
        cluster: None,
    }
}

#[test]
fn run_of_behavior_anomalies_is_one_event() {
    let flags: Vec<(bool, bool)> = (0..60).map(|i| ((15..=20).contains(&i), false)).collect();
    let events = build_events(&scored(&flags));
    assert_eq!(events.len(), 1);
    let e = &events[0];
    assert_eq!(e.start, t0() + Duration::minutes(15));
    assert_eq!(e.end, t0() + Duration::minutes(20));
    assert_eq!(e.duration_minutes, 5);
    assert_eq!(e.windows, 6);
    assert_eq!(e.severity, (16..=21).map(|v| v as f64).sum::<f64>());
    assert_eq!(e.cluster, None);
}

#[test]
fn isolated_window_lasts_one_minute() {
    let events = build_events(&scored(&[(false, false), (true, false), (false, false)]));
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].start, events[0].end);
    assert_eq!(events[0].duration_minutes, 1);
}

#[test]
fn adjacent_anomalies_merge_across_detectors() {
    let events = build_events(&scored(&[(true, false), (false, true)]));
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].windows, 2);
    // structure-only windows still add their behavior score
    assert_eq!(events[0].severity, 3.0);
}

#[test]
fn normal_window_splits_events() {
    let events = build_events(&scored(&[
        (true, false),
        (false, false),
        (false, true),
        (false, true),
    ]));
    assert_eq!(events.len(), 2);
    assert!(events[0].end < events[1].start);
    assert_eq!(events[1].start, t0() + Duration::minutes(2));
    assert_eq!(events[1].end, t0() + Duration::minutes(3));
}

#[test]
fn event_open_at_end_is_closed() {
    let events = build_events(&scored(&[(false, false), (true, true), (true, false)]));
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].end, t0() + Duration::minutes(2));
}

#[test]
fn no_windows_no_events() {
    assert!(build_events(&scored(&[])).is_empty());
    assert!(build_events(&scored(&[(false, false); 5])).is_empty());
}

#[test]
fn fewer_than_two_events_are_unchanged() {
    let config = ClusterConfig::default();
    assert!(cluster_events(Vec::new(), &config).is_empty());

    let single = vec![event(3.0, 0)];
    let out = cluster_events(single.clone(), &config);
    assert_eq!(out, single);
    assert_eq!(out[0].cluster, None);
    assert_eq!(out[0].tier(), SeverityTier::Warning);
}

#[test]
fn higher_severity_group_is_label_one() {
    let severities = [1.0, 12.0, 1.2, 10.0, 0.9, 11.0];
    let events: Vec<Event> = severities
        .iter()
        .enumerate()
        .map(|(i, s)| event(*s, i as i64 * 10))
        .collect();
    let out = cluster_events(events, &ClusterConfig::default());
    let labels: Vec<Option<u8>> = out.iter().map(|e| e.cluster).collect();
    assert_eq!(
        labels,
        vec![Some(0), Some(1), Some(0), Some(1), Some(0), Some(1)]
    );
    assert_eq!(out[1].tier(), SeverityTier::Critical);
    assert_eq!(out[0].tier(), SeverityTier::Warning);
}

#[test]
fn labels_do_not_depend_on_input_order() {
    let config = ClusterConfig::default();
    let forward = kmeans_1d(&[0.5, 0.6, 9.0, 9.5], &config).unwrap();
    let reverse = kmeans_1d(&[9.5, 9.0, 0.6, 0.5], &config).unwrap();
    assert_eq!(forward.labels, vec![0, 0, 1, 1]);
    assert_eq!(reverse.labels, vec![1, 1, 0, 0]);
    assert!(forward.centroids[0] < forward.centroids[1]);
}

#[test]
fn identical_severities_share_label_zero() {
    let events = vec![event(2.0, 0), event(2.0, 5), event(2.0, 9)];
    let out = cluster_events(events, &ClusterConfig::default());
    assert!(out.iter().all(|e| e.cluster == Some(0)));
}

#[test]
fn clustering_is_reproducible() {
    let events: Vec<Event> = [3.0, 8.0, 2.5, 7.5, 5.0]
        .iter()
        .enumerate()
        .map(|(i, s)| event(*s, i as i64))
        .collect();
    let config = ClusterConfig::default();
    assert_eq!(
        cluster_events(events.clone(), &config),
        cluster_events(events, &config)
    );
}
