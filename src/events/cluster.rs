//! Two-tier severity grouping: 1-D k-means (k = 2) with k-means++ seeding.

use super::Event;
use crate::config::ClusterConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct KMeans1d {
    pub centroids: [f64; 2],
    pub labels: Vec<u8>,
    pub inertia: f64,
}

fn nearest(value: f64, centroids: &[f64; 2]) -> u8 {
    if (value - centroids[1]).abs() < (value - centroids[0]).abs() {
        1
    } else {
        0
    }
}

fn seed_centroids(values: &[f64], rng: &mut StdRng) -> [f64; 2] {
    let first = values[rng.gen_range(0..values.len())];
    let weights: Vec<f64> = values.iter().map(|v| (v - first).powi(2)).collect();
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return [first, first];
    }
    let mut target = rng.gen::<f64>() * total;
    for (v, w) in values.iter().zip(&weights) {
        if target < *w {
            return [first, *v];
        }
        target -= w;
    }
    // Rounding left the target past the last weight.
    let farthest = values
        .iter()
        .zip(&weights)
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(v, _)| *v)
        .unwrap_or(first);
    [first, farthest]
}

fn lloyd(values: &[f64], mut centroids: [f64; 2], max_iter: usize) -> KMeans1d {
    let mut labels: Vec<u8> = values.iter().map(|v| nearest(*v, &centroids)).collect();
    for _ in 0..max_iter {
        for (k, centroid) in centroids.iter_mut().enumerate() {
            let members: Vec<f64> = values
                .iter()
                .zip(&labels)
                .filter(|(_, l)| **l as usize == k)
                .map(|(v, _)| *v)
                .collect();
            if !members.is_empty() {
                *centroid = members.iter().sum::<f64>() / members.len() as f64;
            }
        }
        let next: Vec<u8> = values.iter().map(|v| nearest(*v, &centroids)).collect();
        if next == labels {
            break;
        }
        labels = next;
    }
    let inertia = values
        .iter()
        .zip(&labels)
        .map(|(v, l)| (v - centroids[*l as usize]).powi(2))
        .sum();
    KMeans1d {
        centroids,
        labels,
        inertia,
    }
}

/// Best of `restarts` seeded runs, relabeled so label 1 has the higher mean.
/// `None` for fewer than two values.
pub fn kmeans_1d(values: &[f64], config: &ClusterConfig) -> Option<KMeans1d> {
    if values.len() < 2 {
        return None;
    }
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut best: Option<KMeans1d> = None;
    for _ in 0..config.restarts.max(1) {
        let run = lloyd(values, seed_centroids(values, &mut rng), config.max_iter);
        if best.as_ref().map_or(true, |b| run.inertia < b.inertia) {
            best = Some(run);
        }
    }
    best.map(relabel_by_mean)
}

fn relabel_by_mean(mut result: KMeans1d) -> KMeans1d {
    let both_used = result.labels.contains(&0) && result.labels.contains(&1);
    if !both_used {
        result.labels.iter_mut().for_each(|l| *l = 0);
        let c = result.centroids[0].min(result.centroids[1]);
        result.centroids = [c, c];
        return result;
    }
    if result.centroids[0] > result.centroids[1] {
        result.centroids.swap(0, 1);
        result.labels.iter_mut().for_each(|l| *l = 1 - *l);
    }
    result
}

/// Label every event 0 (lower severity) or 1 (higher severity). Fewer than two
/// events are returned unchanged with `cluster` left as `None`.
pub fn cluster_events(mut events: Vec<Event>, config: &ClusterConfig) -> Vec<Event> {
    let severities: Vec<f64> = events.iter().map(|e| e.severity).collect();
    let Some(result) = kmeans_1d(&severities, config) else {
        return events;
    };
    for (event, label) in events.iter_mut().zip(&result.labels) {
        event.cluster = Some(*label);
    }
    debug!(
        events = events.len(),
        low_centroid = result.centroids[0],
        high_centroid = result.centroids[1],
        "clustered events"
    );
    events
}
