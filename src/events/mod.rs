//! Anomalous events: maximal runs of flagged windows, grouped into two
//! severity tiers.

mod builder;
mod cluster;

pub use builder::build_events;
pub use cluster::{cluster_events, kmeans_1d, KMeans1d};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityTier {
    Warning,
    Critical,
}

impl SeverityTier {
    /// Cluster 1 is always the higher-severity group after relabeling.
    pub fn from_cluster(cluster: Option<u8>) -> Self {
        match cluster {
            Some(1) => SeverityTier::Critical,
            _ => SeverityTier::Warning,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SeverityTier::Warning => "WARNING",
            SeverityTier::Critical => "CRITICAL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// First anomalous window of the run
    pub start: DateTime<Utc>,
    /// Last anomalous window of the run
    pub end: DateTime<Utc>,
    /// Whole minutes between start and end, at least 1
    pub duration_minutes: i64,
    /// Sum of behavior scores over the run
    pub severity: f64,
    /// Number of windows in the run
    pub windows: usize,
    /// Assigned by clustering; `None` when fewer than two events exist
    pub cluster: Option<u8>,
}

impl Event {
    pub fn tier(&self) -> SeverityTier {
        SeverityTier::from_cluster(self.cluster)
    }
}
