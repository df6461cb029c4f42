//! Window aggregation: irregular readings → fixed-width buckets of per-signal
//! summary features. Scores are attached in later stages through the `B`
//! (behavior) and `S` (structure) type parameters, so a frame that has not been
//! through a stage cannot be handed to a consumer expecting that stage's output.

mod aggregate;
mod summary;

pub use aggregate::aggregate_windows;
pub use summary::SignalSummary;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-signal statistic columns, in layout order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    Mean,
    Std,
    Last,
}

impl Statistic {
    pub const ALL: [Statistic; 3] = [Statistic::Mean, Statistic::Std, Statistic::Last];

    pub fn suffix(self) -> &'static str {
        match self {
            Statistic::Mean => "mean",
            Statistic::Std => "std",
            Statistic::Last => "last",
        }
    }
}

/// Column layout shared by every window of a frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureLayout {
    signals: Vec<String>,
}

impl FeatureLayout {
    pub fn new(signals: Vec<String>) -> Self {
        Self { signals }
    }

    pub fn signals(&self) -> &[String] {
        &self.signals
    }

    pub fn dim(&self) -> usize {
        self.signals.len() * Statistic::ALL.len()
    }

    pub fn index(&self, signal_idx: usize, stat: Statistic) -> usize {
        signal_idx * Statistic::ALL.len() + stat as usize
    }

    /// Column indices of the mean features, one per signal.
    pub fn mean_columns(&self) -> Vec<usize> {
        (0..self.signals.len())
            .map(|i| self.index(i, Statistic::Mean))
            .collect()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.signals
            .iter()
            .flat_map(|s| Statistic::ALL.iter().map(move |st| format!("{}_{}", s, st.suffix())))
            .collect()
    }
}

/// Marker for a stage that has not run yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Unscored;

/// A detector's output for one window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub score: f64,
    pub anomaly: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window<B = Unscored, S = Unscored> {
    /// Bucket start
    pub start: DateTime<Utc>,
    /// Values in `FeatureLayout` order
    pub features: Vec<f64>,
    pub behavior: B,
    pub structure: S,
}

impl<B, S> Window<B, S> {
    pub fn with_behavior<B2>(self, behavior: B2) -> Window<B2, S> {
        Window {
            start: self.start,
            features: self.features,
            behavior,
            structure: self.structure,
        }
    }

    pub fn with_structure<S2>(self, structure: S2) -> Window<B, S2> {
        Window {
            start: self.start,
            features: self.features,
            behavior: self.behavior,
            structure,
        }
    }
}

impl Window<Verdict, Verdict> {
    /// Either detector flagged this window.
    pub fn is_anomalous(&self) -> bool {
        self.behavior.anomaly || self.structure.anomaly
    }
}

/// Ordered window sequence, ascending by `start` with no duplicate buckets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowFrame<B = Unscored, S = Unscored> {
    pub layout: FeatureLayout,
    pub windows: Vec<Window<B, S>>,
}

impl<B, S> WindowFrame<B, S> {
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Attach one behavior value per window, in order.
    pub fn with_behavior<B2>(self, values: impl IntoIterator<Item = B2>) -> WindowFrame<B2, S> {
        WindowFrame {
            layout: self.layout,
            windows: self
                .windows
                .into_iter()
                .zip(values)
                .map(|(w, b)| w.with_behavior(b))
                .collect(),
        }
    }

    /// Attach one structure value per window, in order.
    pub fn with_structure<S2>(self, values: impl IntoIterator<Item = S2>) -> WindowFrame<B, S2> {
        WindowFrame {
            layout: self.layout,
            windows: self
                .windows
                .into_iter()
                .zip(values)
                .map(|(w, s)| w.with_structure(s))
                .collect(),
        }
    }
}
