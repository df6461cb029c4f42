//! Structural scorer: how far the pairwise correlation of signal means over
//! the last two windows departs from the preceding `window_size` windows.

use super::stats::{correlation_matrix, mean_abs_diff, percentile};
use crate::config::StructureConfig;
use crate::features::{Unscored, Verdict, WindowFrame};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureOutcome {
    pub scores: Vec<f64>,
    /// `None` only for an empty frame
    pub threshold: Option<f64>,
}

impl StructureOutcome {
    pub fn verdicts(&self) -> Vec<Verdict> {
        self.scores
            .iter()
            .map(|&score| Verdict {
                score,
                anomaly: self.threshold.map(|t| score > t).unwrap_or(false),
            })
            .collect()
    }
}

fn mean_columns<B, S>(frame: &WindowFrame<B, S>, rows: std::ops::Range<usize>) -> Vec<Vec<f64>> {
    frame
        .layout
        .mean_columns()
        .into_iter()
        .map(|c| {
            frame.windows[rows.clone()]
                .iter()
                .map(|w| w.features.get(c).copied().unwrap_or(0.0))
                .collect()
        })
        .collect()
}

/// Drift score per window. Windows before `window_size` score 0.
pub fn structure_scores<B, S>(frame: &WindowFrame<B, S>, window_size: usize) -> Vec<f64> {
    (0..frame.len())
        .map(|i| {
            if i < window_size || i == 0 {
                return 0.0;
            }
            let baseline = correlation_matrix(&mean_columns(frame, i - window_size..i));
            let current = correlation_matrix(&mean_columns(frame, i - 1..i + 1));
            mean_abs_diff(&current, &baseline)
        })
        .collect()
}

pub struct StructureScorer {
    config: StructureConfig,
}

impl StructureScorer {
    pub fn new(config: StructureConfig) -> Self {
        Self { config }
    }

    pub fn evaluate<B, S>(&self, frame: &WindowFrame<B, S>) -> StructureOutcome {
        let scores = structure_scores(frame, self.config.window_size);
        let threshold = percentile(&scores, self.config.percentile);
        if let Some(t) = threshold {
            let flagged = scores.iter().filter(|s| **s > t).count();
            info!(
                window_size = self.config.window_size,
                threshold = t,
                flagged,
                "structure threshold"
            );
        }
        StructureOutcome { scores, threshold }
    }

    pub fn apply<B>(
        &self,
        frame: WindowFrame<B, Unscored>,
    ) -> (WindowFrame<B, Verdict>, StructureOutcome) {
        let outcome = self.evaluate(&frame);
        let frame = frame.with_structure(outcome.verdicts());
        (frame, outcome)
    }
}

/// Attach structure scores and flags to every window.
pub fn score_structure<B>(
    frame: WindowFrame<B, Unscored>,
    config: &StructureConfig,
) -> WindowFrame<B, Verdict> {
    StructureScorer::new(config.clone()).apply(frame).0
}
