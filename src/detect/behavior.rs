//! Behavioral scorer: fit scaler and encoder–decoder on the leading
//! `train_fraction` of windows, score every window by reconstruction error.

use super::threshold::{dynamic_threshold, ThresholdDecision};
use crate::config::BehaviorConfig;
use crate::features::{Unscored, Verdict, WindowFrame};
use crate::model::{Autoencoder, ModelError, StandardScaler, TrainingSummary};
use ndarray::{s, Array2};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorOutcome {
    /// One reconstruction error per window, in window order
    pub scores: Vec<f64>,
    pub train_len: usize,
    /// `None` only for an empty frame
    pub decision: Option<ThresholdDecision>,
    pub training: Option<TrainingSummary>,
}

impl BehaviorOutcome {
    pub fn verdicts(&self) -> Vec<Verdict> {
        self.scores
            .iter()
            .map(|&score| Verdict {
                score,
                anomaly: self.decision.map(|d| d.is_anomalous(score)).unwrap_or(false),
            })
            .collect()
    }
}

pub struct BehaviorScorer {
    config: BehaviorConfig,
}

impl BehaviorScorer {
    pub fn new(config: BehaviorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BehaviorConfig {
        &self.config
    }

    /// Number of leading windows used for training out of `windows`.
    pub fn train_len(&self, windows: usize) -> usize {
        (self.config.train_fraction * windows as f64).floor() as usize
    }

    fn check_config(&self) -> Result<(), ModelError> {
        let c = &self.config;
        if !(c.train_fraction > 0.0 && c.train_fraction <= 1.0) {
            return Err(ModelError::InvalidParameter(format!(
                "train_fraction must be in (0, 1], got {}",
                c.train_fraction
            )));
        }
        if c.hidden_dim == 0 || c.bottleneck_dim == 0 {
            return Err(ModelError::InvalidParameter(format!(
                "layer sizes must be non-zero, got {}/{}",
                c.hidden_dim, c.bottleneck_dim
            )));
        }
        Ok(())
    }

    pub fn evaluate<B, S>(&self, frame: &WindowFrame<B, S>) -> Result<BehaviorOutcome, ModelError> {
        self.check_config()?;
        let n = frame.len();
        if n == 0 {
            return Ok(BehaviorOutcome {
                scores: Vec::new(),
                train_len: 0,
                decision: None,
                training: None,
            });
        }
        let dim = frame.layout.dim();
        if dim == 0 {
            return Err(ModelError::NoFeatures { windows: n });
        }
        let train_len = self.train_len(n);
        if train_len == 0 {
            return Err(ModelError::EmptyTrainingSet {
                windows: n,
                fraction: self.config.train_fraction,
            });
        }

        let raw = Array2::from_shape_fn((n, dim), |(r, c)| {
            frame.windows[r].features.get(c).copied().unwrap_or(0.0)
        });
        let train_raw = raw.slice(s![..train_len, ..]);
        let scaler = StandardScaler::fit(train_raw).ok_or(ModelError::EmptyTrainingSet {
            windows: n,
            fraction: self.config.train_fraction,
        })?;
        let scaled = scaler.transform(raw.view())?;

        let mut model = Autoencoder::new(
            dim,
            self.config.hidden_dim,
            self.config.bottleneck_dim,
            self.config.seed,
        )?;
        let training = model.fit(
            scaled.slice(s![..train_len, ..]),
            self.config.epochs,
            self.config.learning_rate,
        )?;
        debug!(
            epochs = training.epochs,
            initial_loss = training.initial_loss,
            final_loss = training.final_loss,
            "behavior model trained"
        );

        let scores = model.reconstruction_errors(scaled.view())?;
        let train_errors = &scores[..train_len];
        let decision = dynamic_threshold(train_errors, &scores, &self.config.threshold);
        let max_train_error = train_errors.iter().copied().fold(0.0, f64::max);

        info!(
            split = train_len,
            max_train_error,
            base = decision.base,
            tail = decision.tail,
            branch = ?decision.branch,
            threshold = decision.threshold,
            "behavior threshold"
        );

        Ok(BehaviorOutcome {
            scores,
            train_len,
            decision: Some(decision),
            training: Some(training),
        })
    }

    pub fn apply<S>(
        &self,
        frame: WindowFrame<Unscored, S>,
    ) -> Result<(WindowFrame<Verdict, S>, BehaviorOutcome), ModelError> {
        let outcome = self.evaluate(&frame)?;
        let frame = frame.with_behavior(outcome.verdicts());
        Ok((frame, outcome))
    }
}

/// Attach behavior scores and flags to every window.
pub fn score_behavior<S>(
    frame: WindowFrame<Unscored, S>,
    config: &BehaviorConfig,
) -> Result<WindowFrame<Verdict, S>, ModelError> {
    BehaviorScorer::new(config.clone())
        .apply(frame)
        .map(|(frame, _)| frame)
}
