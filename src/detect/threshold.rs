//! Dynamic behavior threshold: a Gaussian base from the training errors,
//! raised to a percentile of all errors to cope with heavy tails.

use super::stats::{mean, percentile, std_dev};
use crate::config::ThresholdPolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdBranch {
    /// Training errors nearly constant; the lower `quiet_percentile` applies
    Quiet,
    /// Regular case; `tail_percentile` applies
    Noisy,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdDecision {
    pub train_mean: f64,
    pub train_std: f64,
    /// mean + sigma * std over training errors
    pub base: f64,
    /// `tail_percentile` of all errors
    pub tail: f64,
    pub branch: ThresholdBranch,
    pub threshold: f64,
}

impl ThresholdDecision {
    pub fn is_anomalous(&self, score: f64) -> bool {
        score > self.threshold
    }
}

pub fn dynamic_threshold(
    train_errors: &[f64],
    all_errors: &[f64],
    policy: &ThresholdPolicy,
) -> ThresholdDecision {
    let train_mean = mean(train_errors);
    let train_std = std_dev(train_errors);
    let base = train_mean + policy.sigma * train_std;
    let tail = percentile(all_errors, policy.tail_percentile).unwrap_or(base);

    let (branch, threshold) = if train_std < policy.quiet_std {
        let quiet = percentile(all_errors, policy.quiet_percentile).unwrap_or(base);
        (ThresholdBranch::Quiet, base.max(quiet))
    } else {
        (ThresholdBranch::Noisy, base.max(tail))
    };

    ThresholdDecision {
        train_mean,
        train_std,
        base,
        tail,
        branch,
        threshold,
    }
}
