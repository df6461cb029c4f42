//! In-bucket statistics for one signal.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalSummary {
    pub mean: f64,
    /// Sample standard deviation; 0 with fewer than two samples
    pub std: f64,
    pub last: f64,
}

impl SignalSummary {
    /// `values` must be in time order; `last` is the final element.
    pub fn from_samples(values: &[f64]) -> Option<Self> {
        let last = *values.last()?;
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let std = if values.len() < 2 {
            0.0
        } else {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1.0)).sqrt()
        };
        Some(Self { mean, std, last })
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.mean, self.std, self.last]
    }
}
