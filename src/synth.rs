//! Deterministic synthetic dataset: four asynchronous sensors with a step
//! fault at minutes 15–20 and a ramp drift at minutes 40–45.

use crate::ingest::Reading;
use crate::notes::OperatorNote;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthConfig {
    pub start: DateTime<Utc>,
    pub minutes: u32,
    pub seed: u64,
    /// Sample each signal at its own period instead of once per minute
    pub multi_rate: bool,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            start: Utc
                .with_ymd_and_hms(2024, 1, 1, 10, 0, 0)
                .single()
                .unwrap_or_default(),
            minutes: 60,
            seed: 42,
            multi_rate: false,
        }
    }
}

struct SignalSpec {
    name: &'static str,
    base: f64,
    noise: f64,
    /// Added during the step fault
    step: f64,
    /// Added per minute into the drift
    ramp: f64,
    period_secs: i64,
}

const SIGNALS: &[SignalSpec] = &[
    SignalSpec {
        name: "motor_temp",
        base: 45.0,
        noise: 1.0,
        step: 40.0,
        ramp: 5.0,
        period_secs: 60,
    },
    SignalSpec {
        name: "vibration",
        base: 0.5,
        noise: 0.05,
        step: 2.5,
        ramp: 0.2,
        period_secs: 20,
    },
    SignalSpec {
        name: "pressure",
        base: 30.0,
        noise: 0.5,
        step: 30.0,
        ramp: 0.0,
        period_secs: 30,
    },
    SignalSpec {
        name: "rpm",
        base: 1500.0,
        noise: 10.0,
        step: -800.0,
        ramp: 0.0,
        period_secs: 15,
    },
];

pub const STEP_FAULT_MINUTES: std::ops::RangeInclusive<i64> = 15..=20;
pub const DRIFT_MINUTES: std::ops::RangeInclusive<i64> = 40..=45;

#[derive(Debug, Clone)]
pub struct SyntheticDataset {
    pub readings: Vec<Reading>,
    pub notes: Vec<OperatorNote>,
}

/// Standard normal sample (Box–Muller).
fn standard_normal(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

fn injected(spec: &SignalSpec, minute: i64) -> f64 {
    if STEP_FAULT_MINUTES.contains(&minute) {
        spec.step
    } else if DRIFT_MINUTES.contains(&minute) {
        (minute - DRIFT_MINUTES.start()) as f64 * spec.ramp
    } else {
        0.0
    }
}

pub fn generate(config: &SynthConfig) -> SyntheticDataset {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut readings = Vec::new();
    let total_secs = config.minutes as i64 * 60;

    for minute in 0..config.minutes as i64 {
        for spec in SIGNALS {
            let period = if config.multi_rate { spec.period_secs } else { 60 };
            let mut offset = 0;
            while offset < 60 {
                let secs = minute * 60 + offset;
                if secs >= total_secs {
                    break;
                }
                let value =
                    spec.base + spec.noise * standard_normal(&mut rng) + injected(spec, minute);
                readings.push(Reading::new(
                    spec.name,
                    config.start + Duration::seconds(secs),
                    value,
                ));
                offset += period;
            }
        }
    }

    let note = |minute: i64, second: i64, text: &str| OperatorNote {
        timestamp: config.start + Duration::minutes(minute) + Duration::seconds(second),
        text: text.to_string(),
    };
    let notes = vec![
        note(5, 0, "System health check passed. All parameters nominal."),
        note(15, 30, "Acoustic sensor picked up unusual grinding noise."),
        note(17, 0, "Thermal alerts triggered on motor housing."),
        note(21, 0, "Manual override engaged to stabilize RPM."),
        note(42, 0, "Operator noted slight increase in housing temperature."),
        note(50, 0, "Routine maintenance completed after drift observation."),
    ];

    SyntheticDataset { readings, notes }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_samples_each_signal_once_per_minute() {
        let data = generate(&SynthConfig::default());
        assert_eq!(data.readings.len(), 60 * SIGNALS.len());
        assert_eq!(data.notes.len(), 6);
    }

    #[test]
    fn multi_rate_uses_per_signal_periods() {
        let data = generate(&SynthConfig {
            multi_rate: true,
            ..SynthConfig::default()
        });
        let per_minute: usize = SIGNALS.iter().map(|s| (60 / s.period_secs) as usize).sum();
        assert_eq!(data.readings.len(), 60 * per_minute);
        let rpm = data.readings.iter().filter(|r| r.signal_id == "rpm").count();
        assert_eq!(rpm, 60 * 4);
    }
}
