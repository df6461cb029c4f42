//! Operator notes: keyword classification and alignment with detected events.

mod correlate;

pub use correlate::{correlate, EventNotes};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorNote {
    pub timestamp: DateTime<Utc>,
    pub text: String,
}

impl OperatorNote {
    pub fn issue(&self) -> IssueKind {
        IssueKind::classify(&self.text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    PressureInstability,
    ThermalResponse,
    MechanicalAnomaly,
    RecoveryAction,
    Unknown,
}

const RULES: &[(IssueKind, &[&str])] = &[
    (IssueKind::PressureInstability, &["pressure", "exceeded"]),
    (IssueKind::ThermalResponse, &["temperature", "thermal"]),
    (IssueKind::MechanicalAnomaly, &["vibration", "rpm", "dropped"]),
    (IssueKind::RecoveryAction, &["cooling", "stabilized", "normal"]),
];

impl IssueKind {
    /// Case-insensitive keyword match; the first matching rule wins.
    pub fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();
        RULES
            .iter()
            .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
            .map(|(kind, _)| *kind)
            .unwrap_or(IssueKind::Unknown)
    }

    pub fn label(self) -> &'static str {
        match self {
            IssueKind::PressureInstability => "pressure instability",
            IssueKind::ThermalResponse => "thermal response issue",
            IssueKind::MechanicalAnomaly => "mechanical anomaly",
            IssueKind::RecoveryAction => "recovery action",
            IssueKind::Unknown => "unknown",
        }
    }
}
