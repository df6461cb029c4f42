use crate::detect::ThresholdDecision;
use crate::notes::{correlate, IssueKind, OperatorNote};
use crate::pipeline::PipelineOutput;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Health drops 15 points per event, floored at 0.
pub fn health_score(event_count: usize) -> u32 {
    100u32.saturating_sub((event_count.min(u32::MAX as usize) as u32).saturating_mul(15))
}

/// Hex SHA-256, used to tie a summary to the exact input file.
pub fn digest_bytes(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_digest: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub window_count: usize,
    pub signal_count: usize,
    pub train_len: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behavior_threshold: Option<ThresholdDecision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure_threshold: Option<f64>,
    pub event_count: usize,
    pub high_severity_count: usize,
    pub health_score: u32,
}

impl RunSummary {
    pub fn from_output(output: &PipelineOutput, input_digest: Option<String>) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            input_digest,
            generated_at: Utc::now(),
            window_count: output.frame.len(),
            signal_count: output.frame.layout.signals().len(),
            train_len: output.behavior.train_len,
            behavior_threshold: output.behavior.decision,
            structure_threshold: output.structure.threshold,
            event_count: output.events.len(),
            high_severity_count: output.high_severity_count(),
            health_score: health_score(output.events.len()),
        }
    }
}

/// Provider output for one event; exactly one of `text` / `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDiagnosis {
    pub event_index: usize,
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedNote {
    pub timestamp: DateTime<Utc>,
    pub text: String,
    pub issue: IssueKind,
}

/// Operator notes near one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventNoteLink {
    pub event_index: usize,
    pub notes: Vec<LinkedNote>,
}

pub fn note_links(
    output: &PipelineOutput,
    notes: &[OperatorNote],
    margin_minutes: i64,
) -> Vec<EventNoteLink> {
    correlate(&output.events, notes, margin_minutes)
        .into_iter()
        .enumerate()
        .map(|(event_index, item)| EventNoteLink {
            event_index,
            notes: item
                .notes
                .into_iter()
                .map(|n| LinkedNote {
                    timestamp: n.timestamp,
                    text: n.text.clone(),
                    issue: n.issue(),
                })
                .collect(),
        })
        .collect()
}
