//! Narrative diagnosis for detected events, behind the [`Diagnostician`]
//! capability. The pipeline never depends on a provider's wire format.

mod http;
mod rules;

pub use http::{ChatCompletionsProvider, GeminiProvider};
pub use rules::RuleBasedDiagnostician;

use crate::config::{DiagnosisConfig, ProviderKind};
use crate::events::SeverityTier;
use crate::notes::{EventNotes, OperatorNote};
use std::fmt::Write as _;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiagnosisError {
    #[error("API key not set: export {env}")]
    MissingApiKey { env: String },

    #[error("http client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{provider} returned no text")]
    EmptyResponse { provider: String },
}

/// What a provider sees about one event.
#[derive(Debug, Clone)]
pub struct DiagnosisContext<'a> {
    pub tier: SeverityTier,
    pub severity: f64,
    pub duration_minutes: i64,
    pub notes: Vec<&'a OperatorNote>,
}

impl<'a> DiagnosisContext<'a> {
    pub fn from_event_notes(item: &EventNotes<'a>) -> Self {
        Self {
            tier: item.event.tier(),
            severity: item.event.severity,
            duration_minutes: item.event.duration_minutes,
            notes: item.notes.clone(),
        }
    }
}

pub trait Diagnostician {
    fn name(&self) -> &str;
    fn diagnose(&self, ctx: &DiagnosisContext<'_>) -> Result<String, DiagnosisError>;
}

pub const SYSTEM_PROMPT: &str =
    "You are a concise technical diagnostic assistant for industrial anomaly detection systems.";

pub fn build_prompt(ctx: &DiagnosisContext<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Analyze these system anomaly data points:");
    let _ = writeln!(out, "- CLASSIFICATION: {}", ctx.tier.as_str());
    let _ = writeln!(out, "- RECONSTRUCTION ERROR: {:.4}", ctx.severity);
    let _ = writeln!(out, "- DURATION: {} min", ctx.duration_minutes);
    let _ = writeln!(out);
    let _ = writeln!(out, "OPERATOR LOGS:");
    if ctx.notes.is_empty() {
        let _ = writeln!(out, "No operator logs available.");
    } else {
        for note in &ctx.notes {
            let _ = writeln!(
                out,
                "- {}: {}",
                note.timestamp.format("%Y-%m-%d %H:%M:%S"),
                note.text
            );
        }
    }
    let _ = writeln!(out);
    let _ = write!(
        out,
        "TASK: Provide a brief Root Cause, Reasoning, and Recommended Actions. \
         Keep it under 150 words."
    );
    out
}

fn api_key(env: &str) -> Result<String, DiagnosisError> {
    std::env::var(env)
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| DiagnosisError::MissingApiKey { env: env.to_string() })
}

/// Build the configured provider. Remote providers read their key from the
/// environment variable named in config (or the provider's conventional one).
pub fn from_config(config: &DiagnosisConfig) -> Result<Box<dyn Diagnostician>, DiagnosisError> {
    let key_env = |default: &str| config.api_key_env.clone().unwrap_or_else(|| default.to_string());
    let provider: Box<dyn Diagnostician> = match config.provider {
        ProviderKind::Rules => Box::new(RuleBasedDiagnostician),
        ProviderKind::Groq => Box::new(ChatCompletionsProvider::groq(
            config,
            api_key(&key_env("GROQ_API_KEY"))?,
        )?),
        ProviderKind::OpenAi => Box::new(ChatCompletionsProvider::openai(
            config,
            api_key(&key_env("OPENAI_API_KEY"))?,
        )?),
        ProviderKind::Ollama => Box::new(ChatCompletionsProvider::ollama(config)?),
        ProviderKind::Gemini => Box::new(GeminiProvider::new(
            config,
            api_key(&key_env("GEMINI_API_KEY"))?,
        )?),
    };
    Ok(provider)
}
