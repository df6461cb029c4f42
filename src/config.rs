//! Pipeline configuration. Every stage has its own section with defaults
//! matching the reference detector constants.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Window aggregation
    pub windows: WindowConfig,
    /// Reconstruction-error scorer
    pub behavior: BehaviorConfig,
    /// Correlation-drift scorer
    pub structure: StructureConfig,
    /// Severity grouping of events
    pub clustering: ClusterConfig,
    /// Operator note correlation
    pub notes: NotesConfig,
    /// Narrative diagnosis provider
    pub diagnosis: DiagnosisConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Bucket width in seconds
    pub width_secs: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Leading fraction of windows assumed normal and used for training
    pub train_fraction: f64,
    pub hidden_dim: usize,
    pub bottleneck_dim: usize,
    pub epochs: usize,
    pub learning_rate: f64,
    /// Seed for weight initialisation
    pub seed: u64,
    pub threshold: ThresholdPolicy,
}

/// Parameters of the dynamic behavior threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdPolicy {
    /// Multiplier on the training error std for the Gaussian base
    pub sigma: f64,
    /// Percentile of all errors used when training errors are noisy
    pub tail_percentile: f64,
    /// Percentile of all errors used when training errors are nearly constant
    pub quiet_percentile: f64,
    /// Training error std below this selects the quiet branch
    pub quiet_std: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureConfig {
    /// Number of preceding windows forming the baseline correlation
    pub window_size: usize,
    pub percentile: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub seed: u64,
    /// k-means++ restarts; the lowest-inertia run wins
    pub restarts: usize,
    pub max_iter: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesConfig {
    /// Notes within this many minutes of an event are attached to it
    pub margin_minutes: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Rules,
    Groq,
    Gemini,
    #[serde(rename = "openai")]
    OpenAi,
    Ollama,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosisConfig {
    pub provider: ProviderKind,
    /// Environment variable holding the provider API key
    pub api_key_env: Option<String>,
    /// Overrides the provider's default model
    pub model: Option<String>,
    /// Overrides the provider's default base URL
    pub endpoint: Option<String>,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { width_secs: 60 }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            train_fraction: 0.2,
            hidden_dim: 8,
            bottleneck_dim: 4,
            epochs: 500,
            learning_rate: 0.01,
            seed: 7,
            threshold: ThresholdPolicy::default(),
        }
    }
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            sigma: 3.0,
            tail_percentile: 98.0,
            quiet_percentile: 90.0,
            quiet_std: 1e-4,
        }
    }
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            window_size: 5,
            percentile: 95.0,
        }
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            restarts: 10,
            max_iter: 300,
        }
    }
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self { margin_minutes: 5 }
    }
}

impl Default for DiagnosisConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Rules,
            api_key_env: None,
            model: None,
            endpoint: None,
            max_tokens: 300,
            timeout_secs: 30,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl PipelineConfig {
    /// Load from a JSON file. A missing file yields the defaults; a file that
    /// exists but cannot be read or parsed is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: PipelineConfig =
            serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.windows.width_secs <= 0 {
            return Err(ConfigError::Invalid("windows.width_secs must be positive".into()));
        }
        let b = &self.behavior;
        if !(b.train_fraction > 0.0 && b.train_fraction <= 1.0) {
            return Err(ConfigError::Invalid(
                "behavior.train_fraction must be in (0, 1]".into(),
            ));
        }
        if b.hidden_dim == 0 || b.bottleneck_dim == 0 || b.epochs == 0 {
            return Err(ConfigError::Invalid(
                "behavior layer sizes and epochs must be non-zero".into(),
            ));
        }
        if !(b.learning_rate > 0.0 && b.learning_rate.is_finite()) {
            return Err(ConfigError::Invalid(
                "behavior.learning_rate must be positive".into(),
            ));
        }
        for (name, p) in [
            ("behavior.threshold.tail_percentile", b.threshold.tail_percentile),
            ("behavior.threshold.quiet_percentile", b.threshold.quiet_percentile),
            ("structure.percentile", self.structure.percentile),
        ] {
            if !(0.0..=100.0).contains(&p) {
                return Err(ConfigError::Invalid(format!("{name} must be in [0, 100]")));
            }
        }
        if self.structure.window_size < 2 {
            return Err(ConfigError::Invalid(
                "structure.window_size must be at least 2".into(),
            ));
        }
        if self.clustering.restarts == 0 || self.clustering.max_iter == 0 {
            return Err(ConfigError::Invalid(
                "clustering.restarts and clustering.max_iter must be non-zero".into(),
            ));
        }
        Ok(())
    }
}
