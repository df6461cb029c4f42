//! Crate-level error, one variant per stage that can fail.

use crate::config::ConfigError;
use crate::diagnosis::DiagnosisError;
use crate::ingest::IngestError;
use crate::model::ModelError;
use crate::report::ReportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Diagnosis(#[from] DiagnosisError),

    #[error(transparent)]
    Report(#[from] ReportError),
}
