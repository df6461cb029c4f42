//! sigdrift — batch anomaly detection over asynchronous multi-sensor readings.
//!
//! Modular structure:
//! - [`ingest`] — Readings and operator notes from CSV
//! - [`features`] — Fixed-width window aggregation with gap filling
//! - [`model`] — Standardizing scaler and encoder–decoder
//! - [`detect`] — Behavioral and structural window scoring, dynamic thresholds
//! - [`events`] — Event building and two-tier severity clustering
//! - [`notes`] — Operator note classification and event correlation
//! - [`diagnosis`] — Pluggable narrative diagnosis providers
//! - [`report`] — Run summary and output tables
//! - [`logging`] — Structured logging

pub mod config;
pub mod detect;
pub mod diagnosis;
pub mod error;
pub mod events;
pub mod features;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod notes;
pub mod pipeline;
pub mod report;
pub mod synth;

pub use config::PipelineConfig;
pub use detect::{dynamic_threshold, score_behavior, score_structure};
pub use error::PipelineError;
pub use events::{build_events, cluster_events, Event, SeverityTier};
pub use features::{aggregate_windows, Unscored, Verdict, Window, WindowFrame};
pub use ingest::Reading;
pub use logging::StructuredLogger;
pub use pipeline::{Pipeline, PipelineOutput};
