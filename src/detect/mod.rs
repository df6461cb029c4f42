//! Window scoring: reconstruction error (behavior) and correlation drift
//! (structure), each with a threshold derived from the run's own scores.

mod behavior;
pub mod stats;
mod structure;
mod threshold;

pub use behavior::{score_behavior, BehaviorOutcome, BehaviorScorer};
pub use structure::{score_structure, structure_scores, StructureOutcome, StructureScorer};
pub use threshold::{dynamic_threshold, ThresholdBranch, ThresholdDecision};
