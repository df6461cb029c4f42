//! Stage orchestration: readings → windows → behavior → structure → events → tiers.
//! Each stage runs to completion before the next; nothing is shared between runs.

use crate::config::{ConfigError, PipelineConfig};
use crate::detect::{BehaviorOutcome, BehaviorScorer, StructureOutcome, StructureScorer};
use crate::diagnosis::{DiagnosisContext, Diagnostician};
use crate::events::{build_events, cluster_events, Event, SeverityTier};
use crate::features::{aggregate_windows, Verdict, WindowFrame};
use crate::ingest::Reading;
use crate::notes::{correlate, OperatorNote};
use crate::report::EventDiagnosis;
use crate::PipelineError;
use tracing::{info, info_span, warn};

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub frame: WindowFrame<Verdict, Verdict>,
    pub events: Vec<Event>,
    pub behavior: BehaviorOutcome,
    pub structure: StructureOutcome,
}

impl PipelineOutput {
    pub fn high_severity_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| e.tier() == SeverityTier::Critical)
            .count()
    }
}

pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Rejects configs that fail [`PipelineConfig::validate`].
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn run(&self, readings: &[Reading]) -> Result<PipelineOutput, PipelineError> {
        let span = info_span!("pipeline", readings = readings.len());
        let _guard = span.enter();

        let frame = aggregate_windows(readings, &self.config.windows);
        info!(
            windows = frame.len(),
            signals = frame.layout.signals().len(),
            "windows aggregated"
        );

        let (frame, behavior) = BehaviorScorer::new(self.config.behavior.clone()).apply(frame)?;
        let (frame, structure) = StructureScorer::new(self.config.structure.clone()).apply(frame);

        let events = cluster_events(build_events(&frame), &self.config.clustering);
        let output = PipelineOutput {
            frame,
            events,
            behavior,
            structure,
        };
        info!(
            events = output.events.len(),
            high_severity = output.high_severity_count(),
            "pipeline complete"
        );
        Ok(output)
    }

    /// Ask `diagnostician` about every event. A failed call is recorded on that
    /// event and does not stop the others.
    pub fn diagnose(
        &self,
        output: &PipelineOutput,
        notes: &[OperatorNote],
        diagnostician: &dyn Diagnostician,
    ) -> Vec<EventDiagnosis> {
        correlate(&output.events, notes, self.config.notes.margin_minutes)
            .iter()
            .enumerate()
            .map(|(event_index, item)| {
                let ctx = DiagnosisContext::from_event_notes(item);
                match diagnostician.diagnose(&ctx) {
                    Ok(text) => EventDiagnosis {
                        event_index,
                        provider: diagnostician.name().to_string(),
                        text: Some(text),
                        error: None,
                    },
                    Err(e) => {
                        warn!(
                            event_index,
                            provider = diagnostician.name(),
                            error = %e,
                            "diagnosis failed"
                        );
                        EventDiagnosis {
                            event_index,
                            provider: diagnostician.name().to_string(),
                            text: None,
                            error: Some(e.to_string()),
                        }
                    }
                }
            })
            .collect()
    }
}
