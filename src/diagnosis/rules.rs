//! Deterministic, offline diagnosis text.

use super::{DiagnosisContext, DiagnosisError, Diagnostician};

pub struct RuleBasedDiagnostician;

impl Diagnostician for RuleBasedDiagnostician {
    fn name(&self) -> &str {
        "rules"
    }

    fn diagnose(&self, ctx: &DiagnosisContext<'_>) -> Result<String, DiagnosisError> {
        let mut out = format!(
            "Anomaly type: {} behavioral drift. Reconstruction score {:.4} over {} minutes. ",
            ctx.tier.as_str(),
            ctx.severity,
            ctx.duration_minutes
        );
        if ctx.notes.is_empty() {
            out.push_str(
                "No matching operator logs found; this suggests a silent failure or an \
                 internal relationship drift that was not visible to operators.",
            );
        } else {
            let summary: Vec<&str> = ctx.notes.iter().map(|n| n.text.as_str()).collect();
            out.push_str(&format!(
                "Correlated operator logs ('{}') suggest an external intervention or a known \
                 subsystem failure triggered this event.",
                summary.join(" ")
            ));
        }
        Ok(out)
    }
}
