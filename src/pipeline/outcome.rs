//! Pipeline outcome accumulation
//!
//! The pipeline's sole artifact: an ordered record of what happened to each
//! step, from which the caller derives the overall verdict and the report.

use crate::pipeline::steps::StepName;

// =============================================================================
// Step Outcome
// =============================================================================

/// What happened to a single pipeline step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The resource was created by this run
    Created,
    /// The pre-flight existence check found the resource; no mutation made
    SkippedAlreadyExists,
    /// The step failed and halted the pipeline
    FailedFatal(String),
    /// The step failed but provisioning continued
    FailedDegraded(String),
}

impl StepOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            StepOutcome::FailedFatal(_) | StepOutcome::FailedDegraded(_)
        )
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, StepOutcome::FailedFatal(_))
    }
}

// =============================================================================
// Pipeline Outcome
// =============================================================================

/// Overall verdict for a provisioning run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Every executed step created its resource or found it already present
    Success,
    /// The minimum viable service exists but one or more protective or
    /// convenience steps failed
    Degraded,
    /// A fatal step failed; later steps were never attempted
    Failed(StepName),
}

/// Ordered record of `(step, outcome)` pairs for one pipeline run
#[derive(Debug, Default)]
pub struct PipelineOutcome {
    steps: Vec<(StepName, StepOutcome)>,
}

impl PipelineOutcome {
    pub fn record(&mut self, name: StepName, outcome: StepOutcome) {
        self.steps.push((name, outcome));
    }

    /// Executed steps in pipeline order
    pub fn steps(&self) -> &[(StepName, StepOutcome)] {
        &self.steps
    }

    /// The fatal failure, if any (there is at most one; it ends the run)
    pub fn fatal_failure(&self) -> Option<(StepName, &str)> {
        self.steps.iter().find_map(|(name, outcome)| match outcome {
            StepOutcome::FailedFatal(reason) => Some((*name, reason.as_str())),
            _ => None,
        })
    }

    /// Degraded failures in pipeline order
    pub fn degraded_failures(&self) -> impl Iterator<Item = (StepName, &str)> {
        self.steps.iter().filter_map(|(name, outcome)| match outcome {
            StepOutcome::FailedDegraded(reason) => Some((*name, reason.as_str())),
            _ => None,
        })
    }

    /// Overall verdict for this run
    pub fn verdict(&self) -> Verdict {
        if let Some((name, _)) = self.fatal_failure() {
            return Verdict::Failed(name);
        }
        if self.degraded_failures().next().is_some() {
            return Verdict::Degraded;
        }
        Verdict::Success
    }

    /// The minimum viable service is in place (no fatal failure)
    pub fn service_provisioned(&self) -> bool {
        !matches!(self.verdict(), Verdict::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_success() {
        let mut outcome = PipelineOutcome::default();
        outcome.record(StepName::Tenant, StepOutcome::Created);
        outcome.record(StepName::Volume, StepOutcome::SkippedAlreadyExists);

        assert_eq!(outcome.verdict(), Verdict::Success);
        assert!(outcome.service_provisioned());
        assert!(outcome.fatal_failure().is_none());
    }

    #[test]
    fn test_verdict_degraded() {
        let mut outcome = PipelineOutcome::default();
        outcome.record(StepName::Tenant, StepOutcome::Created);
        outcome.record(
            StepName::Snapshot,
            StepOutcome::FailedDegraded("timeout".into()),
        );

        assert_eq!(outcome.verdict(), Verdict::Degraded);
        assert!(outcome.service_provisioned());
        assert_eq!(outcome.degraded_failures().count(), 1);
    }

    #[test]
    fn test_verdict_failed_names_step() {
        let mut outcome = PipelineOutcome::default();
        outcome.record(StepName::Tenant, StepOutcome::Created);
        outcome.record(StepName::Volume, StepOutcome::FailedFatal("quota".into()));

        assert_eq!(outcome.verdict(), Verdict::Failed(StepName::Volume));
        assert_eq!(outcome.fatal_failure(), Some((StepName::Volume, "quota")));
        assert!(!outcome.service_provisioned());
    }
}
