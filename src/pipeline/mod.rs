//! Provisioning Pipeline
//!
//! Executes the fixed, ordered step list against an open session. Every step
//! with an existence check queries before creating, so re-running against a
//! partially provisioned tenant is safe and convergent. A fatal failure halts
//! the remaining steps; a degraded failure is recorded and the run continues.
//!
//! The pipeline borrows the session and never opens or closes it; teardown is
//! the caller's responsibility on every exit path.

pub mod outcome;
pub mod steps;

pub use outcome::*;
pub use steps::*;

use crate::config::request::ProvisioningRequest;
use crate::domain::ports::{ClusterSession, ControlPlaneClient, DomainCredentials};
use crate::error::Result;
use tracing::{debug, error, info, warn};

/// Staged executor for a resolved provisioning request
pub struct Pipeline<'a, C: ControlPlaneClient + ?Sized> {
    client: &'a C,
    session: &'a ClusterSession,
}

impl<'a, C: ControlPlaneClient + ?Sized> Pipeline<'a, C> {
    pub fn new(client: &'a C, session: &'a ClusterSession) -> Self {
        Self { client, session }
    }

    /// Run every planned step in order and return the accumulated outcome
    ///
    /// Never returns early: a fatal failure ends the loop but the outcome is
    /// still handed back so the caller can report the steps that did succeed.
    pub async fn run(
        &self,
        request: &ProvisioningRequest,
        domain: &DomainCredentials,
    ) -> PipelineOutcome {
        let mut result = PipelineOutcome::default();

        for step in plan(request, domain) {
            match self.execute(&step).await {
                Ok(outcome) => {
                    match &outcome {
                        StepOutcome::Created => info!(step = %step.name, "step complete"),
                        StepOutcome::SkippedAlreadyExists => {
                            info!(step = %step.name, "resource already exists, skipping")
                        }
                        _ => {}
                    }
                    result.record(step.name, outcome);
                }
                Err(e) => match step.policy {
                    FailurePolicy::Fatal => {
                        error!(step = %step.name, error = %e, "fatal step failure, halting pipeline");
                        result.record(step.name, StepOutcome::FailedFatal(e.to_string()));
                        break;
                    }
                    FailurePolicy::Degraded => {
                        warn!(step = %step.name, error = %e, "step failed, continuing degraded");
                        result.record(step.name, StepOutcome::FailedDegraded(e.to_string()));
                    }
                },
            }
        }

        result
    }

    /// Execute one step: existence check first, then the creation calls
    async fn execute(&self, step: &PlannedStep) -> Result<StepOutcome> {
        if let Some(key) = &step.existence {
            if self.client.exists(self.session, key).await? {
                debug!(resource = %key.describe(), "existence check hit");
                return Ok(StepOutcome::SkippedAlreadyExists);
            }
        }

        for action in &step.actions {
            debug!(resource = %action.describe(), "creating");
            self.client.create(self.session, action).await?;
        }

        Ok(StepOutcome::Created)
    }
}
