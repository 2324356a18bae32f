//! Operator console
//!
//! The dialoguer-backed [`Prompter`] used for guided modes, and the final
//! report rendering.

use crate::config::request::ProvisioningRequest;
use crate::domain::ports::Prompter;
use crate::error::{Error, Result};
use crate::pipeline::{PipelineOutcome, StepOutcome, Verdict};
use dialoguer::{Confirm, Input, Password};

// =============================================================================
// Console Prompter
// =============================================================================

/// Terminal prompter for guided modes
#[derive(Debug, Default)]
pub struct ConsolePrompter;

impl Prompter for ConsolePrompter {
    fn input(&mut self, prompt: &str) -> Result<String> {
        let answer: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| Error::Prompt(e.to_string()))?;
        Ok(answer.trim().to_string())
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(|e| Error::Prompt(e.to_string()))
    }

    fn password(&mut self, prompt: &str) -> Result<String> {
        Password::new()
            .with_prompt(prompt)
            .interact()
            .map_err(|e| Error::Prompt(e.to_string()))
    }
}

// =============================================================================
// Report Rendering
// =============================================================================

/// One report line for a step outcome
fn outcome_line(outcome: &StepOutcome) -> String {
    match outcome {
        StepOutcome::Created => "created".to_string(),
        StepOutcome::SkippedAlreadyExists => "already exists".to_string(),
        StepOutcome::FailedFatal(reason) => format!("FAILED (fatal): {}", reason),
        StepOutcome::FailedDegraded(reason) => format!("failed (degraded): {}", reason),
    }
}

/// Render the final report for the operator
///
/// Always lists every executed step, fatal failure or not, then the overall
/// verdict and — when the service exists — the access paths.
pub fn render_report(request: &ProvisioningRequest, outcome: &PipelineOutcome, dry_run: bool) {
    println!();
    if dry_run {
        println!("Provisioning report for {} (dry run)", request.tenant);
    } else {
        println!("Provisioning report for {}", request.tenant);
    }

    for (name, step_outcome) in outcome.steps() {
        println!("  {:<18} {}", name.as_str(), outcome_line(step_outcome));
    }

    match outcome.verdict() {
        Verdict::Success => println!("Result: success"),
        Verdict::Degraded => {
            println!("Result: degraded success (service is usable; some enhancements failed)")
        }
        Verdict::Failed(step) => println!("Result: FAILED at step {}", step),
    }

    if outcome.service_provisioned() {
        println!("Share path: {}", request.share_path());
        if request.features.nfs.is_some() {
            println!("NFS path:   {}", request.nfs_path());
        }
    }
}
