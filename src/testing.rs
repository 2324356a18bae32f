//! Test doubles shared across module tests

use crate::domain::ports::Prompter;
use crate::error::{Error, Result};
use std::collections::VecDeque;

/// A prompter driven by a pre-recorded script
///
/// Text answers are consumed in order; running out of script is an error so a
/// test fails loudly when code prompts more than expected. Confirms fall back
/// to the caller's default when the script is exhausted.
#[derive(Debug, Default)]
pub(crate) struct ScriptedPrompter {
    inputs: VecDeque<String>,
    confirms: VecDeque<bool>,
    passwords: VecDeque<String>,
    prompts_seen: usize,
}

impl ScriptedPrompter {
    pub fn with_inputs<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn confirms<I: IntoIterator<Item = bool>>(mut self, answers: I) -> Self {
        self.confirms = answers.into_iter().collect();
        self
    }

    #[allow(dead_code)]
    pub fn passwords<I, S>(mut self, answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.passwords = answers.into_iter().map(Into::into).collect();
        self
    }

    /// No prompt of any kind was issued
    pub fn untouched(&self) -> bool {
        self.prompts_seen == 0
    }

    /// Every scripted text answer was consumed
    pub fn inputs_exhausted(&self) -> bool {
        self.inputs.is_empty()
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&mut self, prompt: &str) -> Result<String> {
        self.prompts_seen += 1;
        self.inputs
            .pop_front()
            .ok_or_else(|| Error::Prompt(format!("input script exhausted at: {prompt}")))
    }

    fn confirm(&mut self, _prompt: &str, default: bool) -> Result<bool> {
        self.prompts_seen += 1;
        Ok(self.confirms.pop_front().unwrap_or(default))
    }

    fn password(&mut self, prompt: &str) -> Result<String> {
        self.prompts_seen += 1;
        self.passwords
            .pop_front()
            .ok_or_else(|| Error::Prompt(format!("password script exhausted at: {prompt}")))
    }
}
