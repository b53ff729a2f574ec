//! Interactive confirmation for vibezip.
use crate::error::{Error, Result};
use dialoguer::Confirm;

/// Asks the operator yes/no questions.
pub trait Prompter {
    /// Asks for confirmation.
    ///
    /// # Arguments
    /// * `skip_prompt` - Answer yes without asking
    /// * `prompt` - Question shown to the operator
    fn confirm(&self, skip_prompt: bool, prompt: String) -> Result<bool>;
}

/// Terminal prompts backed by dialoguer.
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        DialoguerPrompter::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn confirm(&self, skip_prompt: bool, prompt: String) -> Result<bool> {
        if skip_prompt {
            return Ok(true);
        }

        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| Error::PromptError(e.to_string()))
    }
}
