use crate::error::CliError;

/// Reads a secret from the operator without echoing it.
pub trait SecretPrompt: Send + Sync {
    /// # Errors
    /// Returns error if the terminal cannot be read.
    fn read_secret(&self, prompt: &str) -> Result<String, CliError>;
}

/// Interactive prompt on the controlling terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaskedPrompt;

impl SecretPrompt for MaskedPrompt {
    fn read_secret(&self, prompt: &str) -> Result<String, CliError> {
        rpassword::prompt_password(prompt).map_err(CliError::Prompt)
    }
}
