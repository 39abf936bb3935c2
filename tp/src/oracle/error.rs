//! Oracle error types

use thiserror::Error;

use crate::llm::LlmError;

/// Errors surfaced by oracle operations
#[derive(Debug, Error)]
pub enum OracleError {
    /// The completion service could not be reached or refused the request
    #[error("oracle request failed: {0}")]
    Llm(#[from] LlmError),

    /// The response did not match the expected structure
    #[error("invalid oracle output: {0}")]
    InvalidOutput(String),

    /// A prompt template could not be loaded or rendered
    #[error("prompt error: {0}")]
    Prompt(String),
}

impl OracleError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidOutput(message.into())
    }

    pub fn is_invalid_output(&self) -> bool {
        matches!(self, Self::InvalidOutput(_))
    }
}
