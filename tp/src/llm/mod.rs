//! LLM Client module
//!
//! Provides the completion boundary the oracle talks through.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod gemini;
mod types;

pub use client::{CannedLlmClient, LlmClient};
pub use error::LlmError;
pub use gemini::GeminiClient;
pub use types::{CompletionRequest, CompletionResponse, Message, StopReason, TokenUsage};

use crate::config::LlmConfig;

/// Create an LLM client based on the provider specified in config
///
/// Supports "gemini" and "offline". The offline provider answers every request
/// with empty text, which exercises every fallback path without a network.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "gemini" => {
            debug!("create_client: creating Gemini client");
            Ok(Arc::new(GeminiClient::from_config(config)?))
        }
        "offline" => {
            debug!("create_client: creating offline client");
            Ok(Arc::new(CannedLlmClient::offline()))
        }
        other => {
            debug!(provider = %other, "create_client: unknown provider");
            Err(LlmError::Config(format!(
                "Unknown LLM provider: '{}'. Supported: gemini, offline",
                other
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client_unknown_provider() {
        let config = LlmConfig {
            provider: "carrier-pigeon".to_string(),
            ..LlmConfig::default()
        };
        let err = create_client(&config).err().unwrap();
        assert!(err.to_string().contains("carrier-pigeon"));
    }

    #[test]
    fn test_create_client_offline() {
        let config = LlmConfig {
            provider: "offline".to_string(),
            ..LlmConfig::default()
        };
        assert!(create_client(&config).is_ok());
    }

    #[test]
    fn test_create_client_gemini_without_key() {
        let config = LlmConfig {
            api_key_env: "TRIPPACKER_TEST_UNSET_KEY".to_string(),
            ..LlmConfig::default()
        };
        let err = create_client(&config).err().unwrap();
        assert!(matches!(err, LlmError::Config(_)));
    }
}
