//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during LLM operations
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LlmError {
    /// Check if this is a rate limit error
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, LlmError::RateLimited { .. })
    }

    /// Check if the failure happened on the wire rather than in the payload
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            LlmError::RateLimited { .. } | LlmError::ApiError { .. } | LlmError::Network(_) | LlmError::Timeout(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_rate_limit() {
        let err = LlmError::RateLimited {
            retry_after: Duration::from_secs(60),
        };
        assert!(err.is_rate_limit());

        let err = LlmError::ApiError {
            status: 500,
            message: "Server error".to_string(),
        };
        assert!(!err.is_rate_limit());
    }

    #[test]
    fn test_is_transport() {
        assert!(LlmError::Timeout(Duration::from_secs(30)).is_transport());
        assert!(
            LlmError::ApiError {
                status: 503,
                message: "Unavailable".to_string()
            }
            .is_transport()
        );
        assert!(!LlmError::InvalidResponse("no candidates".to_string()).is_transport());
        assert!(!LlmError::Config("missing key".to_string()).is_transport());
    }

    #[test]
    fn test_display() {
        let err = LlmError::ApiError {
            status: 400,
            message: "bad schema".to_string(),
        };
        assert_eq!(err.to_string(), "API error 400: bad schema");
    }
}
