//! LlmClient trait definition and the canned client

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Stateless LLM client - each call is independent
///
/// No conversation state is kept between calls; every oracle operation sends
/// its full context in one request.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request and wait for the full response
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

/// Client that replays scripted responses in order
///
/// Used by tests and by the offline provider. Once the script runs out it
/// answers with the fallback text if one is set, and errors otherwise.
pub struct CannedLlmClient {
    responses: Mutex<VecDeque<Result<String, String>>>,
    fallback: Option<String>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl CannedLlmClient {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let responses: VecDeque<_> = responses.into_iter().map(|r| Ok(r.into())).collect();
        debug!(response_count = %responses.len(), "CannedLlmClient::new: called");
        Self {
            responses: Mutex::new(responses),
            fallback: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Client that answers every request with empty text
    ///
    /// Empty answers make every oracle operation fall back: baseline template
    /// only, no suggestions, refinement leaves the list as is.
    pub fn offline() -> Self {
        debug!("CannedLlmClient::offline: called");
        Self {
            responses: Mutex::new(VecDeque::new()),
            fallback: Some(String::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful response
    pub fn push(&self, text: impl Into<String>) -> &Self {
        self.lock_responses().push_back(Ok(text.into()));
        self
    }

    /// Queue a transport failure
    pub fn push_error(&self, message: impl Into<String>) -> &Self {
        self.lock_responses().push_back(Err(message.into()));
        self
    }

    /// Number of requests served so far
    pub fn call_count(&self) -> usize {
        self.lock_requests().len()
    }

    /// Copies of every request received, oldest first
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.lock_requests().clone()
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<String, String>>> {
        self.responses.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_requests(&self) -> std::sync::MutexGuard<'_, Vec<CompletionRequest>> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl LlmClient for CannedLlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%request.max_tokens, "CannedLlmClient::complete: called");
        self.lock_requests().push(request);

        match self.lock_responses().pop_front() {
            Some(Ok(text)) => Ok(CompletionResponse::text(text)),
            Some(Err(message)) => {
                debug!(%message, "CannedLlmClient::complete: scripted failure");
                Err(LlmError::ApiError { status: 503, message })
            }
            None => match &self.fallback {
                Some(text) => Ok(CompletionResponse::text(text.clone())),
                None => {
                    debug!("CannedLlmClient::complete: no more canned responses");
                    Err(LlmError::InvalidResponse("No more canned responses".to_string()))
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest::structured("Test", "hello", serde_json::json!({}), 1000)
    }

    #[tokio::test]
    async fn test_canned_client_returns_responses() {
        let client = CannedLlmClient::new(["Response 1", "Response 2"]);

        let resp1 = client.complete(request()).await.unwrap();
        assert_eq!(resp1.content, Some("Response 1".to_string()));

        let resp2 = client.complete(request()).await.unwrap();
        assert_eq!(resp2.content, Some("Response 2".to_string()));

        assert_eq!(client.call_count(), 2);
        assert_eq!(client.requests()[0].system_prompt, "Test");
    }

    #[tokio::test]
    async fn test_canned_client_errors_when_exhausted() {
        let client = CannedLlmClient::new(Vec::<String>::new());
        assert!(client.complete(request()).await.is_err());
    }

    #[tokio::test]
    async fn test_canned_client_scripted_error() {
        let client = CannedLlmClient::new(Vec::<String>::new());
        client.push_error("model busy").push("[]");

        let err = client.complete(request()).await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(client.complete(request()).await.unwrap().trimmed_text(), "[]");
    }

    #[tokio::test]
    async fn test_offline_client_answers_empty() {
        let client = CannedLlmClient::offline();
        for _ in 0..3 {
            assert_eq!(client.complete(request()).await.unwrap().trimmed_text(), "");
        }
    }
}
