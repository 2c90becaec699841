//! LlmClient trait definition

use async_trait::async_trait;

use super::LlmError;

/// A single completion request: one fully-rendered text prompt
///
/// The pipeline renders everything the model needs (instructions, serialized
/// trip state, windowed history, the current message) into one prompt, so the
/// gateway stays a thin "text in, text out" capability.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// The rendered prompt
    pub prompt: String,

    /// Max tokens for the response (capped by the client's configured limit)
    pub max_tokens: u32,
}

/// Token usage for one completion, for diagnostics
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Response from a completion request
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Raw model output text
    pub content: String,

    /// Token usage reported by the provider
    pub usage: TokenUsage,
}

/// Stateless LLM client - each call is independent
///
/// No conversation state is maintained between calls; every stage of a turn
/// submits its own self-contained prompt and parses the text that comes back.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request (blocking until complete)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock LLM client for unit tests
    ///
    /// Returns scripted responses in order and errors once they run out.
    pub struct MockLlmClient {
        responses: Vec<String>,
        call_count: AtomicUsize,
    }

    impl MockLlmClient {
        pub fn new(responses: Vec<String>) -> Self {
            Self {
                responses,
                call_count: AtomicUsize::new(0),
            }
        }

        /// Script from string slices, for test brevity
        pub fn scripted(responses: &[&str]) -> Self {
            Self::new(responses.iter().map(|s| s.to_string()).collect())
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            self.responses
                .get(idx)
                .map(|content| CompletionResponse {
                    content: content.clone(),
                    usage: TokenUsage::default(),
                })
                .ok_or_else(|| LlmError::InvalidResponse("No more mock responses".to_string()))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn request() -> CompletionRequest {
            CompletionRequest {
                prompt: "Test".to_string(),
                max_tokens: 100,
            }
        }

        #[tokio::test]
        async fn test_mock_client_returns_responses_in_order() {
            let client = MockLlmClient::scripted(&["Response 1", "Response 2"]);

            let first = client.complete(request()).await.unwrap();
            assert_eq!(first.content, "Response 1");

            let second = client.complete(request()).await.unwrap();
            assert_eq!(second.content, "Response 2");

            assert_eq!(client.call_count(), 2);
        }

        #[tokio::test]
        async fn test_mock_client_errors_when_exhausted() {
            let client = MockLlmClient::new(vec![]);
            let result = client.complete(request()).await;
            assert!(result.is_err());
        }
    }
}
