//! Error types for the model provider adapters

use footing_application::AgentError;
use thiserror::Error;

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Errors that can occur when calling a model provider
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse provider response: {0}")]
    ParseError(String),

    #[error("Provider returned no content{}", .reason.as_deref().map(|r| format!(" ({})", r)).unwrap_or_default())]
    EmptyResponse { reason: Option<String> },

    #[error("Missing API key for {0}")]
    MissingApiKey(String),
}

impl ProviderError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProviderError::Http(e) if e.is_timeout())
    }
}

impl From<ProviderError> for AgentError {
    fn from(e: ProviderError) -> Self {
        if e.is_timeout() {
            AgentError::Timeout
        } else {
            AgentError::Invocation(e.to_string())
        }
    }
}
