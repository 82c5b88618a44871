//! Agent Gateway port
//!
//! Defines the interface for invoking extraction agents on a model provider.

use async_trait::async_trait;
use footing_domain::{AgentProfile, RawPayload, SectionKind};
use thiserror::Error;

/// Errors a single agent invocation can produce
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentError {
    #[error("Invocation failed: {0}")]
    Invocation(String),

    #[error("Timed out")]
    Timeout,
}

/// Gateway for creating extraction agents
///
/// This port defines how the application layer talks to model providers.
/// Implementations (adapters) live in the infrastructure layer.
pub trait AgentGateway: Send + Sync {
    /// Create a fresh agent for one profile slot.
    ///
    /// Agents carry no state between rounds; a new one is created per slot
    /// per round.
    fn create_agent(&self, profile: &AgentProfile) -> Box<dyn StatementAgent>;

    /// Provider name recorded in audit metadata (e.g. "ollama")
    fn provider_name(&self) -> &str;

    /// Model id recorded in audit metadata
    fn model_name(&self) -> &str;
}

/// One extraction agent
#[async_trait]
pub trait StatementAgent: Send + Sync {
    fn agent_id(&self) -> &str;

    /// Extract line items from one statement document.
    async fn extract(
        &self,
        document_text: &str,
        section: SectionKind,
    ) -> Result<RawPayload, AgentError>;
}
