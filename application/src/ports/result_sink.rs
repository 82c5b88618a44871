//! Result Sink port
//!
//! Where finished company audits are persisted.

use async_trait::async_trait;
use footing_domain::CompanyAudit;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to write {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize audit: {0}")]
    Serialize(String),
}

#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Persist one company audit, returning where it was stored.
    async fn store(&self, audit: &CompanyAudit) -> Result<String, SinkError>;
}
