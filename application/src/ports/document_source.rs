//! Document Source port
//!
//! Where statement documents come from.

use async_trait::async_trait;
use footing_domain::SectionKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("No {section} document for {company} at {location}")]
    NotFound {
        company: String,
        section: SectionKind,
        location: String,
    },

    #[error("Failed to read {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
}

impl DocumentError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DocumentError::NotFound { .. })
    }
}

/// Source of statement documents, keyed by company and section
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Load the text of one statement.
    async fn load(&self, company: &str, section: SectionKind) -> Result<String, DocumentError>;

    /// Companies with documents available, sorted.
    async fn companies(&self) -> Result<Vec<String>, DocumentError>;
}
