//! Audit Company use case
//!
//! Runs the consensus audit over every configured statement of one company
//! and assembles the combined [`CompanyAudit`].

use super::run_consensus::{RunConsensusError, RunConsensusUseCase};
use crate::ports::agent_gateway::AgentGateway;
use crate::ports::document_source::{DocumentError, DocumentSource};
use crate::ports::progress::{AuditProgressNotifier, NoProgress};
use crate::ports::result_sink::{ResultSink, SinkError};
use footing_domain::{CompanyAudit, RunMetadata, SectionKind, StatementDocument};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum AuditCompanyError {
    #[error("No statement documents found for {0}")]
    NoDocuments(String),

    #[error(transparent)]
    Consensus(#[from] RunConsensusError),

    #[error("Failed to load documents for {company}: {source}")]
    Document {
        company: String,
        #[source]
        source: DocumentError,
    },

    #[error("Failed to store results for {company}: {source}")]
    Sink {
        company: String,
        #[source]
        source: SinkError,
    },
}

impl AuditCompanyError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AuditCompanyError::Consensus(e) if e.is_cancelled())
    }
}

/// Outcome of auditing one company
#[derive(Debug)]
pub struct CompanyAuditOutput {
    pub audit: CompanyAudit,
    /// Where the result was stored, when a sink is configured
    pub location: Option<String>,
    /// Configured sections that had no document
    pub skipped: Vec<SectionKind>,
}

/// Use case for auditing all statements of one company
pub struct AuditCompanyUseCase<G: AgentGateway + 'static> {
    consensus: RunConsensusUseCase<G>,
    documents: Arc<dyn DocumentSource>,
    sink: Option<Arc<dyn ResultSink>>,
}

impl<G: AgentGateway + 'static> AuditCompanyUseCase<G> {
    pub fn new(consensus: RunConsensusUseCase<G>, documents: Arc<dyn DocumentSource>) -> Self {
        Self {
            consensus,
            documents,
            sink: None,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn ResultSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn consensus(&self) -> &RunConsensusUseCase<G> {
        &self.consensus
    }

    pub fn documents(&self) -> &Arc<dyn DocumentSource> {
        &self.documents
    }

    pub async fn execute(&self, company: &str) -> Result<CompanyAuditOutput, AuditCompanyError> {
        self.execute_with_progress(company, &NoProgress, &CancellationToken::new())
            .await
    }

    pub async fn execute_with_progress(
        &self,
        company: &str,
        progress: &dyn AuditProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<CompanyAuditOutput, AuditCompanyError> {
        let config = self.consensus.config();

        let mut results = Vec::new();
        let mut skipped = Vec::new();
        for &section in &config.sections {
            let text = match self.documents.load(company, section).await {
                Ok(text) => text,
                Err(e) if e.is_not_found() => {
                    warn!("{}", e);
                    skipped.push(section);
                    continue;
                }
                Err(source) => {
                    return Err(AuditCompanyError::Document {
                        company: company.to_string(),
                        source,
                    });
                }
            };

            let document = StatementDocument::new(company, section, text);
            let result = self
                .consensus
                .execute_with_progress(&document, progress, cancel)
                .await?;
            results.push(result);
        }

        if results.is_empty() {
            return Err(AuditCompanyError::NoDocuments(company.to_string()));
        }

        let gateway = self.consensus.gateway();
        let run = RunMetadata {
            provider: Some(gateway.provider_name().to_string()),
            model: Some(gateway.model_name().to_string()),
            agent_count: config.agent_count,
            tolerance: config.tolerance,
            timestamp: Some(chrono::Utc::now().to_rfc3339()),
        };
        let audit = CompanyAudit::new(company, results, run);
        info!(
            "{}: {} section(s) audited, quality {}, {} retries",
            company,
            audit.audited_sections().len(),
            audit.quality(),
            audit.total_retries()
        );

        let location = match &self.sink {
            Some(sink) => {
                let location =
                    sink.store(&audit)
                        .await
                        .map_err(|source| AuditCompanyError::Sink {
                            company: company.to_string(),
                            source,
                        })?;
                info!("{}: results written to {}", company, location);
                Some(location)
            }
            None => None,
        };

        Ok(CompanyAuditOutput {
            audit,
            location,
            skipped,
        })
    }
}
