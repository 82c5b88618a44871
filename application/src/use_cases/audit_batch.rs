//! Audit Batch use case
//!
//! Audits several companies with bounded concurrency. A failing company is
//! recorded and never aborts the rest of the batch.

use super::audit_company::{AuditCompanyUseCase, CompanyAuditOutput};
use crate::ports::agent_gateway::AgentGateway;
use crate::ports::document_source::DocumentError;
use crate::ports::progress::{AuditProgressNotifier, NoProgress};
use futures::stream::{self, StreamExt};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("No companies to audit")]
    NoCompanies,

    #[error("Failed to list companies: {0}")]
    Documents(#[from] DocumentError),
}

/// A company that could not be audited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub company: String,
    pub reason: String,
}

/// Outcome of a batch run, both lists sorted by company
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub succeeded: Vec<CompanyAuditOutput>,
    pub failed: Vec<BatchFailure>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Companies whose audit reached consensus on every section
    pub fn fully_accepted(&self) -> usize {
        self.succeeded
            .iter()
            .filter(|output| !output.audit.quality().is_failed())
            .count()
    }
}

pub struct AuditBatchUseCase<G: AgentGateway + 'static> {
    company: AuditCompanyUseCase<G>,
    concurrency: usize,
}

impl<G: AgentGateway + 'static> AuditBatchUseCase<G> {
    pub fn new(company: AuditCompanyUseCase<G>) -> Self {
        Self {
            company,
            concurrency: 1,
        }
    }

    /// Companies audited at the same time (minimum 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub async fn execute(
        &self,
        companies: Option<Vec<String>>,
    ) -> Result<BatchSummary, BatchError> {
        self.execute_with_progress(companies, &NoProgress, &CancellationToken::new())
            .await
    }

    /// Audit `companies`, or every company the document source knows.
    pub async fn execute_with_progress(
        &self,
        companies: Option<Vec<String>>,
        progress: &dyn AuditProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<BatchSummary, BatchError> {
        let companies = match companies {
            Some(companies) => companies,
            None => self.company.documents().companies().await?,
        };
        if companies.is_empty() {
            return Err(BatchError::NoCompanies);
        }

        info!(
            "Batch audit of {} companies (concurrency {})",
            companies.len(),
            self.concurrency
        );

        let outcomes: Vec<_> = stream::iter(companies)
            .map(|company| async move {
                let outcome = self
                    .company
                    .execute_with_progress(&company, progress, cancel)
                    .await;
                (company, outcome)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut summary = BatchSummary::default();
        for (company, outcome) in outcomes {
            match outcome {
                Ok(output) => summary.succeeded.push(output),
                Err(e) => {
                    error!("{}: {}", company, e);
                    summary.failed.push(BatchFailure {
                        company,
                        reason: e.to_string(),
                    });
                }
            }
        }
        summary
            .succeeded
            .sort_by(|a, b| a.audit.company().cmp(b.audit.company()));
        summary.failed.sort_by(|a, b| a.company.cmp(&b.company));

        info!(
            "Batch complete: {} succeeded, {} failed",
            summary.succeeded.len(),
            summary.failed.len()
        );
        Ok(summary)
    }
}
