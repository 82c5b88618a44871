//! Application layer for footing-quorum
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ConsensusConfig;
pub use ports::{
    agent_gateway::{AgentError, AgentGateway, StatementAgent},
    audit_logger::{AuditEvent, AuditLogger, NoAuditLogger},
    document_source::{DocumentError, DocumentSource},
    progress::{AuditProgressNotifier, NoProgress},
    result_sink::{ResultSink, SinkError},
};
pub use use_cases::audit_batch::{AuditBatchUseCase, BatchError, BatchFailure, BatchSummary};
pub use use_cases::audit_company::{AuditCompanyError, AuditCompanyUseCase, CompanyAuditOutput};
pub use use_cases::run_consensus::{RunConsensusError, RunConsensusUseCase};
