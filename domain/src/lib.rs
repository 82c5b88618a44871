//! Domain layer for footing-quorum
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Footing
//!
//! A financial statement *foots* when every reported total equals the sum of
//! its components. Agents extract each line item twice: the value as
//! reported in the document and the value recomputed from its components.
//!
//! ## Consensus
//!
//! A single model call is not trusted. N agents (three by default) extract
//! the same document independently; their results are accepted only when
//! every field agrees within a strict relative tolerance. Otherwise the
//! whole round is repeated, up to a retry budget.
//!
//! ```text
//! RawPayload ──normalize──▶ AgentResult ×N ──compare──▶ ConsensusRound
//!                                                          │
//!                              AuditState::advance ◀───────┘
//!                                      │
//!                         AuditResult ──merge──▶ CompanyAudit
//! ```

pub mod agent;
pub mod audit;
pub mod config;
pub mod consensus;
pub mod core;
pub mod normalize;
pub mod numeric;
pub mod prompt;
pub mod providers;
pub mod statement;

// Re-export commonly used types
pub use agent::{AgentProfile, default_profiles, profiles_for};
pub use audit::{AuditResult, AuditState, CompanyAudit, ConsensusQuality, RunMetadata};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use consensus::{
    AgentFailure, ConsensusField, ConsensusRound, FailureKind, FieldDisagreement,
    RoundDiagnostics, RoundVerdict, compare,
};
pub use core::error::{AuditExhaustedError, DomainError, NormalizationError};
pub use normalize::{RawPayload, normalize};
pub use numeric::{Tolerance, agrees, parse_amount, relative_difference};
pub use prompt::AuditPromptTemplate;
pub use providers::{ProviderKind, ProviderSettings};
pub use statement::{
    AgentResult, BalanceBasis, BalanceStatus, BalanceVerdict, BalancingCheck, DocumentRef,
    FinancialLineItem, FootingPolicy, FootingStatus, SectionKind, StatementDocument,
    StatementSections, total_assets_item,
};
