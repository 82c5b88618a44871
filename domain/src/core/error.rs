//! Domain error types

use crate::consensus::RoundDiagnostics;
use crate::statement::SectionKind;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid tolerance: {0} (must be a non-negative number)")]
    InvalidTolerance(String),

    #[error("Unknown statement section: {0}")]
    UnknownSection(String),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),
}

/// Failure to turn one agent's raw payload into an [`AgentResult`].
///
/// Treated like an agent failure by the consensus engine: the round's
/// verdict becomes `AGENT_FAILURE` and the round is retried.
///
/// [`AgentResult`]: crate::statement::AgentResult
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizationError {
    #[error("Payload is not parseable JSON: {reason}")]
    Unparseable { reason: String },

    #[error("Payload root is not a JSON object")]
    NotAnObject,

    #[error("Required section {0} is missing from the payload")]
    MissingSection(SectionKind),

    #[error("No numeric line items could be recovered")]
    NoLineItems,
}

/// The retry budget ran out without agreement.
///
/// Carried by a failed [`AuditResult`](crate::audit::AuditResult) together
/// with the diagnostics of the last round.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Consensus not reached after {rounds} round(s); last round verdict {}", .last_round.verdict)]
pub struct AuditExhaustedError {
    pub rounds: usize,
    pub last_round: RoundDiagnostics,
}
