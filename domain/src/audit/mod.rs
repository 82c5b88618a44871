//! Audit outcomes.
//!
//! - [`AuditState`]: the per-document retry state machine
//! - [`AuditResult`]: the outcome for one statement document
//! - [`CompanyAudit`]: merged statements of one company, as persisted

pub mod quality;
pub mod report;
pub mod result;
pub mod state;
mod view;

pub use quality::ConsensusQuality;
pub use report::{CompanyAudit, RetryLogEntry, RunMetadata};
pub use result::AuditResult;
pub use state::AuditState;
