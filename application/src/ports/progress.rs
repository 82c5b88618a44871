//! Progress notification port
//!
//! Defines the interface for reporting progress during an audit.

use footing_domain::{AuditResult, DocumentRef, RoundVerdict};

/// Callback for progress updates during consensus audits
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain lines, etc.)
pub trait AuditProgressNotifier: Send + Sync {
    /// Called when a round starts
    fn on_round_start(&self, document: &DocumentRef, round_index: usize, agent_count: usize);

    /// Called when one agent of the round finishes
    fn on_agent_complete(&self, document: &DocumentRef, agent_id: &str, success: bool);

    /// Called when a round's verdict is known
    fn on_round_complete(&self, document: &DocumentRef, round_index: usize, verdict: RoundVerdict);

    /// Called when a document's audit terminates
    fn on_document_complete(&self, _result: &AuditResult) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl AuditProgressNotifier for NoProgress {
    fn on_round_start(&self, _document: &DocumentRef, _round_index: usize, _agent_count: usize) {}
    fn on_agent_complete(&self, _document: &DocumentRef, _agent_id: &str, _success: bool) {}
    fn on_round_complete(&self, _document: &DocumentRef, _round_index: usize, _verdict: RoundVerdict) {}
}
