//! Per-document retry state machine.

use crate::consensus::RoundVerdict;
use serde::Serialize;

/// State of one document's audit.
///
/// ```text
/// Running(0) ──AGREE──────────────────────────▶ Accepted
///     │
///     └─DISAGREE / AGENT_FAILURE, i < max ───▶ Running(i + 1)
///     └─DISAGREE / AGENT_FAILURE, i == max ──▶ Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditState {
    Running(usize),
    Accepted,
    Failed,
}

impl AuditState {
    pub fn initial() -> Self {
        AuditState::Running(0)
    }

    /// Next state after a round with `verdict`.
    ///
    /// Terminal states never change.
    pub fn advance(self, verdict: RoundVerdict, max_retries: usize) -> Self {
        match self {
            AuditState::Running(_) if verdict.is_agree() => AuditState::Accepted,
            AuditState::Running(index) if index < max_retries => AuditState::Running(index + 1),
            AuditState::Running(_) => AuditState::Failed,
            terminal => terminal,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, AuditState::Running(_))
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, AuditState::Accepted)
    }

    /// Index of the round to run next, if any.
    pub fn round_index(&self) -> Option<usize> {
        match self {
            AuditState::Running(index) => Some(*index),
            _ => None,
        }
    }
}

impl Default for AuditState {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agree_accepts() {
        let state = AuditState::initial().advance(RoundVerdict::Agree, 2);
        assert_eq!(state, AuditState::Accepted);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_retry_until_budget_exhausted() {
        let mut state = AuditState::initial();
        state = state.advance(RoundVerdict::Disagree, 2);
        assert_eq!(state, AuditState::Running(1));
        state = state.advance(RoundVerdict::AgentFailure, 2);
        assert_eq!(state, AuditState::Running(2));
        state = state.advance(RoundVerdict::Disagree, 2);
        assert_eq!(state, AuditState::Failed);
    }

    #[test]
    fn test_zero_retries_fails_immediately() {
        assert_eq!(
            AuditState::initial().advance(RoundVerdict::Disagree, 0),
            AuditState::Failed
        );
    }

    #[test]
    fn test_terminal_states_are_sticky() {
        assert_eq!(
            AuditState::Accepted.advance(RoundVerdict::Disagree, 5),
            AuditState::Accepted
        );
        assert_eq!(AuditState::Failed.advance(RoundVerdict::Agree, 5), AuditState::Failed);
        assert_eq!(AuditState::Failed.round_index(), None);
        assert_eq!(AuditState::Running(1).round_index(), Some(1));
    }
}
