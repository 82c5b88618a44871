//! Consensus quality grade.

use serde::{Deserialize, Serialize};

/// How consensus was reached.
///
/// Ordered from best to worst, so the worst of several grades is their
/// maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConsensusQuality {
    /// The first round agreed
    Perfect,
    /// A later round agreed
    Retried,
    /// The retry budget ran out
    Failed,
}

impl ConsensusQuality {
    pub fn from_outcome(accepted: bool, rounds_attempted: usize) -> Self {
        match (accepted, rounds_attempted) {
            (false, _) => ConsensusQuality::Failed,
            (true, 0 | 1) => ConsensusQuality::Perfect,
            (true, _) => ConsensusQuality::Retried,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsensusQuality::Perfect => "Perfect",
            ConsensusQuality::Retried => "Retried",
            ConsensusQuality::Failed => "Failed",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ConsensusQuality::Failed)
    }
}

impl std::fmt::Display for ConsensusQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
