//! Consensus across agents.
//!
//! - [`compare`]: field-by-field agreement report over N agent results
//! - [`ConsensusRound`]: one attempt, with its immutable verdict
//! - [`RoundDiagnostics`]: serializable account of a round

pub mod compare;
pub mod field;
pub mod round;

pub use compare::compare;
pub use field::ConsensusField;
pub use round::{
    AgentFailure, ConsensusRound, FailureKind, FieldDisagreement, RoundDiagnostics, RoundVerdict,
};
