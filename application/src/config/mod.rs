//! Application-level configuration.
//!
//! - [`ConsensusConfig`]: consensus engine parameters (tolerance, retries, agents, timeouts)

pub mod consensus_config;

pub use consensus_config::ConsensusConfig;
