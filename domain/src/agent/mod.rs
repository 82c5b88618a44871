//! Agent domain
//!
//! An agent is one independent model invocation within a consensus round.
//! Each agent slot has an [`AgentProfile`] that fixes its sampling settings
//! and verification emphasis.

pub mod profile;

pub use profile::{AgentProfile, default_profiles, profiles_for};
