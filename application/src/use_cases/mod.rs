//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod audit_batch;
pub mod audit_company;
pub mod run_consensus;
