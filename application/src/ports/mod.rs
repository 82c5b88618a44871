//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod agent_gateway;
pub mod audit_logger;
pub mod document_source;
pub mod progress;
pub mod result_sink;
