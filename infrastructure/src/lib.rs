//! Infrastructure layer for footing-quorum
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod documents;
pub mod logging;
pub mod providers;
pub mod results;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig};
pub use documents::LocalDocumentSource;
pub use logging::JsonlAuditLogger;
pub use providers::{ProviderError, ProviderGateway};
pub use results::JsonFileSink;
