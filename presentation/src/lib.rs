//! Presentation layer for footing-quorum
//!
//! This crate contains CLI definitions, output formatters,
//! and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat, ProviderArg};
pub use output::console::{ConsoleFormatter, apply_color_setting, format_amount};
pub use progress::reporter::{ProgressReporter, SimpleProgress};
