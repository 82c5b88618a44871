//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`error::NormalizationError`]: payload normalization failures
//! - [`string::truncate`]: UTF-8 safe previews for logs and diagnostics

pub mod error;
pub mod string;
