//! Structural normalization of agent payloads.
//!
//! Agents return loosely structured JSON. This module recovers it and maps it
//! onto the fixed [`AgentResult`](crate::statement::AgentResult) schema so
//! that results from different agents can be compared field by field.

pub mod normalizer;
pub mod repair;

pub use normalizer::{normalize, normalize_key};
pub use repair::recover_json;

use crate::core::string::{single_line, truncate};
use serde_json::Value;

/// What an agent returned, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    /// Model text, possibly fenced or wrapped in prose.
    Text(String),
    /// An already-parsed JSON value (e.g. from a structured-output API).
    Structured(Value),
}

impl RawPayload {
    pub fn text(text: impl Into<String>) -> Self {
        RawPayload::Text(text.into())
    }

    /// One-line preview for logs.
    pub fn preview(&self, max_len: usize) -> String {
        match self {
            RawPayload::Text(text) => truncate(&single_line(text), max_len),
            RawPayload::Structured(value) => truncate(&value.to_string(), max_len),
        }
    }
}

impl From<Value> for RawPayload {
    fn from(value: Value) -> Self {
        RawPayload::Structured(value)
    }
}
