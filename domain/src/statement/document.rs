//! Statement documents handed to agents.

use super::section::SectionKind;
use serde::{Deserialize, Serialize};

/// Identifies one statement of one company.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentRef {
    pub company: String,
    pub section: SectionKind,
}

impl std::fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.company, self.section.file_suffix())
    }
}

/// The text of one statement, ready to be sent to agents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementDocument {
    pub company: String,
    pub section: SectionKind,
    pub text: String,
}

impl StatementDocument {
    pub fn new(company: impl Into<String>, section: SectionKind, text: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            section,
            text: text.into(),
        }
    }

    pub fn reference(&self) -> DocumentRef {
        DocumentRef {
            company: self.company.clone(),
            section: self.section,
        }
    }
}
