//! The data contract each agent invocation produces.

use super::balancing::BalancingCheck;
use super::line_item::FinancialLineItem;
use super::section::SectionKind;
use serde::Serialize;
use std::collections::BTreeMap;

/// Line items grouped by section, each keyed by item name.
pub type StatementSections = BTreeMap<SectionKind, BTreeMap<String, FinancialLineItem>>;

/// Key of a line item in the flat comparable form: `<section_key>.<item>`.
pub fn field_key(section: SectionKind, item: &str) -> String {
    format!("{}.{}", section.payload_key(), item)
}

/// One agent's normalized extraction for one document.
///
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentResult {
    agent_id: String,
    sections: StatementSections,
    #[serde(skip_serializing_if = "Option::is_none")]
    balancing: Option<BalancingCheck>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
}

impl AgentResult {
    pub fn new(agent_id: impl Into<String>, sections: StatementSections) -> Self {
        Self {
            agent_id: agent_id.into(),
            sections,
            balancing: None,
            warnings: Vec::new(),
        }
    }

    pub fn with_balancing(mut self, balancing: Option<BalancingCheck>) -> Self {
        self.balancing = balancing;
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn sections(&self) -> &StatementSections {
        &self.sections
    }

    pub fn balancing(&self) -> Option<&BalancingCheck> {
        self.balancing.as_ref()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn item_count(&self) -> usize {
        self.sections.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    /// Flat comparable form keyed by [`field_key`].
    pub fn fields(&self) -> BTreeMap<String, &FinancialLineItem> {
        self.sections
            .iter()
            .flat_map(|(section, items)| {
                items
                    .iter()
                    .map(move |(name, item)| (field_key(*section, name), item))
            })
            .collect()
    }
}
