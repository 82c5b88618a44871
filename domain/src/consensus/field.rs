//! Per-field agreement across agents.

use rust_decimal::Decimal;
use serde::Serialize;

/// One line item as seen by every agent of a round.
///
/// `agents`, `reported` and `computed` are parallel: entry `i` belongs to the
/// `i`-th agent result. A `None` value means that agent did not report the
/// field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsensusField {
    pub name: String,
    pub agents: Vec<String>,
    pub reported: Vec<Option<Decimal>>,
    pub computed: Vec<Option<Decimal>>,
    /// Largest pairwise relative difference over reported and computed
    /// values; `None` when a line item is missing from some result.
    pub max_relative_difference: Option<Decimal>,
    pub agrees: bool,
}

impl ConsensusField {
    /// Whether every agent reported this field.
    pub fn is_complete(&self) -> bool {
        self.reported.iter().all(Option::is_some)
    }

    /// Ids of the agents that did not report this field.
    pub fn missing_in(&self) -> Vec<String> {
        self.agents
            .iter()
            .zip(&self.reported)
            .filter(|(_, value)| value.is_none())
            .map(|(agent, _)| agent.clone())
            .collect()
    }

    /// The first agent's values, used as the accepted values.
    pub fn first_values(&self) -> Option<(Decimal, Decimal)> {
        match (self.reported.first(), self.computed.first()) {
            (Some(Some(reported)), Some(Some(computed))) => Some((*reported, *computed)),
            _ => None,
        }
    }
}
