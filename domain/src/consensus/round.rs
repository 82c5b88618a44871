//! Consensus rounds: one attempt of N agent extractions.

use super::compare::compare;
use super::field::ConsensusField;
use crate::numeric::Tolerance;
use crate::statement::AgentResult;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of a consensus round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundVerdict {
    /// Every field agrees across all agents
    Agree,
    /// At least one field differs beyond tolerance or is missing somewhere
    Disagree,
    /// At least one agent produced no usable result
    AgentFailure,
}

impl RoundVerdict {
    pub fn is_agree(&self) -> bool {
        matches!(self, RoundVerdict::Agree)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoundVerdict::Agree => "AGREE",
            RoundVerdict::Disagree => "DISAGREE",
            RoundVerdict::AgentFailure => "AGENT_FAILURE",
        }
    }
}

impl std::fmt::Display for RoundVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why an agent produced no result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Invocation,
    Timeout,
    Normalization,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentFailure {
    pub agent_id: String,
    pub kind: FailureKind,
    pub message: String,
}

impl AgentFailure {
    pub fn new(agent_id: impl Into<String>, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            kind,
            message: message.into(),
        }
    }
}

/// A single round of agent extractions and their comparison.
///
/// Rounds are built in one step by [`ConsensusRound::evaluate`] and never
/// change afterwards.
///
/// # Example
///
/// ```
/// use footing_domain::consensus::{ConsensusRound, RoundVerdict};
/// use footing_domain::numeric::Tolerance;
/// use footing_domain::statement::{AgentResult, FinancialLineItem, SectionKind, StatementSections};
/// use rust_decimal::Decimal;
///
/// let result = |agent: &str| {
///     let mut sections = StatementSections::new();
///     sections.insert(
///         SectionKind::BalanceSheet,
///         [("total_aset".to_string(),
///           FinancialLineItem::new("total_aset", Decimal::new(1_000_000, 0), Decimal::new(1_000_000, 0)))]
///         .into_iter()
///         .collect(),
///     );
///     AgentResult::new(agent, sections)
/// };
///
/// let round = ConsensusRound::evaluate(
///     0,
///     vec![result("agent_1"), result("agent_2"), result("agent_3")],
///     vec![],
///     Tolerance::DEFAULT,
/// );
/// assert_eq!(round.verdict(), RoundVerdict::Agree);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConsensusRound {
    index: usize,
    results: Vec<AgentResult>,
    failures: Vec<AgentFailure>,
    fields: BTreeMap<String, ConsensusField>,
    verdict: RoundVerdict,
}

impl ConsensusRound {
    /// Compare the round's results and fix its verdict.
    ///
    /// Any failure makes the verdict `AgentFailure`. Otherwise the round
    /// agrees only if at least two results were compared, at least one field
    /// exists, and every field agrees.
    pub fn evaluate(
        index: usize,
        results: Vec<AgentResult>,
        failures: Vec<AgentFailure>,
        tolerance: Tolerance,
    ) -> Self {
        let fields = compare(&results, tolerance);

        let verdict = if !failures.is_empty() {
            RoundVerdict::AgentFailure
        } else if results.len() >= 2 && !fields.is_empty() && fields.values().all(|f| f.agrees) {
            RoundVerdict::Agree
        } else {
            RoundVerdict::Disagree
        };

        Self {
            index,
            results,
            failures,
            fields,
            verdict,
        }
    }

    /// Round index (0-based)
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn verdict(&self) -> RoundVerdict {
        self.verdict
    }

    pub fn results(&self) -> &[AgentResult] {
        &self.results
    }

    pub fn failures(&self) -> &[AgentFailure] {
        &self.failures
    }

    pub fn fields(&self) -> &BTreeMap<String, ConsensusField> {
        &self.fields
    }

    /// Fields that did not agree
    pub fn disagreements(&self) -> impl Iterator<Item = &ConsensusField> {
        self.fields.values().filter(|field| !field.agrees)
    }

    /// The accepted result: the first agent's, when the round agreed.
    pub fn accepted(&self) -> Option<&AgentResult> {
        if self.verdict.is_agree() {
            self.results.first()
        } else {
            None
        }
    }

    pub fn diagnostics(&self) -> RoundDiagnostics {
        RoundDiagnostics {
            round_index: self.index,
            verdict: self.verdict,
            disagreements: self.disagreements().map(FieldDisagreement::from).collect(),
            failures: self.failures.clone(),
        }
    }
}

/// Serializable account of one round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundDiagnostics {
    pub round_index: usize,
    pub verdict: RoundVerdict,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub disagreements: Vec<FieldDisagreement>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<AgentFailure>,
}

/// A field that did not agree, with every agent's observed values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDisagreement {
    pub field: String,
    pub agents: Vec<String>,
    pub reported: Vec<Option<Decimal>>,
    pub computed: Vec<Option<Decimal>>,
    pub relative_difference: Option<Decimal>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_in: Vec<String>,
}

impl From<&ConsensusField> for FieldDisagreement {
    fn from(field: &ConsensusField) -> Self {
        Self {
            field: field.name.clone(),
            agents: field.agents.clone(),
            reported: field.reported.clone(),
            computed: field.computed.clone(),
            relative_difference: field.max_relative_difference,
            missing_in: field.missing_in(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::{BalancingCheck, FinancialLineItem, SectionKind, StatementSections};

    fn result(agent: &str, total: i64) -> AgentResult {
        let mut sections = StatementSections::new();
        sections.insert(
            SectionKind::BalanceSheet,
            [(
                "total_aset".to_string(),
                FinancialLineItem::new("total_aset", Decimal::new(total, 0), Decimal::new(total, 0)),
            )]
            .into_iter()
            .collect(),
        );
        AgentResult::new(agent, sections)
    }

    #[test]
    fn test_agreeing_round_accepts_first_agent() {
        let round = ConsensusRound::evaluate(
            0,
            vec![result("agent_1", 100), result("agent_2", 100), result("agent_3", 100)],
            vec![],
            Tolerance::DEFAULT,
        );
        assert_eq!(round.verdict(), RoundVerdict::Agree);
        assert_eq!(round.accepted().map(AgentResult::agent_id), Some("agent_1"));
        assert!(round.diagnostics().disagreements.is_empty());
    }

    #[test]
    fn test_disagreeing_round_has_diagnostics() {
        let round = ConsensusRound::evaluate(
            1,
            vec![result("agent_1", 100), result("agent_2", 100), result("agent_3", 120)],
            vec![],
            Tolerance::DEFAULT,
        );
        assert_eq!(round.verdict(), RoundVerdict::Disagree);
        assert!(round.accepted().is_none());

        let diagnostics = round.diagnostics();
        assert_eq!(diagnostics.round_index, 1);
        assert_eq!(diagnostics.disagreements.len(), 1);
        let disagreement = &diagnostics.disagreements[0];
        assert_eq!(disagreement.field, "laporan_posisi_keuangan.total_aset");
        assert_eq!(disagreement.reported[2], Some(Decimal::new(120, 0)));
    }

    #[test]
    fn test_balancing_disagreement_fails_round() {
        let balanced = |agent: &str, liabilities_equity: i64| {
            result(agent, 100).with_balancing(Some(BalancingCheck {
                status: None,
                total_assets: Some(Decimal::new(100, 0)),
                total_liabilities_equity: Some(Decimal::new(liabilities_equity, 0)),
            }))
        };
        let round = ConsensusRound::evaluate(
            0,
            vec![balanced("agent_1", 100), balanced("agent_2", 100), balanced("agent_3", 90)],
            vec![],
            Tolerance::DEFAULT,
        );
        assert_eq!(round.verdict(), RoundVerdict::Disagree);
        let fields: Vec<String> = round.disagreements().map(|f| f.name.clone()).collect();
        assert_eq!(fields, vec!["balancing.total_liabilitas_ekuitas".to_string()]);
    }

    #[test]
    fn test_failure_overrides_agreement() {
        let round = ConsensusRound::evaluate(
            0,
            vec![result("agent_1", 100), result("agent_2", 100)],
            vec![AgentFailure::new("agent_3", FailureKind::Timeout, "timed out")],
            Tolerance::DEFAULT,
        );
        assert_eq!(round.verdict(), RoundVerdict::AgentFailure);
        assert_eq!(round.diagnostics().failures.len(), 1);
    }

    #[test]
    fn test_single_result_cannot_agree() {
        let round = ConsensusRound::evaluate(0, vec![result("agent_1", 100)], vec![], Tolerance::DEFAULT);
        assert_eq!(round.verdict(), RoundVerdict::Disagree);
    }

    #[test]
    fn test_verdict_serialization() {
        assert_eq!(
            serde_json::to_string(&RoundVerdict::AgentFailure).unwrap(),
            "\"AGENT_FAILURE\""
        );
        let diagnostics = ConsensusRound::evaluate(
            0,
            vec![result("agent_1", 1), result("agent_2", 1)],
            vec![],
            Tolerance::DEFAULT,
        )
        .diagnostics();
        let json = serde_json::to_value(&diagnostics).unwrap();
        assert_eq!(json["verdict"], "AGREE");
        assert!(json.get("disagreements").is_none());
    }
}
