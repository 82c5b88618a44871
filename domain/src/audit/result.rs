//! The audited outcome for one document.

use super::quality::ConsensusQuality;
use super::state::AuditState;
use super::view::{BalancingView, SectionsView, sections_view};
use crate::consensus::{ConsensusRound, RoundDiagnostics};
use crate::core::error::AuditExhaustedError;
use crate::statement::{
    BalanceVerdict, BalancingCheck, DocumentRef, FinancialLineItem, FootingPolicy, FootingStatus,
    SectionKind, StatementSections, evaluate_balancing,
};
use serde::{Serialize, Serializer};

/// Final artifact for one statement document.
///
/// Built once from the rounds of a terminated audit and never changed.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditResult {
    document: DocumentRef,
    state: AuditState,
    sections: StatementSections,
    reported_balancing: Option<BalancingCheck>,
    balancing: BalanceVerdict,
    policy: FootingPolicy,
    rounds_attempted: usize,
    quality: ConsensusQuality,
    diagnostics: Vec<RoundDiagnostics>,
}

impl AuditResult {
    /// Assemble the result of a terminated audit.
    ///
    /// An accepted audit takes the first agent's values from the last
    /// (agreeing) round. Any other state is reported as failed, with the
    /// first agent's values from the latest round that produced results, or
    /// no line items when none did.
    pub fn from_rounds(
        document: DocumentRef,
        state: AuditState,
        rounds: &[ConsensusRound],
        policy: FootingPolicy,
    ) -> Self {
        let accepted = state.is_accepted();
        let source = if accepted {
            rounds.last().and_then(ConsensusRound::accepted)
        } else {
            rounds.iter().rev().find_map(|round| round.results().first())
        };

        let sections = source.map(|r| r.sections().clone()).unwrap_or_default();
        let reported_balancing = source.and_then(|r| r.balancing().cloned());
        let balancing = evaluate_balancing(&sections, reported_balancing.as_ref(), &policy);

        Self {
            document,
            state: if accepted {
                AuditState::Accepted
            } else {
                AuditState::Failed
            },
            sections,
            reported_balancing,
            balancing,
            policy,
            rounds_attempted: rounds.len(),
            quality: ConsensusQuality::from_outcome(accepted, rounds.len()),
            diagnostics: rounds.iter().map(ConsensusRound::diagnostics).collect(),
        }
    }

    pub fn document(&self) -> &DocumentRef {
        &self.document
    }

    pub fn company(&self) -> &str {
        &self.document.company
    }

    pub fn section(&self) -> SectionKind {
        self.document.section
    }

    pub fn state(&self) -> AuditState {
        self.state
    }

    pub fn is_accepted(&self) -> bool {
        self.state.is_accepted()
    }

    pub fn sections(&self) -> &StatementSections {
        &self.sections
    }

    pub fn line_items(&self) -> impl Iterator<Item = (SectionKind, &FinancialLineItem)> {
        self.sections
            .iter()
            .flat_map(|(kind, items)| items.values().map(move |item| (*kind, item)))
    }

    pub fn item_status(&self, item: &FinancialLineItem) -> FootingStatus {
        item.status(self.policy.footing_tolerance)
    }

    /// Number of line items whose totals do not foot.
    pub fn mismatch_count(&self) -> usize {
        self.line_items()
            .filter(|(_, item)| self.item_status(item) == FootingStatus::Mismatch)
            .count()
    }

    pub fn balancing(&self) -> &BalanceVerdict {
        &self.balancing
    }

    pub fn reported_balancing(&self) -> Option<&BalancingCheck> {
        self.reported_balancing.as_ref()
    }

    pub fn policy(&self) -> &FootingPolicy {
        &self.policy
    }

    pub fn rounds_attempted(&self) -> usize {
        self.rounds_attempted
    }

    pub fn total_retries(&self) -> usize {
        self.rounds_attempted.saturating_sub(1)
    }

    pub fn quality(&self) -> ConsensusQuality {
        self.quality
    }

    /// Diagnostics of every round, in order.
    pub fn diagnostics(&self) -> &[RoundDiagnostics] {
        &self.diagnostics
    }

    /// The exhaustion error when the retry budget ran out.
    pub fn exhaustion(&self) -> Option<AuditExhaustedError> {
        if self.is_accepted() {
            return None;
        }
        self.diagnostics.last().map(|last| AuditExhaustedError {
            rounds: self.rounds_attempted,
            last_round: last.clone(),
        })
    }
}

#[derive(Serialize)]
struct AuditResultView<'a> {
    company: &'a str,
    section: SectionKind,
    state: AuditState,
    consensus_quality: ConsensusQuality,
    rounds_attempted: usize,
    total_retries: usize,
    line_items: SectionsView<'a>,
    balancing: BalancingView,
    diagnostics: &'a [RoundDiagnostics],
}

impl Serialize for AuditResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        AuditResultView {
            company: self.company(),
            section: self.section(),
            state: self.state,
            consensus_quality: self.quality,
            rounds_attempted: self.rounds_attempted,
            total_retries: self.total_retries(),
            line_items: sections_view(&self.sections, self.policy.footing_tolerance),
            balancing: BalancingView::from(&self.balancing),
            diagnostics: &self.diagnostics,
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::{AgentFailure, FailureKind, RoundVerdict};
    use crate::numeric::Tolerance;
    use crate::statement::{AgentResult, BalanceStatus};
    use rust_decimal::Decimal;

    fn doc() -> DocumentRef {
        DocumentRef {
            company: "ADRO".to_string(),
            section: SectionKind::BalanceSheet,
        }
    }

    fn result(agent: &str, assets: i64, liabilities_equity: i64) -> AgentResult {
        let mut sections = StatementSections::new();
        sections.insert(
            SectionKind::BalanceSheet,
            [
                ("total_aset", assets),
                ("total_liabilitas_dan_ekuitas", liabilities_equity),
            ]
            .into_iter()
            .map(|(name, value)| {
                let value = Decimal::new(value, 0);
                (name.to_string(), FinancialLineItem::new(name, value, value))
            })
            .collect(),
        );
        AgentResult::new(agent, sections)
    }

    fn round(index: usize, totals: &[i64]) -> ConsensusRound {
        let results = totals
            .iter()
            .enumerate()
            .map(|(i, total)| result(&format!("agent_{}", i + 1), *total, *total))
            .collect();
        ConsensusRound::evaluate(index, results, vec![], Tolerance::DEFAULT)
    }

    #[test]
    fn test_perfect_result() {
        let rounds = vec![round(0, &[1_000_000, 1_000_000, 1_000_000])];
        let result =
            AuditResult::from_rounds(doc(), AuditState::Accepted, &rounds, FootingPolicy::default());

        assert_eq!(result.quality(), ConsensusQuality::Perfect);
        assert_eq!(result.total_retries(), 0);
        assert_eq!(result.balancing().status, BalanceStatus::Balanced);
        assert_eq!(result.mismatch_count(), 0);
        assert!(result.exhaustion().is_none());
    }

    #[test]
    fn test_retried_result() {
        let rounds = vec![round(0, &[100, 100, 120]), round(1, &[100, 100, 100])];
        let result =
            AuditResult::from_rounds(doc(), AuditState::Accepted, &rounds, FootingPolicy::default());
        assert_eq!(result.quality(), ConsensusQuality::Retried);
        assert_eq!(result.total_retries(), 1);
        assert_eq!(result.diagnostics().len(), 2);
        assert_eq!(result.diagnostics()[0].verdict, RoundVerdict::Disagree);
    }

    #[test]
    fn test_failed_result_keeps_best_data_and_exhaustion() {
        let rounds = vec![
            round(0, &[100, 100, 120]),
            round(1, &[100, 130, 100]),
            round(2, &[140, 100, 100]),
        ];
        let result =
            AuditResult::from_rounds(doc(), AuditState::Failed, &rounds, FootingPolicy::default());

        assert_eq!(result.quality(), ConsensusQuality::Failed);
        assert_eq!(result.total_retries(), 2);
        let first = result.line_items().next().map(|(_, item)| item.reported);
        assert_eq!(first, Some(Decimal::new(140, 0)));

        let exhausted = result.exhaustion().unwrap();
        assert_eq!(exhausted.rounds, 3);
        assert_eq!(exhausted.last_round.round_index, 2);
        assert!(!exhausted.last_round.disagreements.is_empty());
    }

    #[test]
    fn test_failed_without_any_results_is_empty() {
        let failures = (1..=3)
            .map(|i| AgentFailure::new(format!("agent_{}", i), FailureKind::Invocation, "down"))
            .collect::<Vec<_>>();
        let rounds = vec![ConsensusRound::evaluate(0, vec![], failures, Tolerance::DEFAULT)];
        let result =
            AuditResult::from_rounds(doc(), AuditState::Failed, &rounds, FootingPolicy::default());
        assert_eq!(result.line_items().count(), 0);
        assert_eq!(result.balancing().status, BalanceStatus::Unbalanced);
        assert_eq!(result.exhaustion().unwrap().last_round.failures.len(), 3);
    }

    #[test]
    fn test_serialized_view() {
        let rounds = vec![round(0, &[1_000_000, 1_000_000, 1_000_000])];
        let result =
            AuditResult::from_rounds(doc(), AuditState::Accepted, &rounds, FootingPolicy::default());
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["consensus_quality"], "Perfect");
        assert_eq!(json["state"], "accepted");
        let item = &json["line_items"]["laporan_posisi_keuangan"]["total_aset"];
        assert_eq!(item["status"], "OK");
        assert_eq!(item["selisih"].as_f64(), Some(0.0));
        assert_eq!(json["balancing"]["status"], "Seimbang");
    }
}
