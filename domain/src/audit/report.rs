//! Company-level audit report.
//!
//! A [`CompanyAudit`] merges the per-statement [`AuditResult`]s of one
//! company. Its serialized form is the persisted audit file:
//!
//! ```text
//! {
//!   "audit_footing_laporan_keuangan": {
//!     "<section>": { "<item>": { nilai_tercatat, nilai_perhitungan, selisih, status } },
//!     "balancing": { "status": "Seimbang" | "Tidak Seimbang", ... }
//!   },
//!   "_metadata": { system_type, consensus_quality, total_retries, ... }
//! }
//! ```

use super::quality::ConsensusQuality;
use super::result::AuditResult;
use super::view::{BalancingView, SectionsView, sections_view};
use crate::consensus::{RoundDiagnostics, RoundVerdict};
use crate::numeric::Tolerance;
use crate::statement::{
    BalanceVerdict, FootingPolicy, SectionKind, StatementSections, evaluate_balancing,
};
use serde::{Serialize, Serializer};

/// Facts about the run that produced an audit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunMetadata {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub agent_count: usize,
    pub tolerance: Tolerance,
    /// RFC 3339 UTC timestamp
    pub timestamp: Option<String>,
}

impl RunMetadata {
    /// `"Triple Agent"` for three agents, `"<N> Agent Consensus"` otherwise.
    pub fn system_type(&self) -> String {
        if self.agent_count == 3 {
            "Triple Agent".to_string()
        } else {
            format!("{} Agent Consensus", self.agent_count)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompanyAudit {
    company: String,
    sections: Vec<AuditResult>,
    run: RunMetadata,
}

impl CompanyAudit {
    pub fn new(company: impl Into<String>, sections: Vec<AuditResult>, run: RunMetadata) -> Self {
        Self {
            company: company.into(),
            sections,
            run,
        }
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    /// Per-statement results, in audit order.
    pub fn section_results(&self) -> &[AuditResult] {
        &self.sections
    }

    pub fn run(&self) -> &RunMetadata {
        &self.run
    }

    fn policy(&self) -> FootingPolicy {
        self.sections
            .first()
            .map(|result| *result.policy())
            .unwrap_or_default()
    }

    /// Union of every statement's line items.
    pub fn merged_sections(&self) -> StatementSections {
        let mut merged = StatementSections::new();
        for result in &self.sections {
            for (kind, items) in result.sections() {
                let target = merged.entry(*kind).or_default();
                for (name, item) in items {
                    target.entry(name.clone()).or_insert_with(|| item.clone());
                }
            }
        }
        merged
    }

    /// Balancing verdict recomputed from the merged line items.
    pub fn balancing(&self) -> BalanceVerdict {
        let reported = self
            .sections
            .iter()
            .find(|result| result.section() == SectionKind::BalanceSheet)
            .and_then(AuditResult::reported_balancing)
            .or_else(|| self.sections.iter().find_map(AuditResult::reported_balancing));
        evaluate_balancing(&self.merged_sections(), reported, &self.policy())
    }

    pub fn total_retries(&self) -> usize {
        self.sections.iter().map(AuditResult::total_retries).sum()
    }

    pub fn rounds_attempted(&self) -> usize {
        self.sections.iter().map(AuditResult::rounds_attempted).sum()
    }

    /// Worst quality across statements; `Failed` when nothing was audited.
    pub fn quality(&self) -> ConsensusQuality {
        self.sections
            .iter()
            .map(AuditResult::quality)
            .max()
            .unwrap_or(ConsensusQuality::Failed)
    }

    pub fn audited_sections(&self) -> Vec<SectionKind> {
        self.sections.iter().map(AuditResult::section).collect()
    }

    /// Rounds that did not agree, across all statements.
    pub fn retry_log(&self) -> Vec<RetryLogEntry<'_>> {
        self.sections
            .iter()
            .flat_map(|result| {
                result
                    .diagnostics()
                    .iter()
                    .filter(|round| round.verdict != RoundVerdict::Agree)
                    .map(move |round| RetryLogEntry {
                        section: result.section(),
                        round,
                    })
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct RetryLogEntry<'a> {
    pub section: SectionKind,
    #[serde(flatten)]
    pub round: &'a RoundDiagnostics,
}

#[derive(Serialize)]
struct CompanyAuditView<'a> {
    audit_footing_laporan_keuangan: FootingView<'a>,
    #[serde(rename = "_metadata")]
    metadata: MetadataView<'a>,
}

#[derive(Serialize)]
struct FootingView<'a> {
    #[serde(flatten)]
    sections: SectionsView<'a>,
    balancing: BalancingView,
}

#[derive(Serialize)]
struct MetadataView<'a> {
    system_type: String,
    consensus_quality: ConsensusQuality,
    total_retries: usize,
    rounds_attempted: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    provider: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model_used: Option<&'a str>,
    agent_count: usize,
    consensus_tolerance: rust_decimal::Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    audit_timestamp: Option<&'a str>,
    sections_audited: Vec<SectionKind>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    retry_log: Vec<RetryLogEntry<'a>>,
}

impl Serialize for CompanyAudit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let merged = self.merged_sections();
        let balancing = self.balancing();
        CompanyAuditView {
            audit_footing_laporan_keuangan: FootingView {
                sections: sections_view(&merged, self.policy().footing_tolerance),
                balancing: BalancingView::from(&balancing),
            },
            metadata: MetadataView {
                system_type: self.run.system_type(),
                consensus_quality: self.quality(),
                total_retries: self.total_retries(),
                rounds_attempted: self.rounds_attempted(),
                provider: self.run.provider.as_deref(),
                model_used: self.run.model.as_deref(),
                agent_count: self.run.agent_count,
                consensus_tolerance: self.run.tolerance.value(),
                audit_timestamp: self.run.timestamp.as_deref(),
                sections_audited: self.audited_sections(),
                retry_log: self.retry_log(),
            },
        }
        .serialize(serializer)
    }
}
