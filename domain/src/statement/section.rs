//! Financial statement sections.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One of the three statements audited per company.
///
/// Serialized as its canonical payload key (e.g. `laporan_posisi_keuangan`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    #[serde(rename = "laporan_posisi_keuangan", alias = "balance_sheet")]
    BalanceSheet,
    #[serde(rename = "laporan_laba_rugi", alias = "income_statement")]
    IncomeStatement,
    #[serde(rename = "laporan_arus_kas", alias = "cash_flow")]
    CashFlow,
}

impl SectionKind {
    /// All sections in audit order.
    pub const ALL: [SectionKind; 3] = [
        SectionKind::BalanceSheet,
        SectionKind::IncomeStatement,
        SectionKind::CashFlow,
    ];

    /// Key of this section in the audit payload.
    pub fn payload_key(&self) -> &'static str {
        match self {
            SectionKind::BalanceSheet => "laporan_posisi_keuangan",
            SectionKind::IncomeStatement => "laporan_laba_rugi",
            SectionKind::CashFlow => "laporan_arus_kas",
        }
    }

    /// Suffix of the statement document file, as in `<COMPANY>_<suffix>.txt`.
    pub fn file_suffix(&self) -> &'static str {
        match self {
            SectionKind::BalanceSheet => "posisi_keuangan",
            SectionKind::IncomeStatement => "laba_rugi",
            SectionKind::CashFlow => "arus_kas",
        }
    }

    /// Human-readable name for console output.
    pub fn display_name(&self) -> &'static str {
        match self {
            SectionKind::BalanceSheet => "Statement of Financial Position",
            SectionKind::IncomeStatement => "Income Statement",
            SectionKind::CashFlow => "Cash Flow Statement",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::BalanceSheet => "balance_sheet",
            SectionKind::IncomeStatement => "income_statement",
            SectionKind::CashFlow => "cash_flow",
        }
    }

    /// Resolve a (normalized) key to a section.
    ///
    /// Accepts the payload key, the English name, the file suffix and
    /// `neraca` for the balance sheet.
    pub fn from_alias(key: &str) -> Option<SectionKind> {
        match key {
            "laporan_posisi_keuangan" | "balance_sheet" | "posisi_keuangan" | "neraca"
            | "statement_of_financial_position" => Some(SectionKind::BalanceSheet),
            "laporan_laba_rugi" | "income_statement" | "laba_rugi" | "profit_and_loss" => {
                Some(SectionKind::IncomeStatement)
            }
            "laporan_arus_kas" | "cash_flow" | "arus_kas" | "cash_flow_statement" => {
                Some(SectionKind::CashFlow)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.payload_key())
    }
}

impl FromStr for SectionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(['-', ' '], "_");
        SectionKind::from_alias(&key).ok_or_else(|| DomainError::UnknownSection(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_resolve() {
        assert_eq!(SectionKind::from_alias("neraca"), Some(SectionKind::BalanceSheet));
        assert_eq!(SectionKind::from_alias("laba_rugi"), Some(SectionKind::IncomeStatement));
        assert_eq!(SectionKind::from_alias("cash_flow"), Some(SectionKind::CashFlow));
        assert_eq!(SectionKind::from_alias("aset"), None);
    }

    #[test]
    fn test_from_str_normalizes() {
        assert_eq!(
            "Balance Sheet".parse::<SectionKind>().unwrap(),
            SectionKind::BalanceSheet
        );
        assert_eq!(
            "income-statement".parse::<SectionKind>().unwrap(),
            SectionKind::IncomeStatement
        );
        assert!("notes".parse::<SectionKind>().is_err());
    }

    #[test]
    fn test_serializes_as_payload_key() {
        let json = serde_json::to_string(&SectionKind::CashFlow).unwrap();
        assert_eq!(json, "\"laporan_arus_kas\"");
        let parsed: SectionKind = serde_json::from_str("\"balance_sheet\"").unwrap();
        assert_eq!(parsed, SectionKind::BalanceSheet);
    }

    #[test]
    fn test_every_section_round_trips_its_keys() {
        for kind in SectionKind::ALL {
            assert_eq!(SectionKind::from_alias(kind.payload_key()), Some(kind));
            assert_eq!(SectionKind::from_alias(kind.file_suffix()), Some(kind));
            assert_eq!(SectionKind::from_alias(kind.as_str()), Some(kind));
        }
    }
}
