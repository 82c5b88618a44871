//! Balancing verdict: assets = liabilities + equity.
//!
//! The verdict is a pure function of the final line items. In order of
//! preference it is derived from:
//!
//! 1. the balance-sheet totals (`total_aset` against `total_liabilitas_dan_ekuitas`,
//!    or `total_liabilitas` + `total_ekuitas`), using reported values
//! 2. the balancing check the accepted agent reported
//! 3. whether every line item foots

use super::agent_result::StatementSections;
use super::line_item::{FinancialLineItem, FootingPolicy};
use super::section::SectionKind;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const TOTAL_ASSETS: &[&str] = &["total_aset", "jumlah_aset", "total_assets"];
const TOTAL_LIABILITIES_EQUITY: &[&str] = &[
    "total_liabilitas_dan_ekuitas",
    "total_liabilitas_ekuitas",
    "jumlah_liabilitas_dan_ekuitas",
    "total_liabilities_and_equity",
];
const TOTAL_LIABILITIES: &[&str] = &["total_liabilitas", "jumlah_liabilitas", "total_liabilities"];
const TOTAL_EQUITY: &[&str] = &["total_ekuitas", "jumlah_ekuitas", "total_equity"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceStatus {
    #[serde(rename = "Seimbang")]
    Balanced,
    #[serde(rename = "Tidak Seimbang")]
    Unbalanced,
}

impl BalanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BalanceStatus::Balanced => "Seimbang",
            BalanceStatus::Unbalanced => "Tidak Seimbang",
        }
    }

    pub fn is_balanced(&self) -> bool {
        matches!(self, BalanceStatus::Balanced)
    }

    /// Parse a status as agents write it.
    pub fn parse(text: &str) -> Option<BalanceStatus> {
        let normalized = text.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "seimbang" | "balanced" | "ok" | "true" => Some(BalanceStatus::Balanced),
            "tidak seimbang" | "unbalanced" | "not balanced" | "mismatch" | "false" => {
                Some(BalanceStatus::Unbalanced)
            }
            _ => None,
        }
    }

    fn from_bool(balanced: bool) -> BalanceStatus {
        if balanced {
            BalanceStatus::Balanced
        } else {
            BalanceStatus::Unbalanced
        }
    }
}

impl std::fmt::Display for BalanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Balancing outcome as reported by an agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalancingCheck {
    pub status: Option<BalanceStatus>,
    pub total_assets: Option<Decimal>,
    pub total_liabilities_equity: Option<Decimal>,
}

impl BalancingCheck {
    /// The reported status, or one derived from the reported totals.
    pub fn effective_status(&self, balance_tolerance: Decimal) -> Option<BalanceStatus> {
        if let Some(status) = self.status {
            return Some(status);
        }
        match (self.total_assets, self.total_liabilities_equity) {
            (Some(assets), Some(le)) => {
                let difference = assets.saturating_sub(le);
                Some(BalanceStatus::from_bool(difference.abs() < balance_tolerance))
            }
            _ => None,
        }
    }
}

/// What a [`BalanceVerdict`] was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "basis", rename_all = "snake_case")]
pub enum BalanceBasis {
    Equation {
        total_assets: Decimal,
        total_liabilities_equity: Decimal,
        difference: Decimal,
    },
    Reported,
    Footing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceVerdict {
    pub status: BalanceStatus,
    #[serde(flatten)]
    pub basis: BalanceBasis,
}

impl BalanceVerdict {
    pub fn is_balanced(&self) -> bool {
        self.status.is_balanced()
    }
}

/// Derive the balancing verdict from final line items.
pub fn evaluate_balancing(
    sections: &StatementSections,
    reported: Option<&BalancingCheck>,
    policy: &FootingPolicy,
) -> BalanceVerdict {
    if let Some(balance_sheet) = sections.get(&SectionKind::BalanceSheet)
        && let Some((assets, le)) = balance_sheet_totals(balance_sheet)
    {
        let difference = assets.saturating_sub(le);
        return BalanceVerdict {
            status: BalanceStatus::from_bool(difference.abs() < policy.balance_tolerance),
            basis: BalanceBasis::Equation {
                total_assets: assets,
                total_liabilities_equity: le,
                difference,
            },
        };
    }

    if let Some(status) = reported.and_then(|check| check.effective_status(policy.balance_tolerance))
    {
        return BalanceVerdict {
            status,
            basis: BalanceBasis::Reported,
        };
    }

    let mut items = sections.values().flat_map(|items| items.values()).peekable();
    let any = items.peek().is_some();
    let all_foot = items.all(|item| item.foots(policy.footing_tolerance));
    BalanceVerdict {
        status: BalanceStatus::from_bool(any && all_foot),
        basis: BalanceBasis::Footing,
    }
}

fn balance_sheet_totals(items: &BTreeMap<String, FinancialLineItem>) -> Option<(Decimal, Decimal)> {
    let assets = find_reported(items, TOTAL_ASSETS)?;
    let le = match find_reported(items, TOTAL_LIABILITIES_EQUITY) {
        Some(le) => le,
        None => find_reported(items, TOTAL_LIABILITIES)?
            .checked_add(find_reported(items, TOTAL_EQUITY)?)?,
    };
    Some((assets, le))
}

/// The balance sheet's total-assets line item, if extracted.
pub fn total_assets_item(sections: &StatementSections) -> Option<&FinancialLineItem> {
    sections
        .get(&SectionKind::BalanceSheet)
        .and_then(|items| find_item(items, TOTAL_ASSETS))
}

fn find_reported(items: &BTreeMap<String, FinancialLineItem>, names: &[&str]) -> Option<Decimal> {
    find_item(items, names).map(|item| item.reported)
}

/// First item named by `names`, matching either the whole key or its last
/// path segment.
fn find_item<'a>(
    items: &'a BTreeMap<String, FinancialLineItem>,
    names: &[&str],
) -> Option<&'a FinancialLineItem> {
    names.iter().find_map(|name| {
        items.get(*name).or_else(|| {
            items
                .iter()
                .find(|(key, _)| key.rsplit('.').next() == Some(*name))
                .map(|(_, item)| item)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, reported: i64, computed: i64) -> (String, FinancialLineItem) {
        (
            name.to_string(),
            FinancialLineItem::new(name, Decimal::new(reported, 0), Decimal::new(computed, 0)),
        )
    }

    fn balance_sheet(items: Vec<(String, FinancialLineItem)>) -> StatementSections {
        let mut sections = StatementSections::new();
        sections.insert(SectionKind::BalanceSheet, items.into_iter().collect());
        sections
    }

    #[test]
    fn test_equation_balanced() {
        let sections = balance_sheet(vec![
            item("total_aset", 1_000_000, 1_000_000),
            item("total_liabilitas_dan_ekuitas", 1_000_000, 1_000_000),
        ]);
        let verdict = evaluate_balancing(&sections, None, &FootingPolicy::default());
        assert_eq!(verdict.status, BalanceStatus::Balanced);
        assert!(matches!(
            verdict.basis,
            BalanceBasis::Equation { difference, .. } if difference.is_zero()
        ));
    }

    #[test]
    fn test_equation_from_liabilities_plus_equity() {
        let sections = balance_sheet(vec![
            item("total_aset", 1_000, 1_000),
            item("total_liabilitas", 600, 600),
            item("total_ekuitas", 399, 399),
        ]);
        let verdict = evaluate_balancing(&sections, None, &FootingPolicy::default());
        assert_eq!(verdict.status, BalanceStatus::Unbalanced);
    }

    #[test]
    fn test_equation_overrides_reported_check() {
        let sections = balance_sheet(vec![
            item("aset.total_aset", 500, 500),
            item("total_liabilitas_ekuitas", 500, 500),
        ]);
        let reported = BalancingCheck {
            status: Some(BalanceStatus::Unbalanced),
            ..Default::default()
        };
        let verdict = evaluate_balancing(&sections, Some(&reported), &FootingPolicy::default());
        assert_eq!(verdict.status, BalanceStatus::Balanced);
    }

    #[test]
    fn test_reported_check_used_without_totals() {
        let sections = balance_sheet(vec![item("kas", 10, 12)]);
        let reported = BalancingCheck {
            status: Some(BalanceStatus::Balanced),
            ..Default::default()
        };
        let verdict = evaluate_balancing(&sections, Some(&reported), &FootingPolicy::default());
        assert_eq!(verdict.status, BalanceStatus::Balanced);
        assert_eq!(verdict.basis, BalanceBasis::Reported);
    }

    #[test]
    fn test_footing_fallback() {
        let policy = FootingPolicy::default();
        let footing = balance_sheet(vec![item("kas", 10, 10)]);
        assert!(evaluate_balancing(&footing, None, &policy).is_balanced());

        let mismatch = balance_sheet(vec![item("kas", 10, 12)]);
        let verdict = evaluate_balancing(&mismatch, None, &policy);
        assert_eq!(verdict.status, BalanceStatus::Unbalanced);
        assert_eq!(verdict.basis, BalanceBasis::Footing);

        let empty = StatementSections::new();
        assert!(!evaluate_balancing(&empty, None, &policy).is_balanced());
    }

    #[test]
    fn test_verdict_is_idempotent() {
        let sections = balance_sheet(vec![
            item("total_aset", 1_000, 1_000),
            item("total_liabilitas_dan_ekuitas", 1_000, 1_000),
        ]);
        let policy = FootingPolicy::default();
        let first = evaluate_balancing(&sections, None, &policy);
        let second = evaluate_balancing(&sections, None, &policy);
        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(BalanceStatus::parse("Seimbang"), Some(BalanceStatus::Balanced));
        assert_eq!(BalanceStatus::parse("Tidak Seimbang"), Some(BalanceStatus::Unbalanced));
        assert_eq!(BalanceStatus::parse("tidak_seimbang"), Some(BalanceStatus::Unbalanced));
        assert_eq!(BalanceStatus::parse("maybe"), None);
    }

    #[test]
    fn test_check_derives_status_from_totals() {
        let check = BalancingCheck {
            status: None,
            total_assets: Some(Decimal::new(100, 0)),
            total_liabilities_equity: Some(Decimal::new(100, 0)),
        };
        assert_eq!(
            check.effective_status(Decimal::new(1, 2)),
            Some(BalanceStatus::Balanced)
        );
    }

    #[test]
    fn test_extreme_totals_do_not_overflow() {
        let huge = Decimal::from_scientific("7e28").unwrap();
        let policy = FootingPolicy::default();

        let mut sections = StatementSections::new();
        sections.insert(
            SectionKind::BalanceSheet,
            [
                ("total_aset", huge, huge),
                ("total_liabilitas_dan_ekuitas", -huge, -huge),
            ]
            .into_iter()
            .map(|(name, reported, computed)| {
                (name.to_string(), FinancialLineItem::new(name, reported, computed))
            })
            .collect(),
        );
        let verdict = evaluate_balancing(&sections, None, &policy);
        assert_eq!(verdict.status, BalanceStatus::Unbalanced);
        assert!(matches!(
            verdict.basis,
            BalanceBasis::Equation { difference, .. } if difference == Decimal::MAX
        ));

        // Liabilities + equity overflows: fall through to the footing basis.
        let mut sections = StatementSections::new();
        sections.insert(
            SectionKind::BalanceSheet,
            [
                ("total_aset", huge, huge),
                ("total_liabilitas", huge, huge),
                ("total_ekuitas", huge, huge),
            ]
            .into_iter()
            .map(|(name, reported, computed)| {
                (name.to_string(), FinancialLineItem::new(name, reported, computed))
            })
            .collect(),
        );
        let verdict = evaluate_balancing(&sections, None, &policy);
        assert_eq!(verdict.basis, BalanceBasis::Footing);

        let check = BalancingCheck {
            status: None,
            total_assets: Some(-huge),
            total_liabilities_equity: Some(huge),
        };
        assert_eq!(
            check.effective_status(policy.balance_tolerance),
            Some(BalanceStatus::Unbalanced)
        );
    }

    #[test]
    fn test_total_assets_item_by_last_segment() {
        let sections = balance_sheet(vec![item("aset.total_aset", 900, 900), item("kas", 10, 10)]);
        let total = total_assets_item(&sections).unwrap();
        assert_eq!(total.reported, Decimal::new(900, 0));
        assert!(total_assets_item(&StatementSections::new()).is_none());
    }
}
