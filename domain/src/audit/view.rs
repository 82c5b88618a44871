//! Serialized shapes of audit output.
//!
//! Field names here are the external contract of the audit JSON files.

use crate::statement::{
    BalanceBasis, BalanceStatus, BalanceVerdict, FinancialLineItem, FootingStatus,
    StatementSections,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
pub(crate) struct LineItemView {
    nilai_tercatat: Decimal,
    nilai_perhitungan: Decimal,
    selisih: Decimal,
    status: FootingStatus,
}

impl LineItemView {
    fn new(item: &FinancialLineItem, footing_tolerance: Decimal) -> Self {
        Self {
            nilai_tercatat: item.reported,
            nilai_perhitungan: item.computed,
            selisih: item.difference(),
            status: item.status(footing_tolerance),
        }
    }
}

pub(crate) type SectionsView<'a> = BTreeMap<&'static str, BTreeMap<&'a str, LineItemView>>;

pub(crate) fn sections_view(sections: &StatementSections, footing_tolerance: Decimal) -> SectionsView<'_> {
    sections
        .iter()
        .map(|(kind, items)| {
            let items = items
                .iter()
                .map(|(name, item)| (name.as_str(), LineItemView::new(item, footing_tolerance)))
                .collect();
            (kind.payload_key(), items)
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub(crate) struct BalancingView {
    status: BalanceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_aset: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_liabilitas_ekuitas: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    selisih: Option<Decimal>,
}

impl From<&BalanceVerdict> for BalancingView {
    fn from(verdict: &BalanceVerdict) -> Self {
        match verdict.basis {
            BalanceBasis::Equation {
                total_assets,
                total_liabilities_equity,
                difference,
            } => Self {
                status: verdict.status,
                total_aset: Some(total_assets),
                total_liabilitas_ekuitas: Some(total_liabilities_equity),
                selisih: Some(difference),
            },
            BalanceBasis::Reported | BalanceBasis::Footing => Self {
                status: verdict.status,
                total_aset: None,
                total_liabilitas_ekuitas: None,
                selisih: None,
            },
        }
    }
}
