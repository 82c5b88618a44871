//! Line items and footing status.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether a line item's reported total matches its recomputed total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FootingStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "MISMATCH")]
    Mismatch,
}

impl FootingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FootingStatus::Ok => "OK",
            FootingStatus::Mismatch => "MISMATCH",
        }
    }
}

impl std::fmt::Display for FootingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named amount as stated in the document (`reported`) and as recomputed
/// from its constituents (`computed`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialLineItem {
    pub name: String,
    pub reported: Decimal,
    pub computed: Decimal,
}

impl FinancialLineItem {
    pub fn new(name: impl Into<String>, reported: Decimal, computed: Decimal) -> Self {
        Self {
            name: name.into(),
            reported,
            computed,
        }
    }

    /// `computed − reported`, saturating at the bounds of [`Decimal`].
    pub fn difference(&self) -> Decimal {
        self.computed.saturating_sub(self.reported)
    }

    /// A line item foots when `|difference| < tolerance`.
    pub fn foots(&self, tolerance: Decimal) -> bool {
        self.difference().abs() < tolerance
    }

    pub fn status(&self, tolerance: Decimal) -> FootingStatus {
        if self.foots(tolerance) {
            FootingStatus::Ok
        } else {
            FootingStatus::Mismatch
        }
    }
}

/// Tolerances applied when judging the final data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FootingPolicy {
    /// Largest absolute `computed − reported` gap (exclusive) still counted as footing.
    pub footing_tolerance: Decimal,
    /// Largest absolute `assets − (liabilities + equity)` gap (exclusive) still balanced.
    pub balance_tolerance: Decimal,
}

impl Default for FootingPolicy {
    fn default() -> Self {
        Self {
            footing_tolerance: Decimal::ONE,
            balance_tolerance: Decimal::new(1, 2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difference_is_computed_minus_reported() {
        let item = FinancialLineItem::new("total_aset", Decimal::new(1000, 0), Decimal::new(1003, 0));
        assert_eq!(item.difference(), Decimal::new(3, 0));
    }

    #[test]
    fn test_footing_threshold_is_exclusive() {
        let tolerance = FootingPolicy::default().footing_tolerance;
        let within = FinancialLineItem::new("kas", Decimal::new(100, 0), Decimal::new(10099, 2));
        let at = FinancialLineItem::new("kas", Decimal::new(100, 0), Decimal::new(101, 0));
        assert_eq!(within.status(tolerance), FootingStatus::Ok);
        assert_eq!(at.status(tolerance), FootingStatus::Mismatch);
    }

    #[test]
    fn test_extreme_amounts_do_not_overflow() {
        let huge = Decimal::from_scientific("7e28").unwrap();
        let item = FinancialLineItem::new("kas", huge, -huge);
        assert_eq!(item.difference(), Decimal::MIN);
        assert_eq!(item.status(Decimal::ONE), FootingStatus::Mismatch);

        let item = FinancialLineItem::new("kas", -huge, huge);
        assert_eq!(item.difference(), Decimal::MAX);
        assert!(!item.foots(Decimal::ONE));
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_string(&FootingStatus::Ok).unwrap(), "\"OK\"");
        assert_eq!(
            serde_json::to_string(&FootingStatus::Mismatch).unwrap(),
            "\"MISMATCH\""
        );
    }
}
