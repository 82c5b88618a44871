//! Tolerance-based equality over decimal amounts.
//!
//! Two amounts agree when their relative difference
//! `|a - b| / max(|a|, |b|)` does not exceed the tolerance. The comparison is
//! inclusive: a difference of exactly the tolerance still agrees. It is
//! evaluated as `|a - b| <= tolerance * max(|a|, |b|)`, so no quotient is
//! rounded at the boundary.
//!
//! All arithmetic is done on [`Decimal`] (28 significant digits), so totals in
//! the order of 10^15 keep their cent-level digits.

use crate::core::error::DomainError;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Relative difference between two amounts, for reporting.
///
/// Returns zero when both amounts are zero. The result is symmetric in its
/// arguments and never exceeds 2 (opposite signs, equal magnitude).
pub fn relative_difference(a: Decimal, b: Decimal) -> Decimal {
    if a.is_zero() && b.is_zero() {
        return Decimal::ZERO;
    }

    let scale = a.abs().max(b.abs());

    // Only amounts near Decimal::MAX with opposite signs can overflow here,
    // and those are as far apart as two amounts can be.
    a.checked_sub(b)
        .and_then(|diff| diff.abs().checked_div(scale))
        .unwrap_or(Decimal::TWO)
}

/// Check whether two amounts agree within `tolerance`.
///
/// # Example
///
/// ```
/// use footing_domain::numeric::agrees;
/// use rust_decimal::Decimal;
///
/// let tolerance = Decimal::new(1, 4); // 0.0001
/// assert!(agrees(Decimal::new(10_000, 0), Decimal::new(9_999, 0), tolerance));
/// assert!(!agrees(Decimal::new(10_000, 0), Decimal::new(9_998, 0), tolerance));
/// ```
pub fn agrees(a: Decimal, b: Decimal, tolerance: Decimal) -> bool {
    let scale = a.abs().max(b.abs());
    match (a.checked_sub(b), tolerance.checked_mul(scale)) {
        (Some(diff), Some(allowed)) => diff.abs() <= allowed,
        // The allowance exceeds any representable difference.
        (Some(_), None) => true,
        (None, Some(_)) => false,
        (None, None) => relative_difference(a, b) <= tolerance,
    }
}

/// Non-negative relative tolerance used for consensus comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tolerance(Decimal);

impl Tolerance {
    /// 0.01%: strict consensus.
    pub const DEFAULT: Tolerance = Tolerance(Decimal::from_parts(1, 0, 0, false, 4));

    /// Create a tolerance, rejecting negative values.
    pub fn new(value: Decimal) -> Result<Self, DomainError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(DomainError::InvalidTolerance(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Create a tolerance from a float configuration value.
    ///
    /// The float is converted through its shortest decimal representation, so
    /// `0.0001` becomes exactly `0.0001` rather than its binary approximation.
    pub fn from_f64(value: f64) -> Result<Self, DomainError> {
        if !value.is_finite() {
            return Err(DomainError::InvalidTolerance(value.to_string()));
        }
        let decimal = Decimal::from_str(&value.to_string())
            .or_else(|_| Decimal::from_scientific(&format!("{:e}", value)))
            .map_err(|_| DomainError::InvalidTolerance(value.to_string()))?;
        Self::new(decimal)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Check whether two amounts agree under this tolerance.
    pub fn admits(&self, a: Decimal, b: Decimal) -> bool {
        agrees(a, b, self.0)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for Tolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Tolerance {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim())
            .or_else(|_| Decimal::from_scientific(s.trim()))
            .map_err(|_| DomainError::InvalidTolerance(s.to_string()))?;
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_both_zero_agree() {
        assert!(agrees(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO));
        assert_eq!(relative_difference(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_zero_against_nonzero_disagrees() {
        assert!(!agrees(Decimal::ZERO, dec("0.01"), Tolerance::DEFAULT.value()));
        assert_eq!(relative_difference(Decimal::ZERO, dec("5")), Decimal::ONE);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let tolerance = Tolerance::DEFAULT.value();
        // 1 / 10000 = 0.0001 exactly
        assert!(agrees(dec("10000"), dec("9999"), tolerance));
        // 1.0001 / 10000 = 0.00010001
        assert!(!agrees(dec("10000"), dec("9998.9999"), tolerance));
    }

    #[test]
    fn test_boundary_is_exact_beyond_quotient_precision() {
        let tolerance = dec("0.0001");
        assert!(agrees(dec("3"), dec("2.9997"), tolerance));
        // 0.0003 + 1e-28 over 3 exceeds the tolerance by less than the last
        // digit a 28-place quotient can hold.
        assert!(!agrees(dec("3"), dec("2.9996999999999999999999999999"), tolerance));
        assert!(!agrees(dec("2.9996999999999999999999999999"), dec("3"), tolerance));
    }

    #[test]
    fn test_extreme_values_do_not_overflow() {
        assert!(!agrees(Decimal::MAX, Decimal::MIN, Tolerance::DEFAULT.value()));
        assert!(agrees(Decimal::MAX, Decimal::MIN, dec("2")));
        assert!(agrees(Decimal::MAX, Decimal::MAX, Decimal::ZERO));
        assert!(agrees(dec("1"), dec("-1"), dec("1000")));
    }

    #[test]
    fn test_symmetry() {
        let tolerance = dec("0.0001");
        let pairs = [
            ("1000000", "1000100"),
            ("-250.75", "250.75"),
            ("0", "0.0000001"),
            ("123456789012345.67", "123456789012345.68"),
            ("10000", "9999"),
        ];
        for (a, b) in pairs {
            let (a, b) = (dec(a), dec(b));
            assert_eq!(agrees(a, b, tolerance), agrees(b, a, tolerance));
            assert_eq!(relative_difference(a, b), relative_difference(b, a));
        }
    }

    #[test]
    fn test_large_totals_keep_cent_precision() {
        // One cent on 10^15 is far below 0.01%, but must not vanish either.
        let a = dec("1000000000000000.00");
        let b = dec("1000000000000000.01");
        assert!(relative_difference(a, b) > Decimal::ZERO);
        assert!(agrees(a, b, Tolerance::DEFAULT.value()));
        assert!(!agrees(a, b, Decimal::ZERO));
    }

    #[test]
    fn test_opposite_signs_are_far_apart() {
        assert_eq!(relative_difference(dec("100"), dec("-100")), Decimal::TWO);
        assert_eq!(relative_difference(Decimal::MAX, Decimal::MIN), Decimal::TWO);
    }

    #[test]
    fn test_tolerance_rejects_negative() {
        assert!(Tolerance::new(dec("-0.1")).is_err());
        assert!(Tolerance::new(Decimal::ZERO).is_ok());
        assert!("-1".parse::<Tolerance>().is_err());
    }

    #[test]
    fn test_tolerance_from_f64_is_exact() {
        let tolerance = Tolerance::from_f64(0.0001).unwrap();
        assert_eq!(tolerance, Tolerance::DEFAULT);
        assert!(Tolerance::from_f64(f64::NAN).is_err());
    }

    #[test]
    fn test_tolerance_parse() {
        assert_eq!("0.0001".parse::<Tolerance>().unwrap(), Tolerance::DEFAULT);
        assert_eq!("1e-4".parse::<Tolerance>().unwrap(), Tolerance::DEFAULT);
        assert!("abc".parse::<Tolerance>().is_err());
    }
}
