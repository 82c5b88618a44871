//! Numeric comparison and amount parsing.
//!
//! - [`comparator`]: tolerance-aware equality over [`rust_decimal::Decimal`]
//! - [`amount`]: parsing amounts out of loosely formatted agent payloads

pub mod amount;
pub mod comparator;

pub use amount::{parse_amount, parse_amount_value};
pub use comparator::{Tolerance, agrees, relative_difference};
