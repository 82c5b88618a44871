//! Amount parsing for agent payloads.
//!
//! Agents report amounts as JSON numbers or as formatted strings. Numbers are
//! read from their exact textual form, never through `f64`.

use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Parse a JSON value into a decimal amount.
///
/// Returns `None` for anything that is not a number or a numeric string.
pub fn parse_amount_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => parse_plain(&number.to_string()),
        Value::String(text) => parse_amount(text),
        _ => None,
    }
}

/// Parse a formatted amount string.
///
/// Accepted forms:
/// - plain and scientific numbers: `1234.5`, `1.2345e3`
/// - thousands grouping with either separator: `1,234,567`, `1.234.567`
/// - a decimal comma after dot grouping: `1.234.567,89`
/// - a currency prefix: `Rp 1,000`
/// - accounting negatives: `(1,234)` → `-1234`
///
/// When only one separator occurs, it groups thousands if it repeats or if it
/// splits 1-3 leading digits from exactly three trailing ones (`1.500`).
/// Otherwise it is the decimal point (`1234.5`, `0.125`). Grouping that does
/// not resolve to one reading yields `None`.
///
/// # Example
///
/// ```
/// use footing_domain::numeric::parse_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_amount("(1,250)"), Some(Decimal::new(-1250, 0)));
/// assert_eq!(parse_amount("Rp 1.500.000"), Some(Decimal::new(1_500_000, 0)));
/// assert_eq!(parse_amount("1.234.567,89"), Some(Decimal::new(123_456_789, 2)));
/// assert_eq!(parse_amount("n/a"), None);
/// ```
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let mut s = text.trim();

    let mut negative = false;
    if let Some(inner) = s.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
        negative = true;
        s = inner.trim();
    }

    if s.get(..2).is_some_and(|prefix| prefix.eq_ignore_ascii_case("rp")) {
        s = s[2..].trim_start_matches('.').trim();
    }

    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, '_' | ' ' | '\u{a0}'))
        .collect();
    let (sign, body) = match cleaned.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", cleaned.strip_prefix('+').unwrap_or(cleaned.as_str())),
    };

    let plain = if body.contains(['e', 'E']) {
        body.to_string()
    } else {
        resolve_separators(body)?
    };

    let value = parse_plain(&format!("{}{}", sign, plain))?;
    Some(if negative { -value } else { value })
}

/// Rewrite grouped digits into plain `1234.56` form.
fn resolve_separators(body: &str) -> Option<String> {
    let (decimal, thousands) = match (body.rfind('.'), body.rfind(',')) {
        (None, None) => return Some(body.to_string()),
        (Some(dot), Some(comma)) if dot > comma => (Some('.'), ','),
        (Some(_), Some(_)) => (Some(','), '.'),
        (Some(_), None) => single_separator(body, '.'),
        (None, Some(_)) => single_separator(body, ','),
    };

    let (int, fraction) = match decimal {
        Some(separator) => {
            let (int, fraction) = body.rsplit_once(separator)?;
            if int.contains(separator) {
                return None;
            }
            (int, Some(fraction))
        }
        None => (body, None),
    };

    let mut plain = ungroup(int, thousands)?;
    if let Some(fraction) = fraction {
        if fraction.is_empty() || !is_digits(fraction) {
            return None;
        }
        if plain.is_empty() {
            plain.push('0');
        }
        plain.push('.');
        plain.push_str(fraction);
    }
    Some(plain)
}

/// Decide the role of the only separator kind present in `body`.
///
/// Returns the decimal separator, if any, and the thousands separator.
fn single_separator(body: &str, separator: char) -> (Option<char>, char) {
    let other = if separator == '.' { ',' } else { '.' };
    let groups_thousands = match body.split_once(separator) {
        Some((int, fraction)) if !fraction.contains(separator) => {
            (1..=3).contains(&int.len()) && !int.starts_with('0') && fraction.len() == 3
        }
        _ => true,
    };
    if groups_thousands {
        (None, separator)
    } else {
        (Some(separator), other)
    }
}

/// Strip thousands separators, checking the 3-digit grouping.
fn ungroup(int: &str, separator: char) -> Option<String> {
    let groups: Vec<&str> = int.split(separator).collect();
    let valid = match groups.as_slice() {
        [only] => is_digits(only),
        [first, rest @ ..] => {
            (1..=3).contains(&first.len())
                && is_digits(first)
                && rest.iter().all(|group| group.len() == 3 && is_digits(group))
        }
        [] => false,
    };
    valid.then(|| groups.concat())
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_plain(s: &str) -> Option<Decimal> {
    if s.is_empty() || s == "-" || s == "+" {
        return None;
    }
    Decimal::from_str_exact(s)
        .or_else(|_| Decimal::from_str(s))
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}
