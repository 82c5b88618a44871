//! Map a recovered payload onto [`AgentResult`].
//!
//! The walk tolerates the structural variance seen across agents:
//!
//! - an optional `audit_footing_laporan_keuangan` envelope
//! - key casing and separators (`Total Aset`, `total-aset`, `total_aset`)
//! - arbitrary grouping depth inside a section (`aset` → `aset_lancar` → item)
//! - line items given as named objects or as arrays of `{ "nama_akun": ... }`
//! - a computed value given directly, as a list of components, or both
//!
//! When components are listed, their sum is the computed value. An agent's
//! own computed figure that disagrees with its components is kept only as a
//! warning.

use super::RawPayload;
use super::repair::recover_json;
use crate::core::error::NormalizationError;
use crate::numeric::parse_amount_value;
use crate::statement::{
    AgentResult, BalanceStatus, BalancingCheck, FinancialLineItem, SectionKind, StatementSections,
};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

const ENVELOPE_KEY: &str = "audit_footing_laporan_keuangan";
const BALANCING_KEY: &str = "balancing";

const REPORTED_KEYS: &[&str] = &["nilai_tercatat", "reported", "reported_value"];
const COMPUTED_KEYS: &[&str] = &["nilai_perhitungan", "computed", "computed_value"];
const COMPONENT_LIST_KEYS: &[&str] = &["detail_perhitungan", "components", "details"];
const COMPONENT_VALUE_KEYS: &[&str] = &["nilai", "value", "amount"];
const ITEM_NAME_KEYS: &[&str] = &["nama_akun", "akun", "name"];

const BALANCE_ASSETS_KEYS: &[&str] = &["total_aset", "total_assets"];
const BALANCE_LE_KEYS: &[&str] = &[
    "total_liabilitas_ekuitas",
    "total_liabilitas_dan_ekuitas",
    "total_liabilities_and_equity",
];

/// Normalize a key: trimmed, lower-cased, spaces and hyphens become `_`.
pub fn normalize_key(key: &str) -> String {
    key.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Normalize one agent's payload.
///
/// `expected` lists the sections the document must contain. When the payload
/// carries no recognizable section key and exactly one section is expected,
/// the root object is read as that section.
pub fn normalize(
    agent_id: &str,
    payload: &RawPayload,
    expected: &[SectionKind],
) -> Result<AgentResult, NormalizationError> {
    let value = match payload {
        RawPayload::Structured(Value::String(text)) | RawPayload::Text(text) => {
            recover_json(text).map_err(|reason| NormalizationError::Unparseable { reason })?
        }
        RawPayload::Structured(value) => value.clone(),
    };

    let Value::Object(mut root) = normalize_keys(value) else {
        return Err(NormalizationError::NotAnObject);
    };
    if let Some(Value::Object(inner)) = root.remove(ENVELOPE_KEY) {
        root = inner;
    }

    let mut warnings = Vec::new();
    let mut located: BTreeMap<SectionKind, &Map<String, Value>> = BTreeMap::new();
    for (key, value) in &root {
        if let (Some(kind), Value::Object(section)) = (SectionKind::from_alias(key), value) {
            if !expected.is_empty() && !expected.contains(&kind) {
                warnings.push(format!("ignored unexpected section {}", kind));
                continue;
            }
            located.entry(kind).or_insert(section);
        }
    }
    if located.is_empty()
        && let [only] = expected
    {
        located.insert(*only, &root);
    }

    if let Some(missing) = expected.iter().find(|kind| !located.contains_key(*kind)) {
        return Err(NormalizationError::MissingSection(*missing));
    }

    let mut sections = StatementSections::new();
    let mut balancing = None;
    for (kind, section) in located {
        let mut walker = SectionWalker::default();
        walker.walk(section, &mut Vec::new());

        if kind == SectionKind::BalanceSheet || balancing.is_none() {
            balancing = walker.balancing.or(balancing);
        }
        warnings.extend(
            walker
                .warnings
                .into_iter()
                .map(|warning| format!("{}: {}", kind, warning)),
        );

        let items = qualify_names(walker.found);
        if !items.is_empty() {
            sections.insert(kind, items);
        }
    }

    if balancing.is_none()
        && let Some(Value::Object(check)) = root.get(BALANCING_KEY)
    {
        balancing = parse_balancing(check);
    }

    let result = AgentResult::new(agent_id, sections)
        .with_balancing(balancing)
        .with_warnings(warnings);
    if result.is_empty() {
        return Err(NormalizationError::NoLineItems);
    }
    Ok(result)
}

fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (normalize_key(&key), normalize_keys(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_keys).collect()),
        other => other,
    }
}

struct FoundItem {
    path: Vec<String>,
    item: FinancialLineItem,
}

#[derive(Default)]
struct SectionWalker {
    found: Vec<FoundItem>,
    balancing: Option<BalancingCheck>,
    warnings: Vec<String>,
}

impl SectionWalker {
    fn walk(&mut self, object: &Map<String, Value>, path: &mut Vec<String>) {
        for (key, value) in object {
            if key == BALANCING_KEY {
                if let Value::Object(check) = value
                    && self.balancing.is_none()
                {
                    self.balancing = parse_balancing(check);
                }
                continue;
            }

            match value {
                Value::Object(child) if is_line_item(child) => {
                    self.visit_item(key, child, path);
                }
                Value::Object(child) => {
                    path.push(key.clone());
                    self.walk(child, path);
                    path.pop();
                }
                Value::Array(elements) if !COMPONENT_LIST_KEYS.contains(&key.as_str()) => {
                    path.push(key.clone());
                    for (index, element) in elements.iter().enumerate() {
                        let Value::Object(child) = element else {
                            continue;
                        };
                        let name = item_name(child).unwrap_or_else(|| format!("{}_{}", key, index + 1));
                        if is_line_item(child) {
                            self.visit_item(&name, child, path);
                        } else {
                            path.push(name);
                            self.walk(child, path);
                            path.pop();
                        }
                    }
                    path.pop();
                }
                _ => {}
            }
        }
    }

    fn visit_item(&mut self, name: &str, object: &Map<String, Value>, path: &[String]) {
        let Some(reported) = first_amount(object, REPORTED_KEYS) else {
            self.warnings
                .push(format!("skipped {}: reported value is not numeric", name));
            return;
        };
        let claimed = first_amount(object, COMPUTED_KEYS);
        let computed = match (component_sum(object), claimed) {
            (Some(sum), Some(claimed)) if sum != claimed => {
                self.warnings.push(format!(
                    "{}: components sum to {}, not the stated {}",
                    name, sum, claimed
                ));
                sum
            }
            (Some(sum), _) => sum,
            (None, Some(claimed)) => claimed,
            (None, None) => {
                self.warnings
                    .push(format!("skipped {}: computed value is missing", name));
                return;
            }
        };
        if computed.checked_sub(reported).is_none() {
            self.warnings
                .push(format!("skipped {}: amounts out of range", name));
            return;
        }
        self.found.push(FoundItem {
            path: path.to_vec(),
            item: FinancialLineItem::new(name, reported, computed),
        });
    }
}

fn is_line_item(object: &Map<String, Value>) -> bool {
    REPORTED_KEYS.iter().any(|key| object.contains_key(*key))
}

fn item_name(object: &Map<String, Value>) -> Option<String> {
    ITEM_NAME_KEYS
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_str))
        .map(normalize_key)
        .filter(|name| !name.is_empty())
}

fn first_amount(object: &Map<String, Value>, keys: &[&str]) -> Option<Decimal> {
    keys.iter()
        .find_map(|key| object.get(*key).filter(|value| !value.is_null()))
        .and_then(parse_amount_value)
}

/// Sum of a component list; `None` if the list is absent, empty or has an
/// unreadable entry.
fn component_sum(object: &Map<String, Value>) -> Option<Decimal> {
    let components = COMPONENT_LIST_KEYS
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_array))?;
    if components.is_empty() {
        return None;
    }
    components.iter().try_fold(Decimal::ZERO, |sum, component| {
        let amount = match component {
            Value::Object(entry) => first_amount(entry, COMPONENT_VALUE_KEYS)?,
            other => parse_amount_value(other)?,
        };
        sum.checked_add(amount)
    })
}

fn parse_balancing(object: &Map<String, Value>) -> Option<BalancingCheck> {
    let status = match object.get("status") {
        Some(Value::String(text)) => BalanceStatus::parse(text),
        Some(Value::Bool(true)) => Some(BalanceStatus::Balanced),
        Some(Value::Bool(false)) => Some(BalanceStatus::Unbalanced),
        _ => None,
    };
    let check = BalancingCheck {
        status,
        total_assets: first_amount(object, BALANCE_ASSETS_KEYS),
        total_liabilities_equity: first_amount(object, BALANCE_LE_KEYS),
    };
    (check != BalancingCheck::default()).then_some(check)
}

/// Key items by name, qualifying names that occur more than once with their
/// parent path.
fn qualify_names(found: Vec<FoundItem>) -> BTreeMap<String, FinancialLineItem> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for entry in &found {
        *counts.entry(entry.item.name.clone()).or_default() += 1;
    }

    let mut items = BTreeMap::new();
    for FoundItem { path, mut item } in found {
        let mut name = if counts[&item.name] > 1 && !path.is_empty() {
            format!("{}.{}", path.join("."), item.name)
        } else {
            item.name.clone()
        };
        let base = name.clone();
        let mut suffix = 2;
        while items.contains_key(&name) {
            name = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        item.name = name.clone();
        items.insert(name, item);
    }
    items
}
