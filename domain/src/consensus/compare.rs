//! Field-by-field comparison of agent results.

use super::field::ConsensusField;
use crate::numeric::{Tolerance, relative_difference};
use crate::statement::{AgentResult, BalancingCheck, FinancialLineItem};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

/// Balancing figures compared alongside the line items, keyed as they
/// appear among the consensus fields.
const BALANCING_FIGURES: &[(&str, fn(&BalancingCheck) -> Option<Decimal>)] = &[
    ("balancing.total_aset", |check| check.total_assets),
    ("balancing.total_liabilitas_ekuitas", |check| check.total_liabilities_equity),
];

/// Compare agent results field by field.
///
/// Fields are the union of all results' flat fields, so a field reported by
/// some agents only is present in the output and does not agree. For fields
/// every agent reported, all pairs of agents are compared on both the
/// reported and the computed value.
///
/// The totals of the agents' balancing checks are compared too, between the
/// agents that stated them. An agent that left out its balancing check does
/// not break agreement on these figures.
///
/// The comparison does not decide whether to accept the round.
pub fn compare(results: &[AgentResult], tolerance: Tolerance) -> BTreeMap<String, ConsensusField> {
    let flats: Vec<BTreeMap<String, &FinancialLineItem>> =
        results.iter().map(AgentResult::fields).collect();
    let agents: Vec<String> = results.iter().map(|r| r.agent_id().to_string()).collect();
    let names: BTreeSet<&String> = flats.iter().flat_map(|flat| flat.keys()).collect();

    let mut fields: BTreeMap<String, ConsensusField> = names
        .into_iter()
        .map(|name| {
            let items: Vec<Option<&FinancialLineItem>> =
                flats.iter().map(|flat| flat.get(name).copied()).collect();
            let field = compare_field(name, &agents, &items, tolerance);
            (name.clone(), field)
        })
        .collect();

    for (name, figure) in BALANCING_FIGURES {
        let values: Vec<Option<Decimal>> = results
            .iter()
            .map(|result| result.balancing().and_then(figure))
            .collect();
        if values.iter().any(Option::is_some) {
            let field = compare_figure(name, &agents, values, tolerance);
            fields.insert(name.to_string(), field);
        }
    }
    fields
}

fn compare_field(
    name: &str,
    agents: &[String],
    items: &[Option<&FinancialLineItem>],
    tolerance: Tolerance,
) -> ConsensusField {
    let reported: Vec<Option<Decimal>> = items.iter().map(|i| i.map(|i| i.reported)).collect();
    let computed: Vec<Option<Decimal>> = items.iter().map(|i| i.map(|i| i.computed)).collect();

    let present: Option<Vec<&FinancialLineItem>> = items.iter().copied().collect();
    let (max_relative_difference, agrees) = match present {
        Some(present) => {
            let pairs: Vec<(Decimal, Decimal)> =
                present.iter().map(|item| (item.reported, item.computed)).collect();
            let (max, agrees) = pairwise(&pairs, tolerance);
            (Some(max), agrees)
        }
        None => (None, false),
    };

    ConsensusField {
        name: name.to_string(),
        agents: agents.to_vec(),
        reported,
        computed,
        max_relative_difference,
        agrees,
    }
}

/// A single stated figure: reported and computed are the same value.
fn compare_figure(
    name: &str,
    agents: &[String],
    values: Vec<Option<Decimal>>,
    tolerance: Tolerance,
) -> ConsensusField {
    let pairs: Vec<(Decimal, Decimal)> = values.iter().flatten().map(|v| (*v, *v)).collect();
    let (max, agrees) = pairwise(&pairs, tolerance);

    ConsensusField {
        name: name.to_string(),
        agents: agents.to_vec(),
        reported: values.clone(),
        computed: values,
        max_relative_difference: Some(max),
        agrees,
    }
}

/// Largest relative difference over all pairs, and whether every pair agrees
/// on both values.
fn pairwise(values: &[(Decimal, Decimal)], tolerance: Tolerance) -> (Decimal, bool) {
    let mut max = Decimal::ZERO;
    let mut agrees = true;
    for (i, a) in values.iter().enumerate() {
        for b in &values[i + 1..] {
            for (x, y) in [(a.0, b.0), (a.1, b.1)] {
                max = max.max(relative_difference(x, y));
                agrees &= tolerance.admits(x, y);
            }
        }
    }
    (max, agrees)
}
