//! Post-processing of raw search results.
//!
//! The search reports every outcome it reaches, often many times over. The
//! three operations here are independent and can be chained in any order:
//! [`deduplicate`] collapses identical outcomes, [`filter_optimal`] keeps the
//! Pareto frontier over the five tier counts and [`sort_results`] ranks what
//! is left by caller-chosen criteria.

use std::cmp::Ordering;
use std::collections::HashMap;

use rayon::prelude::*;

use crate::constants::Tier;
use crate::models::{RestResult, SortKey, UnitCounts};

/// Collapses results with the same outcome signature.
///
/// Of several derivations of one outcome the shortest is kept (the first one
/// seen on ties). Outcomes keep the order of their first appearance.
pub fn deduplicate(results: Vec<RestResult>) -> Vec<RestResult> {
    let mut index: HashMap<(UnitCounts, u32, u32), usize> = HashMap::with_capacity(results.len());
    let mut unique: Vec<RestResult> = Vec::new();

    for result in results {
        match index.get(&result.signature()) {
            Some(&i) => {
                if result.action_count() < unique[i].action_count() {
                    unique[i] = result;
                }
            }
            None => {
                index.insert(result.signature(), unique.len());
                unique.push(result);
            }
        }
    }

    unique
}

/// Keeps only results that no other result dominates.
///
/// `B` dominates `A` when it has at least as many units of every tier and
/// strictly more of at least one. Remaining points and slots are not
/// compared, so outcomes with identical tallies all survive; deduplicate first
/// to avoid carrying copies.
pub fn filter_optimal(results: Vec<RestResult>) -> Vec<RestResult> {
    let keep: Vec<bool> = results
        .par_iter()
        .map(|candidate| {
            !results
                .iter()
                .any(|other| other.units.dominates(&candidate.units))
        })
        .collect();

    results
        .into_iter()
        .zip(keep)
        .filter_map(|(result, keep)| keep.then_some(result))
        .collect()
}

fn compare_key(a: &RestResult, b: &RestResult, key: SortKey) -> Ordering {
    let tier = |t: Tier| b.units.get(t).cmp(&a.units.get(t));
    match key {
        SortKey::Tier5 => tier(Tier::Five),
        SortKey::Tier4 => tier(Tier::Four),
        SortKey::Tier3 => tier(Tier::Three),
        SortKey::Tier2 => tier(Tier::Two),
        SortKey::Tier1 => tier(Tier::One),
        SortKey::TotalUnits => a.total_units().cmp(&b.total_units()),
    }
}

/// Compares two results by `keys` in priority order, then by fewer actions.
pub fn compare_results(a: &RestResult, b: &RestResult, keys: &[SortKey]) -> Ordering {
    keys.iter()
        .map(|&key| compare_key(a, b, key))
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| a.action_count().cmp(&b.action_count()))
}

/// Sorts results in place by `keys` (see [`compare_results`]).
pub fn sort_results(results: &mut [RestResult], keys: &[SortKey]) {
    results.sort_by(|a, b| compare_results(a, b, keys));
}

/// Deduplicates, optionally filters to the optimal frontier, then sorts.
///
/// This is the pipeline every front end runs before showing results.
pub fn reduce(results: Vec<RestResult>, optimal_only: bool, keys: &[SortKey]) -> Vec<RestResult> {
    let unique = deduplicate(results);
    let mut reduced = if optimal_only {
        filter_optimal(unique)
    } else {
        unique
    };
    sort_results(&mut reduced, keys);
    reduced
}
