//! Expected-share helpers.
//!
//! These turn a tag's cumulative bounds back into the probability each slot (or each
//! target) is drawn with, which is what dashboards and convergence tests compare
//! observed traffic against.

use std::collections::BTreeMap;

use crate::{TagDistribution, WeightedGroup};

/// Probability of each slot, in slot order. Sums to 1 (or empty for a zero-mass tag).
pub fn slot_shares(dist: &TagDistribution) -> Vec<(&WeightedGroup, f64)> {
    let mass = dist.total_mass();
    if mass <= 0.0 {
        return Vec::new();
    }
    let mut prev = 0.0;
    dist.groups()
        .iter()
        .map(|g| {
            let width = g.cumulative_bound - prev;
            prev = g.cumulative_bound;
            (g, width / mass)
        })
        .collect()
}

/// Probability that a given target key is part of a draw's result.
///
/// A pooled slot resolves to all of its members at once; for reporting, its share is
/// split evenly between them so that the map still sums to 1.
pub fn target_shares(dist: &TagDistribution) -> BTreeMap<String, f64> {
    let mut out: BTreeMap<String, f64> = BTreeMap::new();
    for (g, p) in slot_shares(dist) {
        if g.targets.is_empty() {
            continue;
        }
        let each = p / g.targets.len() as f64;
        for t in &g.targets {
            *out.entry(t.clone()).or_insert(0.0) += each;
        }
    }
    out
}
