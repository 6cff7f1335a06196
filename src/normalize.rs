//! Rule normalization: flat rule list → per-tag weighted slots.
//!
//! Per tag, in input order:
//! 1. each exclusive rule becomes a singleton slot with its own weight;
//! 2. if the exclusive weights sum to less than `1`, the pooled (non-exclusive)
//!    targets share one trailing slot of weight `1 - Σexclusive`;
//! 3. slot weights are turned into cumulative bounds by a running prefix sum.
//!
//! When the exclusive weights already reach `1`, the pool has no mass left and its
//! targets are unreachable for that tag.

use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use crate::{Error, Result, TrafficRule, Validation, WeightedGroup};

#[derive(Default)]
struct TagRules<'a> {
    exclusive: Vec<(f64, &'a str)>,
    pool: Vec<&'a str>,
}

/// Group, split and accumulate `rules` into per-tag slot sequences.
///
/// Tags that appear in `rules` always get an entry, even if every slot turned out to
/// have zero weight (such a tag has zero mass). An empty input yields an empty map.
pub fn normalize(
    rules: &[TrafficRule],
    validation: Validation,
) -> Result<BTreeMap<String, Vec<WeightedGroup>>> {
    let mut by_tag: BTreeMap<&str, TagRules<'_>> = BTreeMap::new();
    for (index, rule) in rules.iter().enumerate() {
        if let Err(violation) = rule.validate() {
            match validation {
                Validation::Strict => {
                    return Err(Error::InvalidRule {
                        index,
                        tag_id: rule.tag_id.clone(),
                        target_key: rule.target_key.clone(),
                        violation,
                    });
                }
                Validation::Lenient => {
                    warn!(
                        index,
                        tag_id = %rule.tag_id,
                        target_key = %rule.target_key,
                        %violation,
                        "skipping invalid traffic rule"
                    );
                    continue;
                }
            }
        }
        let entry = by_tag.entry(rule.tag_id.as_str()).or_default();
        if rule.exclusive {
            entry.exclusive.push((rule.weight, rule.target_key.as_str()));
        } else {
            entry.pool.push(rule.target_key.as_str());
        }
    }

    Ok(by_tag
        .into_iter()
        .map(|(tag, tag_rules)| (tag.to_string(), tag_slots(tag, tag_rules)))
        .collect())
}

fn tag_slots(tag: &str, rules: TagRules<'_>) -> Vec<WeightedGroup> {
    let mut weighted: Vec<(f64, Vec<String>)> = Vec::with_capacity(rules.exclusive.len() + 1);
    let mut total_exclusive = 0.0;
    for (w, key) in rules.exclusive {
        weighted.push((w, vec![key.to_string()]));
        total_exclusive += w;
    }

    if !rules.pool.is_empty() {
        if total_exclusive < 1.0 {
            weighted.push((1.0 - total_exclusive, dedup_in_order(&rules.pool)));
        } else {
            warn!(
                tag_id = tag,
                total_exclusive,
                pooled = rules.pool.len(),
                "exclusive weight fills the tag; pooled targets are unreachable"
            );
        }
    }

    // Zero-width slots can never be drawn; skipping them keeps bounds strictly increasing.
    let mut out = Vec::with_capacity(weighted.len());
    let mut bound = 0.0;
    for (w, targets) in weighted {
        let next = bound + w;
        if next > bound {
            bound = next;
            out.push(WeightedGroup::new(bound, targets));
        }
    }
    out
}

fn dedup_in_order(keys: &[&str]) -> Vec<String> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    keys.iter()
        .filter(|k| seen.insert(**k))
        .map(|k| (*k).to_string())
        .collect()
}
