//! Immutable routing tables and the per-tag cumulative-weight index.
//!
//! A [`TagDistribution`] is a sorted array of `(cumulative_bound, targets)` slots.
//! A draw `r` on `[0, total_mass)` resolves to the first slot whose bound is
//! strictly greater than `r`, so slot `i` covers `[bound[i-1], bound[i])` and a draw
//! landing exactly on `bound[i]` belongs to slot `i + 1`.

use std::collections::BTreeMap;

/// One slot of a tag's distribution.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightedGroup {
    /// Upper edge of this slot on the tag's running mass scale.
    pub cumulative_bound: f64,
    /// Targets the slot resolves to: one key for an exclusive rule, the whole pool otherwise.
    pub targets: Vec<String>,
}

impl WeightedGroup {
    pub fn new(cumulative_bound: f64, targets: Vec<String>) -> Self {
        Self {
            cumulative_bound,
            targets,
        }
    }
}

/// Lookup structure for one tag: slots sorted by strictly increasing bound.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TagDistribution {
    groups: Vec<WeightedGroup>,
}

impl TagDistribution {
    /// Build from slots already sorted by strictly increasing `cumulative_bound`.
    ///
    /// [`crate::normalize`] produces slots in that shape; anything else is a caller bug.
    pub fn from_sorted(groups: Vec<WeightedGroup>) -> Self {
        debug_assert!(
            groups
                .windows(2)
                .all(|w| w[0].cumulative_bound < w[1].cumulative_bound),
            "bounds must strictly increase"
        );
        Self { groups }
    }

    pub fn groups(&self) -> &[WeightedGroup] {
        &self.groups
    }

    /// The last bound, or `0.0` for a tag with no reachable slot.
    pub fn total_mass(&self) -> f64 {
        self.groups.last().map_or(0.0, |g| g.cumulative_bound)
    }

    /// Resolve a draw already scaled to this tag's mass.
    ///
    /// Returns `None` when `r` is outside `[0, total_mass)` (which includes every `r`
    /// for a zero-mass tag).
    pub fn pick_at(&self, r: f64) -> Option<&[String]> {
        let mass = self.total_mass();
        if !(r >= 0.0 && r < mass) {
            return None;
        }
        let idx = self.groups.partition_point(|g| g.cumulative_bound <= r);
        self.groups.get(idx).map(|g| g.targets.as_slice())
    }

    /// Resolve a uniform draw `u` on `[0, 1)` by scaling it to this tag's mass.
    ///
    /// Returns `None` only for a zero-mass tag.
    pub fn pick_unit(&self, u: f64) -> Option<&[String]> {
        let mass = self.total_mass();
        if mass <= 0.0 || self.groups.is_empty() {
            return None;
        }
        let r = u.clamp(0.0, 1.0) * mass;
        // `u * mass` can round up to `mass` itself; that draw belongs to the last slot.
        let idx = self
            .groups
            .partition_point(|g| g.cumulative_bound <= r)
            .min(self.groups.len() - 1);
        Some(self.groups[idx].targets.as_slice())
    }
}

/// One published snapshot: every configured tag and its distribution.
///
/// Built once per refresh and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoutingTable {
    revision: u64,
    tags: BTreeMap<String, TagDistribution>,
}

impl RoutingTable {
    /// Compile normalized per-tag slots into a table stamped with `revision`.
    pub fn compile(groups: BTreeMap<String, Vec<WeightedGroup>>, revision: u64) -> Self {
        let tags = groups
            .into_iter()
            .map(|(tag, slots)| (tag, TagDistribution::from_sorted(slots)))
            .collect();
        Self { revision, tags }
    }

    /// Publish counter of the selector that built this table (`0` for the initial empty table).
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, tag_id: &str) -> Option<&TagDistribution> {
        self.tags.get(tag_id)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
