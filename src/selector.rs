//! The weighted selector: the active routing table plus the draw.
//!
//! ```text
//! selector.refresh(&rules)?;          // control plane, whenever the feed changes
//! let targets = selector.select(tag); // data plane, any number of threads
//! ```
//!
//! The active [`RoutingTable`] lives behind an [`ArcSwap`]. `refresh` builds a new
//! table off to the side and publishes it with a single pointer swap; `select` takes a
//! lock-free snapshot, so in-flight draws finish on whichever table they loaded.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use rand::Rng;
use tracing::{debug, warn};

use crate::{
    normalize, stable_hash64, target_shares, unit_interval, Result, RoutingTable, SelectorConfig,
    TrafficRule,
};

/// What a call to [`WeightedSelector::refresh`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new table was built and published.
    Published { revision: u64, tags: usize },
    /// The feed produced no tags; the table at `revision` stays active.
    SkippedEmpty { revision: u64 },
}

/// Per-tag weighted target selection over a hot-swappable routing table.
#[derive(Debug)]
pub struct WeightedSelector {
    cfg: SelectorConfig,
    table: ArcSwap<RoutingTable>,
    revision: AtomicU64,
}

impl WeightedSelector {
    /// A selector with an empty table: every `select` returns nothing until the first refresh.
    pub fn new(cfg: SelectorConfig) -> Self {
        Self {
            cfg,
            table: ArcSwap::from_pointee(RoutingTable::default()),
            revision: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.cfg
    }

    /// Replace the active table with one built from `rules`.
    ///
    /// - Invalid rules fail the call under [`crate::Validation::Strict`]; the active
    ///   table is left untouched.
    /// - A feed that yields no tags is skipped rather than published, so an empty or
    ///   broken upstream never wipes out the current routing.
    /// - Overlapping refreshes each publish atomically; if they race, the one with the
    ///   higher revision stays active.
    pub fn refresh(&self, rules: &[TrafficRule]) -> Result<RefreshOutcome> {
        let groups = normalize(rules, self.cfg.validation)?;
        if groups.is_empty() {
            let revision = self.revision();
            warn!(revision, rules = rules.len(), "rule feed produced no tags; keeping active table");
            return Ok(RefreshOutcome::SkippedEmpty { revision });
        }

        let revision = self.revision.fetch_add(1, Ordering::AcqRel) + 1;
        let table = Arc::new(RoutingTable::compile(groups, revision));
        let tags = table.len();
        self.table.rcu(|current| {
            if current.revision() > revision {
                Arc::clone(current)
            } else {
                Arc::clone(&table)
            }
        });
        debug!(revision, tags, rules = rules.len(), "published routing table");
        Ok(RefreshOutcome::Published { revision, tags })
    }

    /// Draw targets for `tag_id` using the thread-local RNG.
    ///
    /// Empty when the tag is not configured or has zero mass.
    pub fn select(&self, tag_id: &str) -> Vec<String> {
        self.select_with(tag_id, &mut rand::rng())
    }

    /// Draw targets for `tag_id` from a caller-provided RNG (seed it for reproducible tests).
    pub fn select_with<R: Rng>(&self, tag_id: &str, rng: &mut R) -> Vec<String> {
        let table = self.table.load();
        let Some(dist) = table.get(tag_id) else {
            return Vec::new();
        };
        if dist.total_mass() <= 0.0 {
            return Vec::new();
        }
        let u: f64 = rng.random();
        dist.pick_unit(u).map(<[String]>::to_vec).unwrap_or_default()
    }

    /// Deterministic draw keyed by `key` (e.g. a user or request id).
    ///
    /// The same key keeps landing on the same slot for as long as the tag's bounds
    /// don't move, which gives sticky assignment without per-key state.
    pub fn select_keyed(&self, tag_id: &str, key: &str) -> Vec<String> {
        let table = self.table.load();
        let Some(dist) = table.get(tag_id) else {
            return Vec::new();
        };
        let u = unit_interval(stable_hash64(stable_hash64(self.cfg.seed, tag_id), key));
        dist.pick_unit(u).map(<[String]>::to_vec).unwrap_or_default()
    }

    /// Expected per-target share for `tag_id` under the active table.
    pub fn shares(&self, tag_id: &str) -> BTreeMap<String, f64> {
        self.table
            .load()
            .get(tag_id)
            .map(target_shares)
            .unwrap_or_default()
    }

    /// The active table. Holding it keeps that table alive across later refreshes.
    pub fn snapshot(&self) -> Arc<RoutingTable> {
        self.table.load_full()
    }

    /// Revision of the active table (`0` before the first publish).
    pub fn revision(&self) -> u64 {
        self.table.load().revision()
    }
}

impl Default for WeightedSelector {
    fn default() -> Self {
        Self::new(SelectorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Validation};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn demo_rules() -> Vec<TrafficRule> {
        vec![
            TrafficRule::exclusive("t", "a", 0.5),
            TrafficRule::exclusive("t", "b", 0.5),
        ]
    }

    #[test]
    fn fresh_selector_returns_nothing() {
        let s = WeightedSelector::default();
        assert!(s.select("t").is_empty());
        assert_eq!(s.revision(), 0);
        assert!(s.snapshot().is_empty());
    }

    #[test]
    fn refresh_publishes_and_bumps_revision() {
        let s = WeightedSelector::default();
        let out = s.refresh(&demo_rules()).unwrap();
        assert_eq!(out, RefreshOutcome::Published { revision: 1, tags: 1 });
        assert_eq!(s.revision(), 1);
        let picked = s.select("t");
        assert!(picked == vec!["a"] || picked == vec!["b"], "{picked:?}");
    }

    #[test]
    fn empty_refresh_keeps_previous_table() {
        let s = WeightedSelector::default();
        s.refresh(&demo_rules()).unwrap();
        let before = s.snapshot();
        let out = s.refresh(&[]).unwrap();
        assert_eq!(out, RefreshOutcome::SkippedEmpty { revision: 1 });
        assert!(Arc::ptr_eq(&before, &s.snapshot()));
    }

    #[test]
    fn invalid_refresh_keeps_previous_table() {
        let s = WeightedSelector::default();
        s.refresh(&demo_rules()).unwrap();
        let err = s
            .refresh(&[TrafficRule::exclusive("t", "x", 2.0)])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRule { index: 0, .. }));
        assert_eq!(s.revision(), 1);
        assert!(s.snapshot().get("t").is_some());
    }

    #[test]
    fn lenient_refresh_of_only_invalid_rules_is_a_no_op() {
        let s = WeightedSelector::new(SelectorConfig::default().with_validation(Validation::Lenient));
        s.refresh(&demo_rules()).unwrap();
        let out = s.refresh(&[TrafficRule::exclusive("t", "x", -1.0)]).unwrap();
        assert_eq!(out, RefreshOutcome::SkippedEmpty { revision: 1 });
    }

    #[test]
    fn zero_mass_tag_selects_nothing() {
        let s = WeightedSelector::default();
        s.refresh(&[TrafficRule::exclusive("z", "a", 0.0)]).unwrap();
        assert!(s.snapshot().get("z").is_some());
        assert!(s.select("z").is_empty());
        assert!(s.select_keyed("z", "user-1").is_empty());
        assert!(s.shares("z").is_empty());
    }

    #[test]
    fn seeded_draws_are_reproducible() {
        let s = WeightedSelector::default();
        s.refresh(&demo_rules()).unwrap();
        let mut r1 = StdRng::seed_from_u64(42);
        let mut r2 = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            assert_eq!(s.select_with("t", &mut r1), s.select_with("t", &mut r2));
        }
    }

    #[test]
    fn keyed_draws_are_sticky() {
        let s = WeightedSelector::new(SelectorConfig::default().with_seed(7));
        s.refresh(&demo_rules()).unwrap();
        for i in 0..50 {
            let key = format!("user-{i}");
            let first = s.select_keyed("t", &key);
            assert!(!first.is_empty());
            assert_eq!(first, s.select_keyed("t", &key));
        }
    }
}
