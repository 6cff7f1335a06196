//! Traffic rules: the flat input a control plane hands to [`crate::WeightedSelector::refresh`].

use crate::RuleViolation;

/// One routing rule for a tag.
///
/// - `exclusive = true`: `target_key` owns a fixed `weight` share of the tag's mass.
/// - `exclusive = false`: `target_key` joins the tag's shared pool, which takes whatever
///   mass the exclusive rules leave over. `weight` is ignored (conventionally `0`).
///
/// Several rules may share a `tag_id`; their relative order matters when bounds are
/// accumulated.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrafficRule {
    #[cfg_attr(feature = "serde", serde(alias = "tagId"))]
    pub tag_id: String,
    #[cfg_attr(feature = "serde", serde(alias = "targetKey"))]
    pub target_key: String,
    pub exclusive: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub weight: f64,
}

impl TrafficRule {
    /// A rule reserving `weight` of the tag's mass for `target_key`.
    pub fn exclusive(tag_id: impl Into<String>, target_key: impl Into<String>, weight: f64) -> Self {
        Self {
            tag_id: tag_id.into(),
            target_key: target_key.into(),
            exclusive: true,
            weight,
        }
    }

    /// A rule adding `target_key` to the tag's shared pool.
    pub fn nonexclusive(tag_id: impl Into<String>, target_key: impl Into<String>) -> Self {
        Self {
            tag_id: tag_id.into(),
            target_key: target_key.into(),
            exclusive: false,
            weight: 0.0,
        }
    }

    /// Check the per-rule weight invariant.
    ///
    /// Only exclusive weights are inspected; a pooled rule's weight never reaches the
    /// distribution.
    pub fn validate(&self) -> Result<(), RuleViolation> {
        if self.tag_id.is_empty() {
            return Err(RuleViolation::EmptyTagId);
        }
        if self.target_key.is_empty() {
            return Err(RuleViolation::EmptyTargetKey);
        }
        if self.exclusive {
            if !self.weight.is_finite() {
                return Err(RuleViolation::NonFiniteWeight(self.weight));
            }
            if !(0.0..=1.0).contains(&self.weight) {
                return Err(RuleViolation::WeightOutOfRange(self.weight));
            }
        }
        Ok(())
    }
}
