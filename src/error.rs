//! Error types.
//!
//! Only malformed input is an error. An empty rule list, an unknown tag, or a tag
//! with zero configured mass are ordinary outcomes and are reported through return
//! values instead.

use thiserror::Error;

/// Why a single [`crate::TrafficRule`] was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RuleViolation {
    #[error("tag id is empty")]
    EmptyTagId,

    #[error("target key is empty")]
    EmptyTargetKey,

    #[error("weight {0} is not a finite number")]
    NonFiniteWeight(f64),

    /// Exclusive weights are a share of probability mass and must lie in `[0, 1]`.
    #[error("exclusive weight {0} is outside [0, 1]")]
    WeightOutOfRange(f64),
}

/// Errors surfaced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A rule failed validation; `index` is its position in the input list.
    #[error("invalid rule #{index} (tag `{tag_id}`, target `{target_key}`): {violation}")]
    InvalidRule {
        index: usize,
        tag_id: String,
        target_key: String,
        #[source]
        violation: RuleViolation,
    },

    /// A wire value that does not map to any [`crate::Gender`].
    #[error("unknown gender value {0}")]
    UnknownGender(i32),

    #[cfg(feature = "serde")]
    #[error("failed to encode record: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[cfg(feature = "serde")]
    #[error("failed to decode record: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    #[cfg(feature = "serde")]
    #[error("malformed rule feed: {0}")]
    Feed(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
