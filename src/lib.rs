//! `tagmux`: weighted per-tag traffic splitting over hot-swappable routing tables.
//!
//! A control plane periodically hands over a flat list of [`TrafficRule`]s. Each rule
//! either reserves a fixed share of a tag's traffic for one target (*exclusive*) or
//! adds a target to the tag's shared pool (*non-exclusive*), which takes whatever
//! share the exclusive rules leave over. The data plane asks, per request, "which
//! target(s) for this tag?" and gets an answer drawn according to those shares.
//!
//! ```rust
//! use tagmux::{TrafficRule, WeightedSelector};
//!
//! let selector = WeightedSelector::default();
//! selector.refresh(&[
//!     TrafficRule::exclusive("1.1.z.1", "a", 0.10),
//!     TrafficRule::exclusive("1.1.z.1", "b", 0.15),
//!     TrafficRule::nonexclusive("1.1.z.1", "c"),
//!     TrafficRule::nonexclusive("1.1.z.1", "d"),
//! ])?;
//!
//! let targets = selector.select("1.1.z.1");
//! assert!(!targets.is_empty());
//! assert!(selector.select("unknown").is_empty());
//! # Ok::<(), tagmux::Error>(())
//! ```
//!
//! **Pieces:**
//! - [`normalize`]: groups rules per tag and turns them into cumulative-bound slots.
//! - [`TagDistribution`] / [`RoutingTable`]: the immutable lookup structure
//!   (sorted bounds + "first bound greater than r" search).
//! - [`WeightedSelector`]: owns the active table behind an `ArcSwap`; `refresh`
//!   publishes a new table atomically, `select` reads without locking.
//! - [`slot_shares`] / [`target_shares`]: expected shares, for reporting and tests.
//! - (feature `serde`) [`rules_from_json`], and the [`User`] record codec.
//!
//! **Semantics worth knowing:**
//! - Draws are scaled to the tag's actual total mass, which is below 1 for a tag made
//!   only of exclusive rules summing to less than 1.
//! - A draw landing exactly on a bound belongs to the *next* slot.
//! - Once exclusive weights for a tag reach 1, its pooled targets are never drawn.
//! - Refreshing with an empty feed keeps the active table.
//!
//! **Non-goals:** persistence, transport, rule authoring, and any memory of past
//! draws. Each `select` is an independent weighted draw.

mod error;
pub use error::*;

mod config;
pub use config::*;

mod rule;
pub use rule::*;

mod normalize;
pub use normalize::*;

mod table;
pub use table::*;

mod alloc;
pub use alloc::*;

mod stable_hash;
pub use stable_hash::*;

mod selector;
pub use selector::*;

#[cfg(feature = "serde")]
mod feed;
#[cfg(feature = "serde")]
pub use feed::*;

#[cfg(feature = "serde")]
mod user;
#[cfg(feature = "serde")]
pub use user::*;
