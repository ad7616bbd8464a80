//! Delta Encoder (C9) for the territory engine: diffs the ownership
//! matrix at the end of every tick and folds the changed cells into
//! each nation's outbound [`territory_types::TerritoryDelta`].
//!
//! # Modules
//!
//! - [`delta`] -- Diff pass and `territoryPercentage` recomputation (§4.9).

pub mod delta;

pub use delta::{encode_deltas, full_territory_view, recompute_territory_percentages};
