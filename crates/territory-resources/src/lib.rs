//! Resource-Node Claim System (C7) for the territory engine: per-cell
//! claim progress, confirmation, and per-nation passive bonus
//! aggregation.
//!
//! This crate sits alongside `territory-nations`, both consumed by
//! `territory-core`'s tick driver. It has no knowledge of nations or
//! arrows beyond the bare [`territory_types::NationIdx`] each claim
//! records; `territory-nations::arrow` takes the `Vec<BonusBundle>`
//! this crate produces as a plain slice rather than depending on it
//! directly, keeping the two crates decoupled.
//!
//! # Modules
//!
//! - [`claim`] -- Claim progress advancement and confirmation (§4.7).
//! - [`bonus`] -- Per-nation [`territory_types::BonusBundle`] aggregation from confirmed claims.
//! - [`config`] -- Capture-tick, level-multiplier, and per-resource effect tuning.

pub mod bonus;
pub mod claim;
pub mod config;

pub use bonus::{compute_all_bonuses, compute_bonus, is_confirmed};
pub use claim::{advance_claims, claims_owned_by, prune_unowned_in_progress};
pub use config::{ResourceConfig, ResourceEffect};
