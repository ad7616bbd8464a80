//! Map geometry and the ownership matrix for the territory engine.
//!
//! This crate models the physical world: an immutable rectangular grid of
//! terrain cells (supplied by the out-of-scope map-generation layer) and
//! the dense ownership matrix that is the single source of truth for
//! "who owns what" (C1).
//!
//! # Modules
//!
//! - [`grid`] -- The immutable [`grid::Map`]: dimensions and per-cell terrain data.
//! - [`ownership`] -- The dense [`ownership::OwnershipMatrix`] (C1).
//! - [`error`] -- Error types for map and ownership-matrix operations.

pub mod error;
pub mod grid;
pub mod ownership;

pub use error::WorldError;
pub use grid::{Map, uniform_grassland_map};
pub use ownership::OwnershipMatrix;
