//! Error types for the `territory-nations` crate.
//!
//! Rejections of inbound player commands (§7, "Invalid command") are
//! modeled as data ([`territory_types::RejectionReason`]), not as
//! [`NationError`] -- an invalid command is an expected, routine outcome.
//! [`NationError`] is reserved for invariant violations and malformed
//! internal state that the tick driver must log and recover from.

use territory_types::NationIdx;

/// Errors that can occur during nation-registry, arrow, or defense
/// operations.
#[derive(Debug, thiserror::Error)]
pub enum NationError {
    /// A nation index had no corresponding entry in the registry.
    #[error("unknown nation index: {0}")]
    UnknownNation(NationIdx),

    /// A nation already had a capital when another capital was recorded.
    #[error("nation {0} already has a capital")]
    DuplicateCapital(NationIdx),

    /// An arrow's path had fewer than two points.
    #[error("arrow path must have at least 2 points, got {0}")]
    ArrowPathTooShort(usize),

    /// An arrow's starting cell was not owned by the issuing nation.
    #[error("arrow start cell ({x}, {y}) is not owned by nation {nation}")]
    ArrowStartNotOwned {
        /// Nation attempting to issue the arrow.
        nation: NationIdx,
        /// Starting column.
        x: u32,
        /// Starting row.
        y: u32,
    },

    /// `borderSet` disagreed with the ownership matrix after a mutation
    /// (§7, "Internal invariant violation"). The caller force-rebuilds
    /// the cache and the tick continues.
    #[error("border cache for nation {0} disagreed with the ownership matrix; rebuilding")]
    BorderCacheDesync(NationIdx),
}
