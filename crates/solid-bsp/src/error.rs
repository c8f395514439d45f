use thiserror::Error;

use crate::SolidId;

/// Errors raised by BSP tree construction and mutation.
///
/// Misses are not errors: a failed lookup is `None` and removing an absent
/// solid returns `false`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BspError {
    /// The solid failed its validity check and was rejected before any mutation.
    #[error("solid {0} is not a valid convex solid")]
    InvalidSolid(SolidId),

    /// No face plane of either solid separates the two.
    #[error("solids {first} and {second} intersect: no face plane separates them")]
    IntersectingSolids { first: SolidId, second: SolidId },

    /// No face plane of the remaining solids yields a proper partition.
    #[error("no face plane partitions the {count} remaining solids")]
    NoSeparatingPlane { count: usize },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Convenience type alias for results using [`BspError`].
pub type Result<T> = std::result::Result<T, BspError>;
