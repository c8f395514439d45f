//! BSP (Binary Space Partitioning) tree over disjoint convex solids.

pub mod bsp;
mod error;
mod plane;
mod solid;

pub use bsp::{BspTree, FirstSeparatingFace, PlaneSelector};
pub use error::{BspError, Result};
pub use plane::{point, Plane, Point, Side, SideSet, Vector};
pub use solid::{Solid, SolidId, SolidRegistry};

/// Exact rational scalar used for every coordinate.
pub use rug::Rational;
