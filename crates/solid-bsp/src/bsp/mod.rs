//! Binary Space Partitioning tree over disjoint convex solids.
//!
//! This module provides a BSP tree that recursively partitions 3D space
//! using the face planes of the solids it stores. The tree enables:
//!
//! - Exact point location: which solid contains a point
//! - Online insertion and removal without rebuilding
//! - Pre-order traversal for diagnostics
//!
//! # Example
//!
//! ```ignore
//! use solid_bsp::{BspTree, SolidRegistry, point};
//!
//! let mut registry = SolidRegistry::new();
//! let a = registry.unit_cube(point(0, 0, 0))?;
//! let b = registry.unit_cube(point(1, 0, 0))?;
//!
//! let mut tree = BspTree::from_solids(vec![a.clone(), b])?;
//! assert_eq!(tree.locate(&point((1, 2), (1, 2), (1, 2))), Some(&a));
//!
//! tree.remove(&a);
//! assert!(tree.locate(&point((1, 2), (1, 2), (1, 2))).is_none());
//! ```
//!
//! # Architecture
//!
//! - [`BspTree`]: The arena of nodes plus the root link
//! - [`BspNode`]: Internal nodes (plane, boundary set, two children) or leaves (one solid)
//! - [`PlaneSelector`]: Strategy trait for choosing separating planes
//! - [`split`]: Separation of exactly two solids
//! - [`BspVisitor`]: Visitor trait for pre-order traversal

mod insert;
mod node;
mod remove;
mod selector;
mod split;
mod tree;
mod visitor;

// Re-export main types
pub use node::{BspNode, InternalNode, NodeId, NodeKind};
pub use selector::{FirstSeparatingFace, Partition, PlaneSelector};
pub use split::{split, Separation};
pub use tree::BspTree;
pub use visitor::{BspVisitor, CollectingVisitor, FnVisitor};
