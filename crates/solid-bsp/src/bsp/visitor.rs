//! Visitor pattern for BSP tree traversal.
//!
//! Visitors receive nodes in pre-order (node, then negative subtree, then
//! positive subtree) together with their depth, the root being depth 0.

use crate::Solid;

use super::node::InternalNode;

/// Visitor for processing nodes during a pre-order walk.
pub trait BspVisitor {
    /// Called for every leaf.
    fn visit_leaf(&mut self, solid: &Solid, depth: usize);

    /// Called for every internal node before its children.
    fn visit_internal(&mut self, _node: &InternalNode, _depth: usize) {}
}

/// A simple visitor that collects the solid of every visited leaf.
///
/// A solid replicated into several leaves is collected once per leaf.
#[derive(Debug, Default)]
pub struct CollectingVisitor {
    collected: Vec<Solid>,
}

impl CollectingVisitor {
    /// Creates a new empty collecting visitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the collected solids.
    pub fn into_solids(self) -> Vec<Solid> {
        self.collected
    }

    /// Returns a reference to the collected solids.
    pub fn solids(&self) -> &[Solid] {
        &self.collected
    }
}

impl BspVisitor for CollectingVisitor {
    fn visit_leaf(&mut self, solid: &Solid, _depth: usize) {
        self.collected.push(solid.clone());
    }
}

/// A visitor that calls a closure for each leaf.
pub struct FnVisitor<F>
where
    F: FnMut(&Solid, usize),
{
    func: F,
}

impl<F> FnVisitor<F>
where
    F: FnMut(&Solid, usize),
{
    /// Creates a new visitor from a closure.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> BspVisitor for FnVisitor<F>
where
    F: FnMut(&Solid, usize),
{
    fn visit_leaf(&mut self, solid: &Solid, depth: usize) {
        (self.func)(solid, depth);
    }
}
