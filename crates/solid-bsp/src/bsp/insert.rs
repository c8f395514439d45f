//! Online insertion of a solid into an existing tree.

use tracing::debug;

use crate::error::{BspError, Result};
use crate::{Side, Solid};

use super::node::{BspNode, NodeId, NodeKind};
use super::split::{split, Separation};
use super::tree::BspTree;

/// The changes an insertion makes, computed before any of them is applied.
#[derive(Debug, Default)]
struct InsertPlan {
    /// Internal nodes whose plane the solid meets.
    boundary: Vec<NodeId>,
    /// Leaves to replace, each with the separation of its solid and the new one.
    leaves: Vec<(NodeId, Separation)>,
}

impl BspTree {
    /// Inserts a solid without rebuilding the tree.
    ///
    /// The solid descends by its classification against each separating
    /// plane: recorded in the boundary set of every plane it meets, sent to
    /// both children where it spans a plane. Every leaf it reaches is replaced
    /// by the two-leaf subtree separating the old and new solid.
    ///
    /// Insertion is all-or-nothing: every separation is computed before the
    /// tree is touched, so a failure leaves it exactly as it was.
    ///
    /// # Errors
    ///
    /// - [`BspError::InvalidSolid`] if the solid is degenerate.
    /// - [`BspError::IntersectingSolids`] if it overlaps a solid it reaches.
    pub fn insert(&mut self, solid: Solid) -> Result<()> {
        if !solid.is_valid() {
            return Err(BspError::InvalidSolid(solid.id()));
        }

        let Some(root) = self.root else {
            self.root = Some(self.nodes.insert(BspNode::leaf(solid.clone(), None)));
            debug!(solid = %solid.id(), "inserted solid as root leaf");
            return Ok(());
        };

        let plan = self.plan_insert(root, &solid)?;
        debug!(
            solid = %solid.id(),
            boundary_nodes = plan.boundary.len(),
            split_leaves = plan.leaves.len(),
            "inserting solid"
        );

        for id in plan.boundary {
            if let Some(internal) = self.nodes.get_mut(id).and_then(BspNode::as_internal_mut) {
                internal.add_boundary(solid.clone());
            }
        }
        for (leaf, separation) in plan.leaves {
            self.replace_leaf(leaf, separation);
        }
        Ok(())
    }

    /// Walks the tree read-only and collects every change `solid` requires.
    fn plan_insert(&self, root: NodeId, solid: &Solid) -> Result<InsertPlan> {
        let mut plan = InsertPlan::default();
        let mut pending = vec![root];

        while let Some(id) = pending.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            match node.kind() {
                NodeKind::Leaf(existing) => {
                    // A lone root leaf keeps its place as the first solid of the pair.
                    let separation = if node.parent().is_none() {
                        split(existing, solid)?
                    } else {
                        split(solid, existing)?
                    };
                    plan.leaves.push((id, separation));
                }
                NodeKind::Internal(internal) => {
                    let sides = solid.classify(internal.plane());
                    if sides.touches() || sides.spans() {
                        plan.boundary.push(id);
                    }
                    if sides.spans() {
                        pending.push(internal.right());
                        pending.push(internal.left());
                    } else if sides.has(Side::Negative) {
                        pending.push(internal.left());
                    } else {
                        pending.push(internal.right());
                    }
                }
            }
        }

        Ok(plan)
    }

    /// Replaces a leaf with the subtree of a separation, in its parent's slot.
    fn replace_leaf(&mut self, leaf: NodeId, separation: Separation) {
        let parent = self.nodes.get(leaf).and_then(BspNode::parent);
        let subtree = self.attach(separation);
        if let Some(node) = self.nodes.get_mut(subtree) {
            node.set_parent(parent);
        }

        match parent {
            Some(parent) => {
                if let Some(internal) = self.nodes.get_mut(parent).and_then(BspNode::as_internal_mut) {
                    internal.replace_child(leaf, subtree);
                }
            }
            None => self.root = Some(subtree),
        }
        self.nodes.remove(leaf);
    }
}
