//! BSP tree node implementation.

use std::collections::BTreeMap;

use crate::{Plane, Solid, SolidId};

slotmap::new_key_type! {
    /// Handle of a node in a [`BspTree`](super::BspTree) arena.
    pub struct NodeId;
}

/// A node in the BSP tree.
///
/// Nodes live in the tree's arena and refer to each other by [`NodeId`].
/// The parent link is a plain back-reference; children are owned through
/// the tree, which drops a node's subtree whenever it drops the node.
#[derive(Debug, Clone)]
pub struct BspNode {
    parent: Option<NodeId>,
    kind: NodeKind,
}

/// The two node variants.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Internal(InternalNode),
    /// Holds exactly one solid.
    Leaf(Solid),
}

/// An internal node: a separating plane with two subtrees.
///
/// # Boundary Set
///
/// Solids meeting the plane (a vertex on it, or vertices on both sides) are
/// recorded in the boundary set, keyed by identity. They are additionally
/// stored in the subtree(s) of the half-space(s) they occupy.
#[derive(Debug, Clone)]
pub struct InternalNode {
    plane: Plane,
    boundary: BTreeMap<SolidId, Solid>,
    /// Subtree on the NEGATIVE side of the plane.
    left: NodeId,
    /// Subtree on the POSITIVE side of the plane.
    right: NodeId,
}

impl BspNode {
    pub(crate) fn leaf(solid: Solid, parent: Option<NodeId>) -> Self {
        Self {
            parent,
            kind: NodeKind::Leaf(solid),
        }
    }

    pub(crate) fn internal(
        plane: Plane,
        boundary: impl IntoIterator<Item = Solid>,
        left: NodeId,
        right: NodeId,
        parent: Option<NodeId>,
    ) -> Self {
        Self {
            parent,
            kind: NodeKind::Internal(InternalNode {
                plane,
                boundary: boundary.into_iter().map(|s| (s.id(), s)).collect(),
                left,
                right,
            }),
        }
    }

    /// Returns the parent node, `None` at the root.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    #[inline]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    #[inline]
    pub(crate) fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    /// Returns the solid if this is a leaf.
    #[inline]
    pub fn solid(&self) -> Option<&Solid> {
        match &self.kind {
            NodeKind::Leaf(solid) => Some(solid),
            NodeKind::Internal(_) => None,
        }
    }

    /// Returns the internal node data if this is not a leaf.
    #[inline]
    pub fn as_internal(&self) -> Option<&InternalNode> {
        match &self.kind {
            NodeKind::Internal(internal) => Some(internal),
            NodeKind::Leaf(_) => None,
        }
    }

    #[inline]
    pub(crate) fn as_internal_mut(&mut self) -> Option<&mut InternalNode> {
        match &mut self.kind {
            NodeKind::Internal(internal) => Some(internal),
            NodeKind::Leaf(_) => None,
        }
    }
}

impl InternalNode {
    /// Returns a reference to the separating plane.
    #[inline]
    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Returns the solids meeting the plane, in ascending identity order.
    pub fn boundary(&self) -> impl Iterator<Item = &Solid> {
        self.boundary.values()
    }

    #[inline]
    pub fn boundary_len(&self) -> usize {
        self.boundary.len()
    }

    #[inline]
    pub fn boundary_contains(&self, id: SolidId) -> bool {
        self.boundary.contains_key(&id)
    }

    #[inline]
    pub fn left(&self) -> NodeId {
        self.left
    }

    #[inline]
    pub fn right(&self) -> NodeId {
        self.right
    }

    /// Records a solid in the boundary set. Re-adding is a no-op.
    pub(crate) fn add_boundary(&mut self, solid: Solid) {
        self.boundary.insert(solid.id(), solid);
    }

    /// Erases a solid from the boundary set; returns whether it was present.
    pub(crate) fn erase_boundary(&mut self, id: SolidId) -> bool {
        self.boundary.remove(&id).is_some()
    }

    /// Points the child slot currently holding `old` at `new`.
    /// Returns `false` if `old` is not a child of this node.
    pub(crate) fn replace_child(&mut self, old: NodeId, new: NodeId) -> bool {
        if self.left == old {
            self.left = new;
            true
        } else if self.right == old {
            self.right = new;
            true
        } else {
            false
        }
    }

    /// Returns the other child, if `child` is one of this node's children.
    pub(crate) fn sibling_of(&self, child: NodeId) -> Option<NodeId> {
        if self.left == child {
            Some(self.right)
        } else if self.right == child {
            Some(self.left)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{point, SolidRegistry};
    use slotmap::SlotMap;

    #[test]
    fn leaf_holds_one_solid() {
        let mut registry = SolidRegistry::new();
        let cube = registry.unit_cube(point(0, 0, 0)).unwrap();
        let node = BspNode::leaf(cube.clone(), None);

        assert!(node.is_leaf());
        assert_eq!(node.solid(), Some(&cube));
        assert!(node.as_internal().is_none());
        assert!(node.parent().is_none());
    }

    #[test]
    fn internal_boundary_is_keyed_by_identity() {
        let mut registry = SolidRegistry::new();
        let a = registry.unit_cube(point(0, 0, 0)).unwrap();
        let b = registry.unit_cube(point(1, 0, 0)).unwrap();

        let mut arena: SlotMap<NodeId, BspNode> = SlotMap::with_key();
        let left = arena.insert(BspNode::leaf(a.clone(), None));
        let right = arena.insert(BspNode::leaf(b.clone(), None));
        let plane = a.planes()[1].clone();

        let mut node = BspNode::internal(plane, [a.clone(), a.clone()], left, right, None);
        let internal = node.as_internal_mut().unwrap();
        assert_eq!(internal.boundary_len(), 1);

        internal.add_boundary(b.clone());
        assert_eq!(
            internal.boundary().map(Solid::id).collect::<Vec<_>>(),
            vec![a.id(), b.id()]
        );

        assert!(internal.erase_boundary(a.id()));
        assert!(!internal.erase_boundary(a.id()));
        assert!(!internal.boundary_contains(a.id()));
        assert!(internal.boundary_contains(b.id()));
    }

    #[test]
    fn replace_child_and_sibling() {
        let mut registry = SolidRegistry::new();
        let a = registry.unit_cube(point(0, 0, 0)).unwrap();
        let b = registry.unit_cube(point(1, 0, 0)).unwrap();

        let mut arena: SlotMap<NodeId, BspNode> = SlotMap::with_key();
        let left = arena.insert(BspNode::leaf(a.clone(), None));
        let right = arena.insert(BspNode::leaf(b.clone(), None));
        let other = arena.insert(BspNode::leaf(b, None));

        let mut node = BspNode::internal(a.planes()[1].clone(), Vec::new(), left, right, None);
        let internal = node.as_internal_mut().unwrap();

        assert_eq!(internal.sibling_of(left), Some(right));
        assert_eq!(internal.sibling_of(right), Some(left));
        assert_eq!(internal.sibling_of(other), None);

        assert!(internal.replace_child(right, other));
        assert_eq!(internal.right(), other);
        assert!(!internal.replace_child(right, left));
    }
}
