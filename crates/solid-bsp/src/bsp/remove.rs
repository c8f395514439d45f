//! Online removal of a solid from an existing tree.

use tracing::debug;

use crate::{Side, SideSet, Solid};

use super::node::{BspNode, NodeId, NodeKind};
use super::tree::BspTree;

enum Step {
    Leaf { matches: bool },
    Descend { sides: SideSet, left: NodeId, right: NodeId },
}

impl BspTree {
    /// Removes a solid, matched by identity.
    ///
    /// The solid is erased from the boundary set of every internal node on
    /// its path. Where it spans a plane both children are searched, and the
    /// removal succeeds if either of them held it. A removed leaf is replaced
    /// in the grandparent's slot by its sibling subtree, which takes the old
    /// parent's place; removing the last solid empties the tree.
    ///
    /// Returns `false` if the solid was not found; the tree is then unchanged
    /// apart from boundary-set entries for it, which never outlive its leaves.
    pub fn remove(&mut self, solid: &Solid) -> bool {
        let Some(root) = self.root else {
            return false;
        };
        let removed = self.remove_below(root, solid);
        debug!(solid = %solid.id(), removed, "remove solid");
        removed
    }

    fn remove_below(&mut self, start: NodeId, solid: &Solid) -> bool {
        let mut current = start;
        loop {
            let Some(node) = self.nodes.get_mut(current) else {
                return false;
            };
            let step = match node.kind_mut() {
                NodeKind::Leaf(existing) => Step::Leaf {
                    matches: existing.id() == solid.id(),
                },
                NodeKind::Internal(internal) => {
                    internal.erase_boundary(solid.id());
                    Step::Descend {
                        sides: solid.classify(internal.plane()),
                        left: internal.left(),
                        right: internal.right(),
                    }
                }
            };

            match step {
                Step::Leaf { matches } => {
                    if matches {
                        self.detach_leaf(current);
                    }
                    return matches;
                }
                Step::Descend { sides, left, right } => {
                    if sides.spans() {
                        // Detaching in `left` never frees `right`: at worst it is promoted.
                        let in_left = self.remove_below(left, solid);
                        let in_right = self.remove_below(right, solid);
                        return in_left || in_right;
                    }
                    current = if sides.has(Side::Negative) { left } else { right };
                }
            }
        }
    }

    /// Unlinks a leaf and its parent, promoting the leaf's sibling.
    fn detach_leaf(&mut self, leaf: NodeId) {
        let Some(parent) = self.nodes.get(leaf).and_then(BspNode::parent) else {
            self.nodes.remove(leaf);
            self.root = None;
            return;
        };

        let Some(sibling) = self
            .nodes
            .get(parent)
            .and_then(BspNode::as_internal)
            .and_then(|internal| internal.sibling_of(leaf))
        else {
            return;
        };
        let grandparent = self.nodes.get(parent).and_then(BspNode::parent);

        if let Some(node) = self.nodes.get_mut(sibling) {
            node.set_parent(grandparent);
        }
        match grandparent {
            Some(grandparent) => {
                if let Some(internal) = self
                    .nodes
                    .get_mut(grandparent)
                    .and_then(BspNode::as_internal_mut)
                {
                    internal.replace_child(parent, sibling);
                }
            }
            None => self.root = Some(sibling),
        }

        self.nodes.remove(leaf);
        self.nodes.remove(parent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{point, SolidRegistry};
    use rug::Rational;

    #[test]
    fn remove_from_empty_tree() {
        let mut registry = SolidRegistry::new();
        let cube = registry.unit_cube(point(0, 0, 0)).unwrap();
        let mut tree = BspTree::new();
        assert!(!tree.remove(&cube));
    }

    #[test]
    fn remove_single_leaf() {
        let mut registry = SolidRegistry::new();
        let a = registry.unit_cube(point(0, 0, 0)).unwrap();
        let other = registry.unit_cube(point(5, 0, 0)).unwrap();
        let mut tree = BspTree::from_solids(vec![a.clone()]).unwrap();

        assert!(!tree.remove(&other));
        assert_eq!(tree.leaf_count(), 1);

        assert!(tree.remove(&a));
        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 0);
    }

    #[test]
    fn removing_left_leaf_promotes_right_sibling() {
        let mut registry = SolidRegistry::new();
        let a = registry.unit_cube(point(0, 0, 0)).unwrap();
        let b = registry.unit_cube(point(1, 0, 0)).unwrap();
        let mut tree = BspTree::from_solids(vec![a.clone(), b.clone()]).unwrap();

        assert!(tree.remove(&a));

        let root = tree.node(tree.root().unwrap()).unwrap();
        assert_eq!(root.solid(), Some(&b));
        assert!(root.parent().is_none());
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn removing_right_leaf_promotes_left_sibling() {
        let mut registry = SolidRegistry::new();
        let a = registry.unit_cube(point(0, 0, 0)).unwrap();
        let b = registry.unit_cube(point(1, 0, 0)).unwrap();
        let mut tree = BspTree::from_solids(vec![a.clone(), b.clone()]).unwrap();

        assert!(tree.remove(&b));

        let root = tree.node(tree.root().unwrap()).unwrap();
        assert_eq!(root.solid(), Some(&a));
        assert!(tree.locate(&point((3, 2), (1, 2), (1, 2))).is_none());
    }

    #[test]
    fn removal_relinks_grandparent() {
        let mut registry = SolidRegistry::new();
        let a = registry.unit_cube(point(0, 0, 0)).unwrap();
        let b = registry.unit_cube(point(1, 0, 0)).unwrap();
        let c = registry.unit_cube(point(2, 0, 0)).unwrap();
        let mut tree = BspTree::from_solids(vec![a.clone(), b.clone()]).unwrap();
        tree.insert(c.clone()).unwrap();

        assert!(tree.remove(&c));

        let root_id = tree.root().unwrap();
        let root = tree.internal(root_id).unwrap();
        let right = tree.node(root.right()).unwrap();
        assert_eq!(right.solid(), Some(&b));
        assert_eq!(right.parent(), Some(root_id));
        assert_eq!(tree.print(), "+0\n+1\n");
    }

    #[test]
    fn removal_erases_boundary_entries() {
        let mut registry = SolidRegistry::new();
        let a = registry.unit_cube(point(0, 0, 0)).unwrap();
        let b = registry.unit_cube(point(1, 0, 0)).unwrap();
        let above = registry.unit_cube(point(1, 1, 0)).unwrap();
        let mut tree = BspTree::from_solids(vec![a, b]).unwrap();
        tree.insert(above.clone()).unwrap();

        assert!(tree.remove(&above));

        let root = tree.internal(tree.root().unwrap()).unwrap();
        assert!(!root.boundary_contains(above.id()));
        assert!(tree.locate(&point((3, 2), (3, 2), (1, 2))).is_none());
    }

    #[test]
    fn spanning_solid_is_removed_from_both_halves() {
        let mut registry = SolidRegistry::new();
        let a = registry.unit_cube(point(0, 0, 0)).unwrap();
        let b = registry.unit_cube(point(1, 0, 0)).unwrap();
        let bar = registry
            .cuboid(
                point(0, 2, 0),
                [Rational::from(2), Rational::from(1), Rational::from(1)],
            )
            .unwrap();
        let mut tree = BspTree::from_solids(vec![a, b]).unwrap();
        let before = tree.print();
        tree.insert(bar.clone()).unwrap();

        assert!(tree.remove(&bar));

        assert_eq!(tree.print(), before);
        assert_eq!(tree.leaf_count(), 2);
        assert!(!tree.contains_solid(bar.id()));
    }

    #[test]
    fn spanning_removal_succeeds_if_either_half_held_it() {
        let mut registry = SolidRegistry::new();
        let a = registry.unit_cube(point(0, 0, 0)).unwrap();
        let b = registry.unit_cube(point(1, 0, 0)).unwrap();
        let bar = registry
            .cuboid(
                point(0, 2, 0),
                [Rational::from(2), Rational::from(1), Rational::from(1)],
            )
            .unwrap();
        let mut tree = BspTree::from_solids(vec![a, b]).unwrap();
        tree.insert(bar.clone()).unwrap();

        // Drop the copy in the negative half by hand, leaving only the positive one.
        let root = tree.internal(tree.root().unwrap()).unwrap();
        let left = tree.internal(root.left()).unwrap();
        let bar_leaf = left.left();
        tree.detach_leaf(bar_leaf);
        assert_eq!(tree.leaf_count(), 3);

        assert!(tree.remove(&bar));
        assert!(!tree.contains_solid(bar.id()));
        assert!(!tree.remove(&bar));
    }

    #[test]
    fn removing_every_solid_empties_tree() {
        let mut registry = SolidRegistry::new();
        let cubes: Vec<_> = (0..4)
            .map(|i| registry.unit_cube(point(i % 2, i / 2, 0)).unwrap())
            .collect();
        let mut tree = BspTree::from_solids(cubes.clone()).unwrap();

        for cube in &cubes {
            assert!(tree.remove(cube));
        }

        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 0);
        assert!(tree.locate(&point((1, 2), (1, 2), (1, 2))).is_none());
    }
}
