//! BSP tree container, construction and point location.

use std::collections::HashSet;
use std::fmt;

use slotmap::SlotMap;
use tracing::{debug, trace};

use crate::error::{BspError, Result};
use crate::{Plane, Point, Side, Solid, SolidId};

use super::node::{BspNode, InternalNode, NodeId, NodeKind};
use super::selector::{FirstSeparatingFace, PlaneSelector};
use super::split::{split, Separation};
use super::visitor::{BspVisitor, CollectingVisitor, FnVisitor};

/// A Binary Space Partitioning tree over disjoint convex solids.
///
/// Every internal node holds a separating plane; solids on its negative side
/// live in the left subtree, solids on its positive side in the right
/// subtree, and solids meeting the plane are also recorded in the node's
/// boundary set. Every leaf holds exactly one solid. A solid that spans a
/// separating plane is stored in both subtrees.
///
/// # Construction
///
/// ```ignore
/// use solid_bsp::{BspTree, SolidRegistry, point};
///
/// let mut registry = SolidRegistry::new();
/// let cubes = vec![
///     registry.unit_cube(point(0, 0, 0))?,
///     registry.unit_cube(point(1, 0, 0))?,
/// ];
/// let tree = BspTree::from_solids(cubes)?;
/// ```
///
/// # Queries and updates
///
/// [`locate`](Self::locate) finds the solid containing a point;
/// [`insert`](Self::insert) and [`remove`](Self::remove) update the tree in
/// place without rebuilding it.
#[derive(Debug, Clone, Default)]
pub struct BspTree {
    pub(super) nodes: SlotMap<NodeId, BspNode>,
    pub(super) root: Option<NodeId>,
}

impl BspTree {
    /// Creates an empty BSP tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a BSP tree from a collection of mutually disjoint solids.
    ///
    /// Duplicate solids (same identity) are kept once. Two solids are
    /// separated with [`split`]; larger groups are partitioned by the plane
    /// the `selector` picks, recursively.
    ///
    /// # Errors
    ///
    /// - [`BspError::InvalidSolid`] if any input solid is degenerate.
    /// - [`BspError::IntersectingSolids`] if two solids left in one group
    ///   cannot be separated.
    /// - [`BspError::NoSeparatingPlane`] if the selector finds no plane for
    ///   a group of three or more solids.
    pub fn build<S: PlaneSelector>(mut solids: Vec<Solid>, selector: &S) -> Result<Self> {
        let mut seen = HashSet::new();
        solids.retain(|s| seen.insert(s.id()));

        if let Some(invalid) = solids.iter().find(|s| !s.is_valid()) {
            return Err(BspError::InvalidSolid(invalid.id()));
        }

        let mut tree = Self::new();
        if !solids.is_empty() {
            tree.root = Some(tree.build_subtree(&solids, selector)?);
        }

        debug!(
            solids = solids.len(),
            leaves = tree.leaf_count(),
            depth = tree.depth(),
            "built BSP tree"
        );
        Ok(tree)
    }

    /// Builds a BSP tree using the default plane selector ([`FirstSeparatingFace`]).
    ///
    /// # Errors
    ///
    /// See [`Self::build`].
    pub fn from_solids(solids: Vec<Solid>) -> Result<Self> {
        Self::build(solids, &FirstSeparatingFace)
    }

    /// Returns `true` if the tree contains no solids.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the root node id, if any.
    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Returns the node with the given id.
    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&BspNode> {
        self.nodes.get(id)
    }

    /// Returns the internal node data of `id`, if it is an internal node.
    #[inline]
    pub fn internal(&self, id: NodeId) -> Option<&InternalNode> {
        self.nodes.get(id).and_then(BspNode::as_internal)
    }

    /// Returns the distinct solids stored in the tree, ordered by identity.
    pub fn solids(&self) -> Vec<Solid> {
        let mut visitor = CollectingVisitor::new();
        self.walk(&mut visitor);
        let mut solids = visitor.into_solids();
        solids.sort();
        solids.dedup();
        solids
    }

    /// Returns the number of distinct solids in the tree.
    pub fn len(&self) -> usize {
        self.solids().len()
    }

    /// Returns `true` if a solid with this identity is stored in a leaf.
    pub fn contains_solid(&self, id: SolidId) -> bool {
        self.solids().iter().any(|s| s.id() == id)
    }

    /// Returns the number of leaves; larger than [`len`](Self::len) when
    /// spanning solids are replicated.
    pub fn leaf_count(&self) -> usize {
        self.nodes.values().filter(|n| n.is_leaf()).count()
    }

    /// Returns the number of nodes, internal and leaf.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the maximum depth of the tree (0 for empty tree, 1 for a
    /// single leaf).
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        self.walk(&mut FnVisitor::new(|_: &Solid, depth| {
            deepest = deepest.max(depth + 1);
        }));
        deepest
    }

    /// Finds the solid containing `point`.
    ///
    /// Descends by the side of each separating plane. A point exactly on a
    /// plane stops the descent; the node's boundary set is then scanned in
    /// identity order. Returns `None` if the point is in empty space.
    pub fn locate(&self, point: &Point) -> Option<&Solid> {
        let mut current = self.root?;
        loop {
            match self.nodes.get(current)?.kind() {
                NodeKind::Leaf(solid) => {
                    trace!(solid = %solid.id(), "reached leaf");
                    return solid.contains(point).then_some(solid);
                }
                NodeKind::Internal(internal) => match internal.plane().classify_point(point) {
                    Side::Negative => current = internal.left(),
                    Side::Positive => current = internal.right(),
                    Side::Boundary => {
                        trace!(boundary = internal.boundary_len(), "point on separating plane");
                        return internal.boundary().find(|s| s.contains(point));
                    }
                },
            }
        }
    }

    /// Removes every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Walks the tree in pre-order, passing each node's depth to the visitor.
    pub fn walk<V: BspVisitor>(&self, visitor: &mut V) {
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|r| (r, 0)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            match node.kind() {
                NodeKind::Leaf(solid) => visitor.visit_leaf(solid, depth),
                NodeKind::Internal(internal) => {
                    visitor.visit_internal(internal, depth);
                    stack.push((internal.right(), depth + 1));
                    stack.push((internal.left(), depth + 1));
                }
            }
        }
    }

    /// Renders the tree shape: one line per leaf in pre-order, the solid's
    /// identity prefixed by one `+` per level of depth.
    pub fn print(&self) -> String {
        let mut out = String::new();
        self.walk(&mut FnVisitor::new(|solid: &Solid, depth| {
            out.push_str(&"+".repeat(depth));
            out.push_str(&solid.id().get().to_string());
            out.push('\n');
        }));
        out
    }

    /// Recursively builds the subtree for a non-empty group of solids.
    fn build_subtree<S: PlaneSelector>(&mut self, solids: &[Solid], selector: &S) -> Result<NodeId> {
        match solids {
            [solid] => Ok(self.nodes.insert(BspNode::leaf(solid.clone(), None))),
            [a, b] => {
                let separation = split(a, b)?;
                Ok(self.attach(separation))
            }
            _ => {
                let partition = selector
                    .select(solids)
                    .ok_or(BspError::NoSeparatingPlane { count: solids.len() })?;
                let left = self.build_subtree(&partition.negative, selector)?;
                let right = self.build_subtree(&partition.positive, selector)?;
                Ok(self.join(partition.plane, partition.boundary, left, right))
            }
        }
    }

    /// Materialises a separation as an internal node with two leaves.
    /// The returned node has no parent yet.
    pub(super) fn attach(&mut self, separation: Separation) -> NodeId {
        let left = self.nodes.insert(BspNode::leaf(separation.left, None));
        let right = self.nodes.insert(BspNode::leaf(separation.right, None));
        self.join(separation.plane, separation.boundary, left, right)
    }

    /// Creates an internal node over two existing subtrees and re-parents them.
    fn join(
        &mut self,
        plane: Plane,
        boundary: Vec<Solid>,
        left: NodeId,
        right: NodeId,
    ) -> NodeId {
        let id = self
            .nodes
            .insert(BspNode::internal(plane, boundary, left, right, None));
        for child in [left, right] {
            if let Some(node) = self.nodes.get_mut(child) {
                node.set_parent(Some(id));
            }
        }
        id
    }
}

impl fmt::Display for BspTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.print())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{point, SolidRegistry};
    use rug::Rational;

    fn lattice(registry: &mut SolidRegistry) -> Vec<Solid> {
        let mut cubes = Vec::new();
        for x in 0..2 {
            for y in 0..2 {
                for z in 0..2 {
                    cubes.push(registry.unit_cube(point(x, y, z)).unwrap());
                }
            }
        }
        cubes
    }

    fn center(solid: &Solid) -> Point {
        let min = &solid.vertices()[0];
        point(
            Rational::from(&min.x + Rational::from((1, 2))),
            Rational::from(&min.y + Rational::from((1, 2))),
            Rational::from(&min.z + Rational::from((1, 2))),
        )
    }

    #[test]
    fn empty_tree() {
        let tree = BspTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.depth(), 0);
        assert!(tree.locate(&point(0, 0, 0)).is_none());
        assert_eq!(tree.print(), "");
    }

    #[test]
    fn build_empty() {
        let tree = BspTree::from_solids(vec![]).unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn build_single_solid() {
        let mut registry = SolidRegistry::new();
        let cube = registry.unit_cube(point(0, 0, 0)).unwrap();
        let tree = BspTree::from_solids(vec![cube.clone()]).unwrap();

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.print(), "0\n");
        assert_eq!(tree.locate(&point((1, 2), (1, 2), (1, 2))), Some(&cube));
    }

    #[test]
    fn build_two_adjacent_cubes() {
        let mut registry = SolidRegistry::new();
        let a = registry.unit_cube(point(0, 0, 0)).unwrap();
        let b = registry.unit_cube(point(1, 0, 0)).unwrap();
        let tree = BspTree::from_solids(vec![a.clone(), b.clone()]).unwrap();

        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.print(), "+0\n+1\n");

        let root = tree.internal(tree.root().unwrap()).unwrap();
        assert_eq!(root.plane(), &a.planes()[1]);
        assert!(root.boundary_contains(a.id()));
        assert!(root.boundary_contains(b.id()));
    }

    #[test]
    fn duplicates_are_kept_once() {
        let mut registry = SolidRegistry::new();
        let a = registry.unit_cube(point(0, 0, 0)).unwrap();
        let tree = BspTree::from_solids(vec![a.clone(), a.clone(), a]).unwrap();
        assert_eq!(tree.leaf_count(), 1);
    }

    #[test]
    fn build_lattice_locates_every_cube() {
        let mut registry = SolidRegistry::new();
        let cubes = lattice(&mut registry);
        let tree = BspTree::from_solids(cubes.clone()).unwrap();

        assert_eq!(tree.len(), 8);
        assert_eq!(tree.leaf_count(), 8);
        for cube in &cubes {
            assert_eq!(tree.locate(&center(cube)), Some(cube));
        }
        assert!(tree.locate(&point(3, 3, 3)).is_none());
    }

    #[test]
    fn point_on_separating_plane_uses_boundary_set() {
        let mut registry = SolidRegistry::new();
        let a = registry.unit_cube(point(0, 0, 0)).unwrap();
        let b = registry.unit_cube(point(1, 0, 0)).unwrap();
        let tree = BspTree::from_solids(vec![a.clone(), b]).unwrap();

        // On the shared face: both contain it, the lowest identity wins.
        assert_eq!(tree.locate(&point(1, (1, 2), (1, 2))), Some(&a));
        // On the plane but outside both cubes.
        assert!(tree.locate(&point(1, 5, 5)).is_none());
    }

    #[test]
    fn build_rejects_invalid_solid() {
        let mut registry = SolidRegistry::new();
        let a = registry.unit_cube(point(0, 0, 0)).unwrap();
        let flat = registry.create(Vec::new(), a.vertices().to_vec());

        let err = BspTree::from_solids(vec![a, flat.clone()]).unwrap_err();
        assert_eq!(err, BspError::InvalidSolid(flat.id()));
    }

    #[test]
    fn build_reports_intersecting_pair() {
        let mut registry = SolidRegistry::new();
        let a = registry.unit_cube(point(0, 0, 0)).unwrap();
        let b = registry.unit_cube(point((1, 2), 0, 0)).unwrap();

        let err = BspTree::from_solids(vec![a, b]).unwrap_err();
        assert!(matches!(err, BspError::IntersectingSolids { .. }));
    }

    #[test]
    fn build_reports_missing_separator() {
        let mut registry = SolidRegistry::new();
        // Three copies of the same region: every face leaves one side empty.
        let stacked: Vec<_> = (0..3)
            .map(|_| registry.unit_cube(point(0, 0, 0)).unwrap())
            .collect();

        let err = BspTree::from_solids(stacked).unwrap_err();
        assert_eq!(err, BspError::NoSeparatingPlane { count: 3 });
    }

    #[test]
    fn spanning_solid_is_replicated_on_build() {
        let mut registry = SolidRegistry::new();
        let a = registry.unit_cube(point(0, 0, 0)).unwrap();
        let b = registry.unit_cube(point(1, 0, 0)).unwrap();
        let bar = registry
            .cuboid(
                point(0, 2, 0),
                [Rational::from(2), Rational::from(1), Rational::from(1)],
            )
            .unwrap();

        let tree = BspTree::from_solids(vec![a, b, bar.clone()]).unwrap();
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.leaf_count(), 4);
        assert_eq!(tree.locate(&point((1, 2), (5, 2), (1, 2))), Some(&bar));
        assert_eq!(tree.locate(&point((3, 2), (5, 2), (1, 2))), Some(&bar));
    }

    #[test]
    fn spanning_solid_is_located_on_the_plane_it_crosses() {
        let mut registry = SolidRegistry::new();
        let a = registry.unit_cube(point(0, 0, 0)).unwrap();
        let b = registry.unit_cube(point(1, 0, 0)).unwrap();
        let bar = registry
            .cuboid(
                point(0, 2, 0),
                [Rational::from(2), Rational::from(1), Rational::from(1)],
            )
            .unwrap();

        let tree = BspTree::from_solids(vec![a, b, bar.clone()]).unwrap();

        // The root splits on x = 1, which cuts through `bar` without a vertex on it.
        let root = tree.internal(tree.root().unwrap()).unwrap();
        assert!(root.boundary_contains(bar.id()));
        assert_eq!(tree.locate(&point(1, (5, 2), (1, 2))), Some(&bar));
    }

    #[test]
    fn clear_empties_tree() {
        let mut registry = SolidRegistry::new();
        let mut tree = BspTree::from_solids(lattice(&mut registry)).unwrap();
        tree.clear();

        assert!(tree.is_empty());
        assert_eq!(tree.leaf_count(), 0);
        assert!(tree.locate(&point((1, 2), (1, 2), (1, 2))).is_none());
    }

    #[test]
    fn display_matches_print() {
        let mut registry = SolidRegistry::new();
        let tree = BspTree::from_solids(lattice(&mut registry)).unwrap();
        assert_eq!(tree.to_string(), tree.print());
        assert_eq!(tree.print().lines().count(), 8);
    }
}
