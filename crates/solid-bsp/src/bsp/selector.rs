//! Plane selection strategies for BSP tree construction.
//!
//! Candidate planes are the face planes of the input solids. The choice
//! affects tree depth and how many solids get replicated into both halves;
//! no strategy here gives balance guarantees.

use tracing::trace;

use crate::{Plane, Side, Solid};

/// The result of classifying a group of solids against one plane.
#[derive(Debug, Clone)]
pub struct Partition {
    /// The separating plane.
    pub plane: Plane,
    /// Solids with at least one vertex strictly on the negative side.
    pub negative: Vec<Solid>,
    /// Solids with at least one vertex strictly on the positive side.
    pub positive: Vec<Solid>,
    /// Solids meeting the plane: a vertex on it, or vertices on both sides.
    pub boundary: Vec<Solid>,
}

impl Partition {
    /// Classifies every solid against `plane`.
    ///
    /// A solid spanning the plane lands in both `negative` and `positive`.
    /// Every solid meeting the plane is also listed in `boundary`, so points
    /// on the plane can be located in it.
    pub fn by_plane(plane: &Plane, solids: &[Solid]) -> Self {
        let mut negative = Vec::new();
        let mut positive = Vec::new();
        let mut boundary = Vec::new();

        for solid in solids {
            let sides = solid.classify(plane);
            if sides.has(Side::Negative) {
                negative.push(solid.clone());
            }
            if sides.has(Side::Positive) {
                positive.push(solid.clone());
            }
            if sides.touches() || sides.spans() {
                boundary.push(solid.clone());
            }
        }

        Self {
            plane: plane.clone(),
            negative,
            positive,
            boundary,
        }
    }

    /// Returns `true` if both groups are non-empty and strictly smaller than
    /// `total`, so recursing on them makes progress.
    pub fn is_proper(&self, total: usize) -> bool {
        !self.negative.is_empty()
            && self.negative.len() < total
            && !self.positive.is_empty()
            && self.positive.len() < total
    }
}

/// Strategy for selecting the separating plane of an internal node.
pub trait PlaneSelector {
    /// Selects a plane splitting `solids` into a proper [`Partition`].
    ///
    /// Returns `None` if no candidate plane yields one.
    fn select(&self, solids: &[Solid]) -> Option<Partition>;
}

/// Picks the first face plane that yields a proper partition.
///
/// Iterates the solids in input order and, for each, its faces in order.
/// Cheap and deterministic, but may produce unbalanced trees depending on
/// input order; shuffle the input if that matters.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstSeparatingFace;

impl PlaneSelector for FirstSeparatingFace {
    fn select(&self, solids: &[Solid]) -> Option<Partition> {
        let total = solids.len();
        for solid in solids {
            for (face, plane) in solid.planes().iter().enumerate() {
                let partition = Partition::by_plane(plane, solids);
                if partition.is_proper(total) {
                    trace!(
                        solid = %solid.id(),
                        face,
                        negative = partition.negative.len(),
                        positive = partition.positive.len(),
                        boundary = partition.boundary.len(),
                        "selected separating face"
                    );
                    return Some(partition);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{point, SolidRegistry};
    use rug::Rational;

    #[test]
    fn empty_input_has_no_partition() {
        assert!(FirstSeparatingFace.select(&[]).is_none());
    }

    #[test]
    fn single_solid_has_no_partition() {
        let mut registry = SolidRegistry::new();
        let cube = registry.unit_cube(point(0, 0, 0)).unwrap();
        assert!(FirstSeparatingFace.select(&[cube]).is_none());
    }

    #[test]
    fn partition_by_shared_face() {
        let mut registry = SolidRegistry::new();
        let a = registry.unit_cube(point(0, 0, 0)).unwrap();
        let b = registry.unit_cube(point(1, 0, 0)).unwrap();
        let c = registry.unit_cube(point(5, 0, 0)).unwrap();

        // +x face of `a`
        let partition = Partition::by_plane(&a.planes()[1], &[a.clone(), b.clone(), c.clone()]);
        assert_eq!(partition.negative, vec![a.clone()]);
        assert_eq!(partition.positive, vec![b.clone(), c]);
        assert_eq!(partition.boundary, vec![a, b]);
        assert!(partition.is_proper(3));
    }

    #[test]
    fn spanning_solid_lands_in_both_groups() {
        let mut registry = SolidRegistry::new();
        let a = registry.unit_cube(point(0, 0, 0)).unwrap();
        let long = registry
            .cuboid(
                point(0, 2, 0),
                [Rational::from(4), Rational::from(1), Rational::from(1)],
            )
            .unwrap();

        let partition = Partition::by_plane(&a.planes()[1], &[a.clone(), long.clone()]);
        assert!(partition.negative.contains(&long));
        assert!(partition.positive.contains(&long));
        assert!(!partition.is_proper(2));
    }

    #[test]
    fn first_fit_skips_improper_faces() {
        let mut registry = SolidRegistry::new();
        let solids: Vec<_> = (0..3)
            .map(|i| registry.unit_cube(point(i, 0, 0)).unwrap())
            .collect();

        // The -x face of the first cube leaves everything on one side,
        // so the +x face is the first proper candidate.
        let partition = FirstSeparatingFace.select(&solids).unwrap();
        assert_eq!(partition.plane, solids[0].planes()[1]);
        assert_eq!(partition.negative, vec![solids[0].clone()]);
        assert_eq!(partition.positive.len(), 2);
    }
}
