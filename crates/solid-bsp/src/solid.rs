//! Convex solids and the registry that hands out their identities.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use nalgebra::Vector3;
use rug::Rational;

use crate::error::{BspError, Result};
use crate::plane::{Plane, Point, Side, SideSet};

/// Stable identity of a solid, assigned once by a [`SolidRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SolidId(u64);

impl SolidId {
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for SolidId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for SolidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
struct Geometry {
    planes: Vec<Plane>,
    vertices: Vec<Point>,
}

/// A convex region bounded by planes, with a unique identity.
///
/// Cloning is cheap: the geometry is shared. Equality, ordering and hashing
/// use the identity only, never the geometry.
#[derive(Debug, Clone)]
pub struct Solid {
    id: SolidId,
    geometry: Arc<Geometry>,
}

impl Solid {
    #[inline]
    pub fn id(&self) -> SolidId {
        self.id
    }

    /// Returns the bounding (face) planes in construction order.
    #[inline]
    pub fn planes(&self) -> &[Plane] {
        &self.geometry.planes
    }

    /// Returns the vertices in construction order.
    #[inline]
    pub fn vertices(&self) -> &[Point] {
        &self.geometry.vertices
    }

    /// Classifies this solid relative to a plane: the union of the sides
    /// of all its vertices.
    pub fn classify(&self, plane: &Plane) -> SideSet {
        plane.classify_points(self.vertices())
    }

    /// Returns `true` if `point` lies inside or on the surface of the solid.
    ///
    /// For each face plane the side holding the solid's vertices is compared
    /// with the side of the query point. Valid only because the solid is convex.
    pub fn contains(&self, point: &Point) -> bool {
        self.planes().iter().all(|plane| {
            let side = plane.classify_point(point);
            if side == Side::Boundary {
                return true;
            }
            self.vertices().iter().all(|v| {
                let vertex_side = plane.classify_point(v);
                vertex_side == Side::Boundary || vertex_side == side
            })
        })
    }

    /// Returns `true` if the solid is a non-degenerate convex polyhedron.
    ///
    /// Requires at least four vertices and four planes, and every plane must
    /// be a supporting face plane: all vertices on one closed side, at least
    /// three on the plane and at least one strictly off it. The planes must
    /// also close the solid, with every vertex a corner of three faces.
    pub fn is_valid(&self) -> bool {
        if self.vertices().len() < 4 || self.planes().len() < 4 {
            return false;
        }

        let closed = self.vertices().iter().all(|v| {
            let faces = self
                .planes()
                .iter()
                .filter(|plane| plane.classify_point(v) == Side::Boundary)
                .count();
            faces >= 3
        });
        if !closed {
            return false;
        }

        self.planes().iter().all(|plane| {
            let mut on_plane = 0;
            let mut sides = SideSet::new();
            for v in self.vertices() {
                let side = plane.classify_point(v);
                if side == Side::Boundary {
                    on_plane += 1;
                }
                sides.insert(side);
            }
            on_plane >= 3 && sides.half().is_some()
        })
    }
}

impl PartialEq for Solid {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Solid {}

impl PartialOrd for Solid {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Solid {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Hash for Solid {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Allocates solid identities.
///
/// Identities are handed out in increasing order starting at zero. Two
/// registries are independent, so tests get reproducible ids.
#[derive(Debug, Default)]
pub struct SolidRegistry {
    next: u64,
}

impl SolidRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id the next created solid will receive.
    #[inline]
    pub fn peek(&self) -> SolidId {
        SolidId(self.next)
    }

    /// Creates a solid from its face planes and vertices.
    ///
    /// The geometry is not checked here; see [`Solid::is_valid`].
    pub fn create(&mut self, planes: Vec<Plane>, vertices: Vec<Point>) -> Solid {
        let id = SolidId(self.next);
        self.next += 1;
        Solid {
            id,
            geometry: Arc::new(Geometry { planes, vertices }),
        }
    }

    /// Creates an axis-aligned box with its minimum corner at `min`.
    ///
    /// Face planes point outward, so the interior is on their negative side.
    /// Planes are ordered `-x, +x, -y, +y, -z, +z`.
    ///
    /// # Errors
    ///
    /// Returns [`BspError::Degenerate`] if any extent is not strictly positive.
    pub fn cuboid(&mut self, min: Point, size: [Rational; 3]) -> Result<Solid> {
        if size.iter().any(|s| s.cmp0() != Ordering::Greater) {
            return Err(BspError::Degenerate(
                "cuboid extents must be positive".into(),
            ));
        }

        let max = Point::new(
            Rational::from(&min.x + &size[0]),
            Rational::from(&min.y + &size[1]),
            Rational::from(&min.z + &size[2]),
        );

        let mut planes = Vec::with_capacity(6);
        for axis in 0..3 {
            let mut outward = Vector3::from_element(Rational::new());
            outward[axis] = Rational::from(-1);
            planes.push(Plane::from_point_and_normal(&min, outward)?);

            let mut outward = Vector3::from_element(Rational::new());
            outward[axis] = Rational::from(1);
            planes.push(Plane::from_point_and_normal(&max, outward)?);
        }

        let mut vertices = Vec::with_capacity(8);
        for x in [&min.x, &max.x] {
            for y in [&min.y, &max.y] {
                for z in [&min.z, &max.z] {
                    vertices.push(Point::new(x.clone(), y.clone(), z.clone()));
                }
            }
        }

        Ok(self.create(planes, vertices))
    }

    /// Creates a unit cube with its minimum corner at `min`.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the error type is shared with [`Self::cuboid`].
    pub fn unit_cube(&mut self, min: Point) -> Result<Solid> {
        self.cuboid(min, [Rational::from(1), Rational::from(1), Rational::from(1)])
    }
}
