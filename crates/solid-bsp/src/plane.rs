//! Exact plane representation and oriented-side predicates.

use std::cmp::Ordering;

use nalgebra::{Point3, Vector3};
use rug::Rational;

use crate::error::{BspError, Result};

/// A point with exact rational coordinates.
pub type Point = Point3<Rational>;

/// A vector with exact rational components.
pub type Vector = Vector3<Rational>;

/// Builds an exact point from anything convertible into a [`Rational`]
/// (integers, `(numerator, denominator)` pairs, other rationals).
pub fn point(
    x: impl Into<Rational>,
    y: impl Into<Rational>,
    z: impl Into<Rational>,
) -> Point {
    Point3::new(x.into(), y.into(), z.into())
}

/// Which side of an oriented plane a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// `normal · p < offset`
    Negative,
    /// Exactly on the plane.
    Boundary,
    /// `normal · p > offset`
    Positive,
}

/// The set of sides touched by the vertices of a solid.
///
/// A convex solid straddling a plane has both [`Side::Negative`] and
/// [`Side::Positive`] set, possibly also [`Side::Boundary`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SideSet {
    negative: bool,
    boundary: bool,
    positive: bool,
}

impl SideSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a side to the set.
    #[inline]
    pub fn insert(&mut self, side: Side) {
        match side {
            Side::Negative => self.negative = true,
            Side::Boundary => self.boundary = true,
            Side::Positive => self.positive = true,
        }
    }

    /// Returns `true` if the set contains `side`.
    #[inline]
    pub fn has(&self, side: Side) -> bool {
        match side {
            Side::Negative => self.negative,
            Side::Boundary => self.boundary,
            Side::Positive => self.positive,
        }
    }

    /// Returns `true` if vertices lie strictly on both sides.
    #[inline]
    pub fn spans(&self) -> bool {
        self.negative && self.positive
    }

    /// Returns `true` if at least one vertex lies exactly on the plane.
    #[inline]
    pub fn touches(&self) -> bool {
        self.boundary
    }

    /// Returns `true` if both sets occupy the same open half-spaces,
    /// ignoring whether either touches the boundary.
    #[inline]
    pub fn same_halves(&self, other: &SideSet) -> bool {
        self.negative == other.negative && self.positive == other.positive
    }

    /// Returns the single open half-space occupied, if exactly one is.
    pub fn half(&self) -> Option<Side> {
        match (self.negative, self.positive) {
            (true, false) => Some(Side::Negative),
            (false, true) => Some(Side::Positive),
            _ => None,
        }
    }

    /// Returns `true` if all three sides are present.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.negative && self.boundary && self.positive
    }
}

impl FromIterator<Side> for SideSet {
    fn from_iter<I: IntoIterator<Item = Side>>(iter: I) -> Self {
        let mut set = SideSet::new();
        for side in iter {
            set.insert(side);
            if set.is_full() {
                break;
            }
        }
        set
    }
}

/// An oriented plane in 3D space, represented as `normal · point = offset`.
///
/// The equation is kept exactly as given; it is never normalised.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    normal: Vector,
    offset: Rational,
}

impl Plane {
    /// Creates a plane from a normal vector and offset.
    ///
    /// # Errors
    ///
    /// Returns [`BspError::Degenerate`] if the normal is the zero vector.
    pub fn new(normal: Vector, offset: Rational) -> Result<Self> {
        if normal.iter().all(|c| c.cmp0() == Ordering::Equal) {
            return Err(BspError::Degenerate("plane normal cannot be zero".into()));
        }
        Ok(Self { normal, offset })
    }

    /// Creates a plane through `point` with the given normal.
    ///
    /// # Errors
    ///
    /// Returns [`BspError::Degenerate`] if the normal is the zero vector.
    pub fn from_point_and_normal(point: &Point, normal: Vector) -> Result<Self> {
        let offset = dot(&normal, &point.coords);
        Self::new(normal, offset)
    }

    /// Creates a plane from three points.
    /// The normal direction follows the right-hand rule: (b - a) × (c - a).
    ///
    /// # Errors
    ///
    /// Returns [`BspError::Degenerate`] if the points are collinear.
    pub fn from_three_points(a: &Point, b: &Point, c: &Point) -> Result<Self> {
        let ab = sub(b, a);
        let ac = sub(c, a);
        Self::from_point_and_normal(a, cross(&ab, &ac))
    }

    /// Returns the (unnormalised) normal vector.
    #[inline]
    pub fn normal(&self) -> &Vector {
        &self.normal
    }

    #[inline]
    pub fn offset(&self) -> &Rational {
        &self.offset
    }

    /// Evaluates `normal · point - offset`.
    /// The sign gives the side; the magnitude is not a distance.
    pub fn evaluate(&self, point: &Point) -> Rational {
        let mut value = dot(&self.normal, &point.coords);
        value -= &self.offset;
        value
    }

    /// Classifies which side of the plane a point lies on. Exact, no tolerance.
    pub fn classify_point(&self, point: &Point) -> Side {
        match self.evaluate(point).cmp0() {
            Ordering::Less => Side::Negative,
            Ordering::Equal => Side::Boundary,
            Ordering::Greater => Side::Positive,
        }
    }

    /// Classifies every point and returns the union of the sides hit.
    pub fn classify_points<'a, I>(&self, points: I) -> SideSet
    where
        I: IntoIterator<Item = &'a Point>,
    {
        points.into_iter().map(|p| self.classify_point(p)).collect()
    }
}

fn dot(a: &Vector, b: &Vector) -> Rational {
    let mut acc = Rational::from(&a.x * &b.x);
    acc += Rational::from(&a.y * &b.y);
    acc += Rational::from(&a.z * &b.z);
    acc
}

fn sub(a: &Point, b: &Point) -> Vector {
    Vector3::new(
        Rational::from(&a.x - &b.x),
        Rational::from(&a.y - &b.y),
        Rational::from(&a.z - &b.z),
    )
}

fn cross(a: &Vector, b: &Vector) -> Vector {
    let component = |p: &Rational, q: &Rational, r: &Rational, s: &Rational| {
        let mut v = Rational::from(p * q);
        v -= Rational::from(r * s);
        v
    };
    Vector3::new(
        component(&a.y, &b.z, &a.z, &b.y),
        component(&a.z, &b.x, &a.x, &b.z),
        component(&a.x, &b.y, &a.y, &b.x),
    )
}
