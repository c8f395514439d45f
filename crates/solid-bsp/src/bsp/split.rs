//! Separation of two disjoint solids by one of their face planes.

use tracing::warn;

use crate::error::{BspError, Result};
use crate::{Plane, Side, Solid};

/// A two-leaf subtree that has not been placed in a tree yet.
#[derive(Debug, Clone)]
pub struct Separation {
    /// The separating face plane.
    pub plane: Plane,
    /// Solid on the negative side.
    pub left: Solid,
    /// Solid on the positive side.
    pub right: Solid,
    /// The solid owning the face, plus the other one if it touches the plane.
    pub boundary: Vec<Solid>,
}

/// Finds a face plane of `a` or `b` that separates the two solids.
///
/// Faces of `a` are tried first, then faces of `b`. A face is skipped when
/// both solids occupy the same open half-spaces. The first face on which the
/// other solid lies purely on one side (possibly touching) is chosen.
///
/// # Errors
///
/// Returns [`BspError::IntersectingSolids`] if no face of either solid
/// separates them.
pub fn split(a: &Solid, b: &Solid) -> Result<Separation> {
    if let Some(separation) = separate_by_faces_of(a, b) {
        return Ok(separation);
    }
    if let Some(separation) = separate_by_faces_of(b, a) {
        return Ok(separation);
    }

    warn!(first = %a.id(), second = %b.id(), "no face plane separates solids");
    Err(BspError::IntersectingSolids {
        first: a.id(),
        second: b.id(),
    })
}

/// Tries each face of `owner` as a separator against `other`.
fn separate_by_faces_of(owner: &Solid, other: &Solid) -> Option<Separation> {
    for plane in owner.planes() {
        let owner_sides = owner.classify(plane);
        let other_sides = other.classify(plane);
        if owner_sides.same_halves(&other_sides) {
            continue;
        }

        // A spanning or boundary-only `other` has no single half; try the next face.
        let Some(half) = other_sides.half() else {
            continue;
        };

        let mut boundary = vec![owner.clone()];
        if other_sides.touches() {
            boundary.push(other.clone());
        }

        let (left, right) = match half {
            Side::Negative => (other.clone(), owner.clone()),
            _ => (owner.clone(), other.clone()),
        };

        return Some(Separation {
            plane: plane.clone(),
            left,
            right,
            boundary,
        });
    }
    None
}
