//! Test doubles for the convex query.

use super::detection::{ConvexQuery, NarrowPhase, SurfacePoints};
use crate::types::{Body, BodyId, Shape, Vec3};

/// Treats every shape as its bounding sphere about the centre of mass,
/// with `bias` acting as a contact skin.
pub(crate) struct BoundingSphereQuery;

impl BoundingSphereQuery {
    fn spheres(a: &Body, b: &Body) -> (Vec3, f64, Vec3, f64, Vec3) {
        let (ca, cb) = (a.center_of_mass_world(), b.center_of_mass_world());
        let axis = (cb - ca).try_normalize().unwrap_or(Vec3::Y);
        (ca, a.shape.bounding_radius(), cb, b.shape.bounding_radius(), axis)
    }
}

impl ConvexQuery for BoundingSphereQuery {
    fn does_intersect(&self, a: &Body, b: &Body, bias: f64) -> Option<SurfacePoints> {
        let (ca, ra, cb, rb, axis) = Self::spheres(a, b);
        if ca.distance(cb) > ra + rb + bias {
            return None;
        }
        Some(SurfacePoints {
            on_a: ca + axis * ra,
            on_b: cb - axis * rb,
        })
    }

    fn closest_points(&self, a: &Body, b: &Body) -> SurfacePoints {
        let (ca, ra, cb, rb, axis) = Self::spheres(a, b);
        SurfacePoints {
            on_a: ca + axis * ra,
            on_b: cb - axis * rb,
        }
    }
}

pub(crate) fn narrow_phase() -> NarrowPhase<BoundingSphereQuery> {
    NarrowPhase::new(BoundingSphereQuery)
}

pub(crate) fn ball(id: u32, radius: f64, position: Vec3) -> Body {
    Body::new(BodyId(id), Shape::Sphere { radius }).with_position(position)
}

/// Cube whose bounding sphere has radius `sqrt(3) * half`.
pub(crate) fn cube(id: u32, half: f64, position: Vec3) -> Body {
    Body::new(BodyId(id), Shape::cuboid(Vec3::splat(half))).with_position(position)
}

