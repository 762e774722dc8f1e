//! Core types for narrow-phase queries.
//!
//! All quantities are in consistent world units:
//! - Position: units of length
//! - Velocity: length per second
//! - Angular velocity: radians per second (world space)
//! - Time: seconds

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use glam::{DQuat as Quat, DVec3 as Vec3};

// =============================================================================
// Shapes
// =============================================================================

/// Errors raised when building a shape.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("convex hull needs at least one point")]
    EmptyHull,
    #[error("invalid radius: {0}")]
    InvalidRadius(f64),
}

/// A convex point set in body space.
///
/// Only the hull vertices are stored. Intersection queries on hulls are
/// answered by an external [`ConvexQuery`](crate::collision::ConvexQuery);
/// the vertices here back the rotational speed bound used during
/// conservative advancement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvexHull {
    points: Vec<Vec3>,
    center_of_mass: Vec3,
}

impl ConvexHull {
    /// Builds a hull from its vertices. The centre of mass is approximated by
    /// the vertex centroid.
    pub fn new(points: Vec<Vec3>) -> Result<Self, ShapeError> {
        if points.is_empty() {
            return Err(ShapeError::EmptyHull);
        }
        let center_of_mass = points.iter().copied().sum::<Vec3>() / points.len() as f64;
        Ok(Self {
            points,
            center_of_mass,
        })
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn center_of_mass(&self) -> Vec3 {
        self.center_of_mass
    }
}

/// Collision shape owned by a [`Body`].
///
/// Sphere pairs are handled analytically; every other pairing goes through
/// the generic convex query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Sphere { radius: f64 },
    Convex(ConvexHull),
}

impl Shape {
    pub fn sphere(radius: f64) -> Result<Self, ShapeError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ShapeError::InvalidRadius(radius));
        }
        Ok(Shape::Sphere { radius })
    }

    /// Axis-aligned box centred on the body origin.
    pub fn cuboid(half_extents: Vec3) -> Self {
        let h = half_extents.abs();
        let mut points = Vec::with_capacity(8);
        for sx in [-1.0, 1.0] {
            for sy in [-1.0, 1.0] {
                for sz in [-1.0, 1.0] {
                    points.push(Vec3::new(sx * h.x, sy * h.y, sz * h.z));
                }
            }
        }
        Shape::Convex(ConvexHull {
            points,
            center_of_mass: Vec3::ZERO,
        })
    }

    /// Radius if this is a sphere.
    pub fn as_sphere(&self) -> Option<f64> {
        match self {
            Shape::Sphere { radius } => Some(*radius),
            Shape::Convex(_) => None,
        }
    }

    /// Centre of mass in body space.
    pub fn center_of_mass(&self) -> Vec3 {
        match self {
            Shape::Sphere { .. } => Vec3::ZERO,
            Shape::Convex(hull) => hull.center_of_mass,
        }
    }

    /// Radius of the smallest sphere about the centre of mass enclosing the shape.
    pub fn bounding_radius(&self) -> f64 {
        match self {
            Shape::Sphere { radius } => *radius,
            Shape::Convex(hull) => hull
                .points
                .iter()
                .map(|p| (*p - hull.center_of_mass).length())
                .fold(0.0, f64::max),
        }
    }

    /// Upper bound on how fast any surface point moves along `direction`
    /// due to rotation alone.
    ///
    /// Both `angular_velocity` and `direction` are in body space. A spinning
    /// sphere never brings its surface any closer, so it contributes nothing.
    pub fn fastest_linear_speed(&self, angular_velocity: Vec3, direction: Vec3) -> f64 {
        match self {
            Shape::Sphere { .. } => 0.0,
            Shape::Convex(hull) => hull
                .points
                .iter()
                .map(|p| direction.dot(angular_velocity.cross(*p - hull.center_of_mass)))
                .fold(0.0, f64::max),
        }
    }
}

// =============================================================================
// Body
// =============================================================================

/// Caller-assigned identity of a body. Contacts carry these instead of
/// references so they never borrow the bodies they describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Kinematic state of a rigid body plus its shape.
///
/// `position` is the world-space body origin; the shape's centre of mass is
/// offset from it by [`Shape::center_of_mass`] rotated into world space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub position: Vec3,
    pub orientation: Quat,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub shape: Shape,
}

impl Body {
    /// Body at rest at the origin.
    pub fn new(id: BodyId, shape: Shape) -> Self {
        Self {
            id,
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            shape,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation.normalize();
        self
    }

    pub fn with_linear_velocity(mut self, velocity: Vec3) -> Self {
        self.linear_velocity = velocity;
        self
    }

    pub fn with_angular_velocity(mut self, angular_velocity: Vec3) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    pub fn center_of_mass_world(&self) -> Vec3 {
        self.local_to_world(self.shape.center_of_mass())
    }

    pub fn world_to_local(&self, point: Vec3) -> Vec3 {
        self.orientation.inverse() * (point - self.position)
    }

    pub fn local_to_world(&self, point: Vec3) -> Vec3 {
        self.position + self.orientation * point
    }

    /// Rotational speed bound along a world-space `direction`.
    pub fn fastest_linear_speed(&self, direction: Vec3) -> f64 {
        let to_local = self.orientation.inverse();
        self.shape
            .fastest_linear_speed(to_local * self.angular_velocity, to_local * direction)
    }

    /// Samples a world-space point into a [`ContactPoint`] at the body's
    /// current configuration.
    pub fn contact_point(&self, world: Vec3) -> ContactPoint {
        ContactPoint {
            world,
            local: self.world_to_local(world),
        }
    }
}

// =============================================================================
// Contact Types
// =============================================================================

/// A contact point expressed in world space and in the owning body's space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContactPoint {
    pub world: Vec3,
    pub local: Vec3,
}

/// Result of a narrow-phase query between two bodies.
///
/// The normal points from B toward A. `separation` is signed: positive is
/// the gap between the bodies, negative is the penetration depth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub body_a: BodyId,
    pub body_b: BodyId,
    pub point_on_a: ContactPoint,
    pub point_on_b: ContactPoint,
    pub normal: Vec3,
    pub separation: f64,
    pub time_of_impact: f64,
}

impl Contact {
    /// An empty record stamped with the identities of both bodies.
    pub fn between(body_a: BodyId, body_b: BodyId) -> Self {
        Self {
            body_a,
            body_b,
            point_on_a: ContactPoint::default(),
            point_on_b: ContactPoint::default(),
            normal: Vec3::ZERO,
            separation: 0.0,
            time_of_impact: 0.0,
        }
    }

    /// The same contact seen from body B.
    pub fn swapped(&self) -> Self {
        Self {
            body_a: self.body_b,
            body_b: self.body_a,
            point_on_a: self.point_on_b,
            point_on_b: self.point_on_a,
            normal: -self.normal,
            separation: self.separation,
            time_of_impact: self.time_of_impact,
        }
    }
}

/// Outcome of a static query. Both variants carry a populated record; a
/// separated record holds the nearest points and a positive separation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Proximity {
    Touching(Contact),
    Separated(Contact),
}

impl Proximity {
    pub fn is_touching(&self) -> bool {
        matches!(self, Proximity::Touching(_))
    }

    pub fn contact(&self) -> &Contact {
        match self {
            Proximity::Touching(contact) | Proximity::Separated(contact) => contact,
        }
    }

    pub fn into_contact(self) -> Contact {
        match self {
            Proximity::Touching(contact) | Proximity::Separated(contact) => contact,
        }
    }

    /// The contact, only if the bodies touch.
    pub fn touching(self) -> Option<Contact> {
        match self {
            Proximity::Touching(contact) => Some(contact),
            Proximity::Separated(_) => None,
        }
    }
}

// =============================================================================
// Constants
// =============================================================================

/// Default tuning values. See [`NarrowPhaseConfig`](crate::config::NarrowPhaseConfig).
pub mod constants {
    /// Margin handed to the convex query and applied to its contact points.
    pub const CONTACT_BIAS: f64 = 0.001;

    /// Swept displacements shorter than this fall back to a static check.
    pub const SHORT_SWEEP_THRESHOLD: f64 = 0.001;

    /// Radius pad of the static check used for short sweeps.
    pub const SHORT_SWEEP_PADDING: f64 = 0.001;

    /// Conservative advancement gives up after this many iterations.
    pub const MAX_ADVANCE_ITERATIONS: u32 = 10;

    /// Small value for floating-point comparisons
    pub const EPSILON: f64 = 1e-12;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_sphere_rejects_bad_radius() {
        assert_eq!(Shape::sphere(0.0), Err(ShapeError::InvalidRadius(0.0)));
        assert!(matches!(
            Shape::sphere(f64::NAN),
            Err(ShapeError::InvalidRadius(_))
        ));
        assert_eq!(Shape::sphere(1.5), Ok(Shape::Sphere { radius: 1.5 }));
    }

    #[test]
    fn test_empty_hull_rejected() {
        assert_eq!(ConvexHull::new(Vec::new()), Err(ShapeError::EmptyHull));
    }

    #[test]
    fn test_hull_center_of_mass_is_centroid() {
        let hull = ConvexHull::new(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 4.0, 0.0),
            Vec3::new(2.0, 4.0, 0.0),
        ])
        .unwrap();
        assert!(hull.center_of_mass().abs_diff_eq(Vec3::new(1.0, 2.0, 0.0), 1e-12));
    }

    #[test]
    fn test_cuboid_bounding_radius() {
        let shape = Shape::cuboid(Vec3::new(1.0, 2.0, 2.0));
        assert_abs_diff_eq!(shape.bounding_radius(), 3.0, epsilon = 1e-12);
        assert_eq!(shape.center_of_mass(), Vec3::ZERO);
    }

    #[test]
    fn test_sphere_has_no_rotational_speed() {
        let shape = Shape::Sphere { radius: 2.0 };
        assert_eq!(
            shape.fastest_linear_speed(Vec3::new(0.0, 0.0, 50.0), Vec3::X),
            0.0
        );
    }

    #[test]
    fn test_cuboid_rotational_speed() {
        // Cube spinning about Z at 2 rad/s: w x r = (-2y, 2x, 0), so the
        // corners with y = -1 move along +X at 2.
        let shape = Shape::cuboid(Vec3::ONE);
        let speed = shape.fastest_linear_speed(Vec3::new(0.0, 0.0, 2.0), Vec3::X);
        assert_abs_diff_eq!(speed, 2.0, epsilon = 1e-12);

        // No rotation, no speed.
        assert_eq!(shape.fastest_linear_speed(Vec3::ZERO, Vec3::X), 0.0);
    }

    #[test]
    fn test_world_local_round_trip() {
        let body = Body::new(BodyId(1), Shape::cuboid(Vec3::ONE))
            .with_position(Vec3::new(3.0, -1.0, 2.0))
            .with_orientation(Quat::from_rotation_y(FRAC_PI_2));

        let world = Vec3::new(4.0, 0.5, -7.0);
        let local = body.world_to_local(world);
        assert!(body.local_to_world(local).abs_diff_eq(world, 1e-12));

        // A quarter turn about Y maps local +X to world -Z.
        let p = body.local_to_world(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::new(3.0, -1.0, 1.0), 1e-12));
    }

    #[test]
    fn test_body_speed_bound_uses_body_frame() {
        // Long thin box along local X, rotated so that axis lies along world Z.
        let body = Body::new(BodyId(0), Shape::cuboid(Vec3::new(4.0, 0.1, 0.1)))
            .with_orientation(Quat::from_rotation_y(FRAC_PI_2))
            .with_angular_velocity(Vec3::new(1.0, 0.0, 0.0));

        // Spinning about world X swings the long axis through world Y.
        let speed = body.fastest_linear_speed(Vec3::Y);
        assert_abs_diff_eq!(speed, 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_contact_swapped() {
        let mut contact = Contact::between(BodyId(1), BodyId(2));
        contact.normal = Vec3::X;
        contact.point_on_a.world = Vec3::ONE;
        contact.separation = 0.5;

        let swapped = contact.swapped();
        assert_eq!(swapped.body_a, BodyId(2));
        assert_eq!(swapped.body_b, BodyId(1));
        assert_eq!(swapped.normal, -Vec3::X);
        assert_eq!(swapped.point_on_b.world, Vec3::ONE);
        assert_eq!(swapped.separation, 0.5);
        assert_eq!(swapped.swapped(), contact);
    }

    #[test]
    fn test_proximity_accessors() {
        let contact = Contact::between(BodyId(0), BodyId(1));
        assert!(Proximity::Touching(contact).is_touching());
        assert!(Proximity::Touching(contact).touching().is_some());
        assert!(!Proximity::Separated(contact).is_touching());
        assert!(Proximity::Separated(contact).touching().is_none());
        assert_eq!(Proximity::Separated(contact).into_contact(), contact);
    }
}
