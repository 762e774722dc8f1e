//! Kinematic integration used by the narrow phase.
//!
//! Queries only ever drift bodies along their current velocities: no forces,
//! no velocity change. That makes a step exactly reversible in exact
//! arithmetic, which is what the "advance, sample, rewind" pattern needs.
//!
//! ## Drift
//!
//! ```text
//! c  = position + q * com        // centre of mass in world space
//! c' = c + v * dt
//! q' = exp(w * dt) * q           // rotate about the centre of mass
//! position' = c' - q' * com
//! ```
//!
//! Running the same step with `-dt` lands on the original `c` and `q`
//! (up to rounding).

use crate::types::{Body, Quat, Vec3};

impl Body {
    /// Drift the body by a signed time step.
    pub fn update(&mut self, dt: f64) {
        let com = self.shape.center_of_mass();
        let center = self.position + self.orientation * com + self.linear_velocity * dt;

        let delta = Quat::from_scaled_axis(self.angular_velocity * dt);
        self.orientation = (delta * self.orientation).normalize();
        self.position = center - self.orientation * com;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pose {
    position: Vec3,
    orientation: Quat,
}

impl Pose {
    fn of(body: &Body) -> Self {
        Self {
            position: body.position,
            orientation: body.orientation,
        }
    }

    fn apply(self, body: &mut Body) {
        body.position = self.position;
        body.orientation = self.orientation;
    }
}

/// Scoped probe over a pair of bodies.
///
/// Captures both poses on construction and writes them back when dropped, so
/// any amount of advancing inside the scope (including early returns) leaves
/// the bodies exactly as they were.
pub struct KinematicProbe<'a> {
    a: &'a mut Body,
    b: &'a mut Body,
    saved_a: Pose,
    saved_b: Pose,
    elapsed: f64,
}

impl<'a> KinematicProbe<'a> {
    pub fn new(a: &'a mut Body, b: &'a mut Body) -> Self {
        let saved_a = Pose::of(a);
        let saved_b = Pose::of(b);
        Self {
            a,
            b,
            saved_a,
            saved_b,
            elapsed: 0.0,
        }
    }

    /// Drift both bodies forward by `dt`.
    pub fn advance(&mut self, dt: f64) {
        self.a.update(dt);
        self.b.update(dt);
        self.elapsed += dt;
    }

    /// Total time advanced since the probe was opened.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn a(&self) -> &Body {
        &*self.a
    }

    pub fn b(&self) -> &Body {
        &*self.b
    }
}

impl Drop for KinematicProbe<'_> {
    fn drop(&mut self) {
        self.saved_a.apply(self.a);
        self.saved_b.apply(self.b);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BodyId, Shape};
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;
    use std::f64::consts::PI;

    fn spinning_box() -> Body {
        let hull = crate::types::ConvexHull::new(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(2.0, 2.0, 2.0),
        ])
        .unwrap();
        Body::new(BodyId(0), Shape::Convex(hull))
            .with_position(Vec3::new(1.0, 2.0, 3.0))
            .with_linear_velocity(Vec3::new(0.5, -1.0, 2.0))
            .with_angular_velocity(Vec3::new(0.3, 1.2, -0.7))
    }

    #[test]
    fn test_linear_drift() {
        let mut body = Body::new(BodyId(0), Shape::Sphere { radius: 1.0 })
            .with_linear_velocity(Vec3::new(10.0, 0.0, 0.0));

        body.update(0.5);

        assert!(body.position.abs_diff_eq(Vec3::new(5.0, 0.0, 0.0), 1e-12));
        assert_eq!(body.orientation, Quat::IDENTITY);
    }

    #[test]
    fn test_rotation_about_center_of_mass() {
        let mut body = spinning_box().with_linear_velocity(Vec3::ZERO);
        let com_before = body.center_of_mass_world();

        body.update(0.8);

        // Pure rotation keeps the centre of mass in place.
        assert!(body.center_of_mass_world().abs_diff_eq(com_before, 1e-12));
        assert!(body.orientation != Quat::IDENTITY);
    }

    #[test]
    fn test_half_turn() {
        let mut body = Body::new(BodyId(0), Shape::cuboid(Vec3::ONE))
            .with_angular_velocity(Vec3::new(0.0, PI, 0.0));

        body.update(1.0);

        let x = body.local_to_world(Vec3::X);
        assert!(x.abs_diff_eq(-Vec3::X, 1e-12));
    }

    #[test]
    fn test_update_round_trip() {
        let mut body = spinning_box();
        let original = body.clone();

        body.update(0.37);
        body.update(-0.37);

        assert!(body.position.abs_diff_eq(original.position, 1e-12));
        assert!(body.orientation.abs_diff_eq(original.orientation, 1e-12));
    }

    #[test]
    fn test_probe_restores_exactly() {
        let mut a = spinning_box();
        let mut b = spinning_box().with_position(Vec3::new(-4.0, 0.0, 0.0));
        let (a0, b0) = (a.clone(), b.clone());

        {
            let mut probe = KinematicProbe::new(&mut a, &mut b);
            probe.advance(0.1);
            probe.advance(0.25);
            assert_abs_diff_eq!(probe.elapsed(), 0.35, epsilon = 1e-15);
            assert!(probe.a().position != a0.position);
        }

        assert_eq!(a, a0);
        assert_eq!(b, b0);
    }

    #[test]
    fn test_probe_restores_on_early_return() {
        fn advance_and_bail(a: &mut Body, b: &mut Body, bail: bool) -> Option<f64> {
            let mut probe = KinematicProbe::new(a, b);
            probe.advance(3.0);
            if bail {
                return None;
            }
            probe.advance(3.0);
            Some(probe.elapsed())
        }

        let mut a = spinning_box();
        let mut b = spinning_box();
        let (a0, b0) = (a.clone(), b.clone());

        assert!(advance_and_bail(&mut a, &mut b, true).is_none());
        assert_eq!(a, a0);
        assert_eq!(b, b0);
    }

    proptest! {
        #[test]
        fn prop_update_is_invertible(
            dt in -2.0f64..2.0,
            vx in -10.0f64..10.0,
            vy in -10.0f64..10.0,
            wx in -5.0f64..5.0,
            wz in -5.0f64..5.0,
        ) {
            let mut body = spinning_box()
                .with_linear_velocity(Vec3::new(vx, vy, 1.0))
                .with_angular_velocity(Vec3::new(wx, 0.5, wz));
            let original = body.clone();

            body.update(dt);
            body.update(-dt);

            prop_assert!(body.position.abs_diff_eq(original.position, 1e-9));
            prop_assert!(body.orientation.abs_diff_eq(original.orientation, 1e-9)
                || body.orientation.abs_diff_eq(-original.orientation, 1e-9));
        }
    }
}
