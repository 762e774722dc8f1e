//! Analytic sphere–sphere tests.
//!
//! ## Swept test
//!
//! Both spheres move linearly during the step. In A's rest frame B is
//! stationary and A sweeps along `(vel_a - vel_b) * dt`, so the question
//! becomes "when does a ray from A's centre enter a sphere of radius
//! `r_a + r_b` around B's centre":
//!
//! ```text
//!   A ●──────────────────→ (relative sweep)
//!            ╭──────╮
//!           │   ●B   │  radius r_a + r_b
//!            ╰──────╯
//! ```

use tracing::debug;

use super::primitives::ray_sphere;
use crate::config::NarrowPhaseConfig;
use crate::types::Vec3;

/// Axis used when two sphere centres coincide.
pub const FALLBACK_AXIS: Vec3 = Vec3::Y;

/// Result of the static sphere test. The surface points are filled in even
/// when the spheres do not touch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereOverlap {
    pub touching: bool,
    pub point_on_a: Vec3,
    pub point_on_b: Vec3,
}

/// Time and points of first contact of two moving spheres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweptContact {
    pub time_of_impact: f64,
    pub point_on_a: Vec3,
    pub point_on_b: Vec3,
}

/// Unit axis from `from` toward `to`.
pub(crate) fn center_axis(from: Vec3, to: Vec3) -> Vec3 {
    (to - from).try_normalize().unwrap_or_else(|| {
        debug!(?from, "coincident sphere centres, using fallback axis");
        FALLBACK_AXIS
    })
}

/// Static overlap test between two spheres.
///
/// The surface points lie on the line between the centres. Touching is
/// inclusive: spheres exactly `radius_a + radius_b` apart touch.
pub fn sphere_sphere_static(radius_a: f64, radius_b: f64, pos_a: Vec3, pos_b: Vec3) -> SphereOverlap {
    let axis = center_axis(pos_a, pos_b);
    let combined = radius_a + radius_b;

    SphereOverlap {
        touching: pos_a.distance_squared(pos_b) <= combined * combined,
        point_on_a: pos_a + axis * radius_a,
        point_on_b: pos_b - axis * radius_b,
    }
}

/// Swept test between two linearly moving spheres over `[0, dt]`.
///
/// Returns `None` when the spheres do not meet within the step, including
/// when their approach lies entirely in the past.
#[allow(clippy::too_many_arguments)]
pub fn sphere_sphere_dynamic(
    radius_a: f64,
    radius_b: f64,
    pos_a: Vec3,
    pos_b: Vec3,
    vel_a: Vec3,
    vel_b: Vec3,
    dt: f64,
    config: &NarrowPhaseConfig,
) -> Option<SweptContact> {
    let sweep = (vel_a - vel_b) * dt;
    let combined = radius_a + radius_b;

    let threshold = config.short_sweep_threshold;
    let (t0, t1) = if sweep.length_squared() < threshold * threshold {
        // Too short to cast reliably; only an existing overlap counts.
        let padded = combined + config.short_sweep_padding;
        if pos_a.distance_squared(pos_b) > padded * padded {
            return None;
        }
        (0.0, 0.0)
    } else {
        ray_sphere(pos_a, sweep, pos_b, combined)?
    };

    // Ray parameter [0, 1] spans the step [0, dt].
    let (t0, t1) = (t0 * dt, t1 * dt);

    if t1 < 0.0 {
        return None;
    }

    let time_of_impact = t0.max(0.0);
    if time_of_impact > dt {
        return None;
    }

    let hit_a = pos_a + vel_a * time_of_impact;
    let hit_b = pos_b + vel_b * time_of_impact;
    let axis = center_axis(hit_a, hit_b);

    Some(SweptContact {
        time_of_impact,
        point_on_a: hit_a + axis * radius_a,
        point_on_b: hit_b - axis * radius_b,
    })
}

// =============================================================================
// Tests
// =============================================================================
