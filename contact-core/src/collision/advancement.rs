//! Conservative advancement.
//!
//! Finds the time of impact of two moving convex bodies by repeatedly
//! stepping them forward by a time that cannot overshoot contact:
//!
//! ```text
//! time_to_go = separation / max_closing_speed
//! ```
//!
//! The closing speed bound is the relative linear velocity projected on the
//! separating direction plus each body's worst-case rotational contribution,
//! so the bodies never pass through each other between two samples.
//! Stepping stops when the bodies touch, when they cannot close the gap
//! before the step ends, or after a fixed number of iterations.

use tracing::{debug, trace};

use super::detection::{ConvexQuery, NarrowPhase};
use crate::integrator::KinematicProbe;
use crate::types::{Body, Contact, Proximity};

impl<Q: ConvexQuery> NarrowPhase<Q> {
    /// Time of impact of `a` and `b` within `[0, dt]`.
    ///
    /// On success the contact is sampled at the time of impact and
    /// `time_of_impact` says how far the caller should advance. Both bodies
    /// are restored to their entry state on every path.
    pub fn conservative_advance(&self, a: &mut Body, b: &mut Body, dt: f64) -> Option<Contact> {
        let max_iterations = self.config.max_advance_iterations;
        let mut probe = KinematicProbe::new(a, b);
        let mut remaining = dt;
        let mut iterations = 0;

        while remaining > 0.0 {
            let contact = match self.intersect(probe.a(), probe.b()) {
                Proximity::Touching(mut contact) => {
                    contact.time_of_impact = probe.elapsed().min(dt);
                    debug!(toi = contact.time_of_impact, iterations, "advancement hit");
                    return Some(contact);
                }
                Proximity::Separated(contact) => contact,
            };

            iterations += 1;
            if iterations > max_iterations {
                debug!(max_iterations, toi = probe.elapsed(), "advancement iteration cap reached");
                break;
            }

            let direction = (contact.point_on_b.world - contact.point_on_a.world).normalize_or_zero();

            let (a, b) = (probe.a(), probe.b());
            let linear = (a.linear_velocity - b.linear_velocity).dot(direction);
            let closing_speed =
                linear + a.fastest_linear_speed(direction) + b.fastest_linear_speed(-direction);
            if closing_speed <= 0.0 {
                debug!(closing_speed, "bodies are not closing");
                break;
            }

            let time_to_go = contact.separation / closing_speed;
            trace!(
                iterations,
                separation = contact.separation,
                closing_speed,
                time_to_go,
                "advancement step"
            );
            if time_to_go > remaining {
                debug!(time_to_go, remaining, "no contact before the step ends");
                break;
            }

            remaining -= time_to_go;
            probe.advance(time_to_go);
        }

        None
    }
}

// =============================================================================
// Tests
// =============================================================================
