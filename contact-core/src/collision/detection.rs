//! Contact dispatch between pairs of bodies.
//!
//! Sphere pairs are answered in closed form. Every other pairing is handed
//! to a [`ConvexQuery`], the support-function based intersection and
//! distance routine supplied by the caller.

use crate::config::NarrowPhaseConfig;
use crate::integrator::KinematicProbe;
use crate::types::{Body, Contact, Proximity, Vec3};

use super::sphere::{center_axis, sphere_sphere_dynamic, sphere_sphere_static};

/// A pair of world-space points, one on each body.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfacePoints {
    pub on_a: Vec3,
    pub on_b: Vec3,
}

/// Generic convex intersection and distance queries (GJK/EPA or similar).
pub trait ConvexQuery {
    /// Returns the penetrating surface points when the shapes of `a` and `b`
    /// overlap, using `bias` as the expansion margin, or `None`.
    fn does_intersect(&self, a: &Body, b: &Body, bias: f64) -> Option<SurfacePoints>;

    /// Nearest points between the shapes of `a` and `b`. Only meaningful when
    /// they do not overlap.
    fn closest_points(&self, a: &Body, b: &Body) -> SurfacePoints;
}

impl<Q: ConvexQuery + ?Sized> ConvexQuery for &Q {
    fn does_intersect(&self, a: &Body, b: &Body, bias: f64) -> Option<SurfacePoints> {
        (**self).does_intersect(a, b, bias)
    }

    fn closest_points(&self, a: &Body, b: &Body) -> SurfacePoints {
        (**self).closest_points(a, b)
    }
}

/// Narrow-phase contact generator.
///
/// Queries never keep references to the bodies they inspect. The swept
/// queries advance the bodies while they run and always put them back.
pub struct NarrowPhase<Q> {
    pub config: NarrowPhaseConfig,
    query: Q,
}

impl<Q: ConvexQuery> NarrowPhase<Q> {
    pub fn new(query: Q) -> Self {
        Self::with_config(query, NarrowPhaseConfig::default())
    }

    pub fn with_config(query: Q, config: NarrowPhaseConfig) -> Self {
        Self { config, query }
    }

    pub fn query(&self) -> &Q {
        &self.query
    }

    /// Static contact test at the bodies' current configuration.
    ///
    /// The returned record is always filled in: a separated pair carries its
    /// nearest points and a positive separation.
    pub fn intersect(&self, a: &Body, b: &Body) -> Proximity {
        match (a.shape.as_sphere(), b.shape.as_sphere()) {
            (Some(radius_a), Some(radius_b)) => Self::intersect_spheres(a, b, radius_a, radius_b),
            _ => self.intersect_convex(a, b),
        }
    }

    /// Swept contact test over `[0, dt]`.
    ///
    /// Sphere pairs are solved analytically; other pairs go through
    /// [`conservative_advance`](Self::conservative_advance). The bodies are
    /// left exactly as they were on entry.
    pub fn intersect_swept(&self, a: &mut Body, b: &mut Body, dt: f64) -> Option<Contact> {
        match (a.shape.as_sphere(), b.shape.as_sphere()) {
            (Some(radius_a), Some(radius_b)) => self.sweep_spheres(a, b, radius_a, radius_b, dt),
            _ => self.conservative_advance(a, b, dt),
        }
    }

    fn intersect_spheres(a: &Body, b: &Body, radius_a: f64, radius_b: f64) -> Proximity {
        let overlap = sphere_sphere_static(radius_a, radius_b, a.position, b.position);

        let mut contact = Contact::between(a.id, b.id);
        contact.point_on_a = a.contact_point(overlap.point_on_a);
        contact.point_on_b = b.contact_point(overlap.point_on_b);
        contact.normal = center_axis(b.position, a.position);
        contact.separation = a.position.distance(b.position) - (radius_a + radius_b);

        if overlap.touching {
            Proximity::Touching(contact)
        } else {
            Proximity::Separated(contact)
        }
    }

    fn intersect_convex(&self, a: &Body, b: &Body) -> Proximity {
        let bias = self.config.contact_bias;
        let mut contact = Contact::between(a.id, b.id);

        if let Some(points) = self.query.does_intersect(a, b, bias) {
            let normal = (points.on_b - points.on_a).normalize_or_zero();
            let on_a = points.on_a - normal * bias;
            let on_b = points.on_b + normal * bias;

            contact.point_on_a = a.contact_point(on_a);
            contact.point_on_b = b.contact_point(on_b);
            contact.normal = normal;
            contact.separation = -on_a.distance(on_b);
            return Proximity::Touching(contact);
        }

        let points = self.query.closest_points(a, b);
        contact.point_on_a = a.contact_point(points.on_a);
        contact.point_on_b = b.contact_point(points.on_b);
        contact.normal = (points.on_a - points.on_b).normalize_or_zero();
        contact.separation = points.on_a.distance(points.on_b);
        Proximity::Separated(contact)
    }

    fn sweep_spheres(
        &self,
        a: &mut Body,
        b: &mut Body,
        radius_a: f64,
        radius_b: f64,
        dt: f64,
    ) -> Option<Contact> {
        let swept = sphere_sphere_dynamic(
            radius_a,
            radius_b,
            a.position,
            b.position,
            a.linear_velocity,
            b.linear_velocity,
            dt,
            &self.config,
        )?;

        let mut contact = Contact::between(a.id, b.id);
        contact.time_of_impact = swept.time_of_impact;

        // Local points must be sampled with the bodies at the time of impact.
        let mut probe = KinematicProbe::new(a, b);
        probe.advance(swept.time_of_impact);
        let (a, b) = (probe.a(), probe.b());

        contact.point_on_a = a.contact_point(swept.point_on_a);
        contact.point_on_b = b.contact_point(swept.point_on_b);
        contact.normal = center_axis(b.position, a.position);
        contact.separation = a.position.distance(b.position) - (radius_a + radius_b);

        Some(contact)
    }
}

// =============================================================================
// Tests
// =============================================================================
