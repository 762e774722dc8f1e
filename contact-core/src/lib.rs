//! # Contact Core
//!
//! Narrow-phase contact generation for rigid bodies.
//!
//! ## Architecture
//!
//! - `types`: Core data structures (shapes, bodies, contact records)
//! - `integrator`: Reversible kinematic drift and the scoped body probe
//! - `config`: YAML-based tuning of the query margins
//! - `collision`: Sphere analytics, contact dispatch and conservative advancement
//!
//! ## Example
//!
//! ```ignore
//! let narrow_phase = NarrowPhase::new(my_gjk);
//! if let Some(contact) = narrow_phase.intersect_swept(&mut a, &mut b, dt) {
//!     // advance the world by contact.time_of_impact, then resolve
//! }
//! ```

pub mod collision;
pub mod config;
pub mod integrator;
pub mod types;

pub use collision::{ConvexQuery, NarrowPhase, SurfacePoints};
pub use config::{ConfigError, ConfigLoader, NarrowPhaseConfig};
pub use types::{Body, BodyId, Contact, ContactPoint, Proximity, Shape};
