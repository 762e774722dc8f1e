//! Narrow-phase collision detection.
//!
//! This module handles:
//! - **Primitives**: closed-form ray–sphere roots
//! - **Spheres**: static and swept sphere–sphere contacts
//! - **Detection**: static and swept dispatch over a pair of bodies
//! - **Advancement**: conservative advancement for convex pairs
//!
//! ## Swept queries
//!
//! Checking overlap only at the end of a step misses thin or fast bodies.
//! The swept queries instead find the first instant within the step at
//! which the bodies touch:
//!
//! ```text
//! Time t=0          t=toi        t=dt
//!    ●───────────────●╳───────────●
//!    A               A│B          A (would have tunnelled)
//!                     └─ contact
//! ```
//!
//! Sphere pairs are solved exactly. Any other pair is advanced in safe
//! steps until the static test reports contact.

pub mod advancement;
pub mod detection;
pub mod primitives;
pub mod sphere;

#[cfg(test)]
pub(crate) mod testing;

pub use detection::*;
pub use primitives::*;
pub use sphere::*;
