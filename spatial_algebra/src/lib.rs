//! 6D Plücker spatial vectors, inertia, and transforms shared by the
//! kinematic-tree body (CRBA/RNEA/ABA) and the floating-base/marker
//! kinematics in the core crate.
//!
//! Every spatial vector stores `[angular; linear]` in that block order;
//! `SpatialTransform` carries both a motion and a (dual) force map.

pub mod inertia;
pub mod spatial_vector;
pub mod transform;

pub use inertia::SpatialInertia;
pub use spatial_vector::{Acceleration, Force, Momentum, Velocity};
pub use transform::SpatialTransform;
