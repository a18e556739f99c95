//! Vector math for the Lumen ray tracer: glam's `DVec3` plus rays, boxes,
//! intervals and the shared tolerance policy.

pub use glam::*;

// Lumen math types
mod aabb;
mod interval;
mod ray;
mod util;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use util::{align_zero, is_zero, unit, MathError, EPSILON};
