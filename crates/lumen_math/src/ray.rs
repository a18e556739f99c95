use crate::{is_zero, unit, DVec3, MathError};

/// A half-line in 3D space with an origin and a unit direction.
///
/// The direction is normalized on construction, so `at(t)` measures
/// Euclidean distance from the origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: DVec3,
    direction: DVec3,
}

impl Ray {
    /// Create a new ray, normalizing `direction`.
    pub fn new(origin: DVec3, direction: DVec3) -> Result<Self, MathError> {
        Ok(Self {
            origin,
            direction: unit(direction)?,
        })
    }

    /// Create a ray from a direction the caller has already normalized.
    #[inline]
    pub fn from_unit(origin: DVec3, direction: DVec3) -> Self {
        debug_assert!((direction.length_squared() - 1.0).abs() < 1e-9);
        Self { origin, direction }
    }

    /// Create a secondary ray leaving a surface at `head`.
    ///
    /// The origin is moved by `delta` along `normal`, towards the side of
    /// the surface the ray travels into, so the new ray does not hit the
    /// surface it starts on.
    pub fn offset(
        head: DVec3,
        direction: DVec3,
        normal: DVec3,
        delta: f64,
    ) -> Result<Self, MathError> {
        let direction = unit(direction)?;
        let n_dot_d = normal.dot(direction);
        let origin = if is_zero(n_dot_d) {
            head
        } else {
            head + normal * delta.copysign(n_dot_d)
        };
        Ok(Self { origin, direction })
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    /// Get the unit direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> DVec3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f64) -> DVec3 {
        if is_zero(t) {
            return self.origin;
        }
        self.origin + self.direction * t
    }
}
