//! Infinite plane primitive.

use super::GeometryError;
use lumen_math::{align_zero, is_zero, unit, DVec3, Ray};

/// A plane through `point` with unit `normal`.
#[derive(Debug, Clone)]
pub struct Plane {
    point: DVec3,
    normal: DVec3,
}

impl Plane {
    /// Create a plane from a point on it and a (not necessarily unit) normal.
    pub fn new(point: DVec3, normal: DVec3) -> Result<Self, GeometryError> {
        let normal = unit(normal).map_err(|source| GeometryError::Math {
            shape: "plane",
            source,
        })?;
        Ok(Self { point, normal })
    }

    /// Create the plane through three points.
    ///
    /// The normal follows the winding `(b - a) x (c - a)`. Fails when the
    /// points coincide or are collinear.
    pub fn from_points(a: DVec3, b: DVec3, c: DVec3) -> Result<Self, GeometryError> {
        let normal = unit((b - a).cross(c - a)).map_err(|_| GeometryError::Collinear {
            shape: "plane",
            index: 2,
        })?;
        Ok(Self { point: a, normal })
    }

    pub fn point(&self) -> DVec3 {
        self.point
    }

    pub fn normal(&self) -> DVec3 {
        self.normal
    }

    /// Forward distance to the plane, if the ray crosses it.
    pub fn hit(&self, ray: &Ray) -> Option<f64> {
        let to_plane = self.point - ray.origin();
        if is_zero(to_plane.length()) {
            return None;
        }

        let nv = self.normal.dot(ray.direction());
        // Parallel rays never cross the plane
        if is_zero(nv) {
            return None;
        }

        let t = align_zero(self.normal.dot(to_plane) / nv);
        (t > 0.0).then_some(t)
    }

    pub fn hits(&self, ray: &Ray) -> Vec<f64> {
        self.hit(ray).into_iter().collect()
    }
}
