//! Polygon with a polygonal hole cut out of it.

use super::{GeometryError, Polygon};
use lumen_math::{is_zero, Aabb, DVec3, Ray};

/// An outer polygon minus an inner polygon lying in the same plane.
#[derive(Debug, Clone)]
pub struct PolygonWithHole {
    outer: Polygon,
    inner: Polygon,
}

impl PolygonWithHole {
    pub fn new(outer: Polygon, inner: Polygon) -> Result<Self, GeometryError> {
        let n = outer.normal();
        let origin = outer.vertices()[0];
        for (index, v) in inner.vertices().iter().enumerate() {
            if !is_zero((*v - origin).dot(n)) {
                return Err(GeometryError::HoleNotCoplanar { index });
            }
        }
        Ok(Self { outer, inner })
    }

    pub fn outer(&self) -> &Polygon {
        &self.outer
    }

    pub fn inner(&self) -> &Polygon {
        &self.inner
    }

    pub fn normal(&self) -> DVec3 {
        self.outer.normal()
    }

    pub fn bounding_box(&self) -> Aabb {
        self.outer.bounding_box()
    }

    /// Hits of the outer polygon, unless the ray passes through the hole.
    pub fn hits(&self, ray: &Ray) -> Vec<f64> {
        let outer = self.outer.hits(ray);
        if outer.is_empty() || !self.inner.hits(ray).is_empty() {
            return Vec::new();
        }
        outer
    }
}
