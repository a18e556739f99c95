//! Sphere primitive.

use super::GeometryError;
use lumen_math::{align_zero, is_zero, unit, Aabb, DVec3, Ray};

/// A sphere given by its center and a positive radius.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: DVec3,
    radius: f64,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: DVec3, radius: f64) -> Result<Self, GeometryError> {
        if !(radius > 0.0) {
            return Err(GeometryError::NonPositiveRadius {
                shape: "sphere",
                radius,
            });
        }
        let rvec = DVec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Ok(Self {
            center,
            radius,
            bbox,
        })
    }

    pub fn center(&self) -> DVec3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    /// Outward normal; undefined at the center.
    pub fn normal_at(&self, point: DVec3) -> Option<DVec3> {
        unit(point - self.center).ok()
    }

    /// Forward roots of `|P0 + tV - C|^2 = r^2`, near root first.
    pub fn hits(&self, ray: &Ray) -> Vec<f64> {
        let u = self.center - ray.origin();
        if is_zero(u.length()) {
            return vec![self.radius];
        }

        // Projection of the center on the ray, and squared distance from it
        let tm = ray.direction().dot(u);
        let d2 = u.length_squared() - tm * tm;
        let th2 = align_zero(self.radius * self.radius - d2);
        // A tangent ray grazes the surface without entering it
        if th2 <= 0.0 {
            return Vec::new();
        }

        let th = th2.sqrt();
        [tm - th, tm + th]
            .into_iter()
            .map(align_zero)
            .filter(|t| *t > 0.0)
            .collect()
    }
}
