//! Infinite tube (uncapped cylinder) primitive.

use super::GeometryError;
use lumen_math::{align_zero, is_zero, unit, DVec3, Ray};

/// All points at distance `radius` from an axis line.
#[derive(Debug, Clone)]
pub struct Tube {
    axis: Ray,
    radius: f64,
}

impl Tube {
    pub fn new(axis: Ray, radius: f64) -> Result<Self, GeometryError> {
        if !(radius > 0.0) {
            return Err(GeometryError::NonPositiveRadius {
                shape: "tube",
                radius,
            });
        }
        Ok(Self { axis, radius })
    }

    pub fn axis(&self) -> &Ray {
        &self.axis
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Signed position of the projection of `point` along the axis.
    pub(crate) fn axial_offset(&self, point: DVec3) -> f64 {
        align_zero(self.axis.direction().dot(point - self.axis.origin()))
    }

    /// Outward normal; undefined on the axis itself.
    pub fn normal_at(&self, point: DVec3) -> Option<DVec3> {
        let center = self.axis.at(self.axial_offset(point));
        unit(point - center).ok()
    }

    /// Forward roots of the quadric, solved in the plane orthogonal to the axis.
    pub fn hits(&self, ray: &Ray) -> Vec<f64> {
        let va = self.axis.direction();
        let v = ray.direction();
        let dp = ray.origin() - self.axis.origin();

        let v_perp = v - va * v.dot(va);
        let dp_perp = dp - va * dp.dot(va);

        let a = v_perp.length_squared();
        // Rays along the axis never cross the wall
        if is_zero(a) {
            return Vec::new();
        }
        let b = 2.0 * v_perp.dot(dp_perp);
        let c = dp_perp.length_squared() - self.radius * self.radius;

        let discriminant = align_zero(b * b - 4.0 * a * c);
        if discriminant <= 0.0 {
            return Vec::new();
        }

        let sqrtd = discriminant.sqrt();
        [(-b - sqrtd) / (2.0 * a), (-b + sqrtd) / (2.0 * a)]
            .into_iter()
            .map(align_zero)
            .filter(|t| *t > 0.0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn z_tube() -> Tube {
        Tube::new(Ray::new(DVec3::ZERO, DVec3::Z).unwrap(), 1.0).unwrap()
    }

    fn assert_near(a: DVec3, b: DVec3) {
        assert!((a - b).length() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_tube_rejects_bad_radius() {
        let axis = Ray::new(DVec3::ZERO, DVec3::Z).unwrap();
        assert!(Tube::new(axis, 0.0).is_err());
        assert!(Tube::new(axis, -3.0).is_err());
    }

    #[test]
    fn test_tube_normal() {
        let tube = z_tube();
        let n = tube.normal_at(DVec3::new(0.0, 1.0, 7.0)).unwrap();
        assert_near(n, DVec3::Y);

        let n = tube.normal_at(DVec3::new(0.6, -0.8, -3.0)).unwrap();
        assert!((n.length() - 1.0).abs() < 1e-12);
        assert!(n.dot(DVec3::Z).abs() < 1e-12);
    }

    #[test]
    fn test_tube_normal_undefined_on_axis() {
        assert!(z_tube().normal_at(DVec3::new(0.0, 0.0, 4.0)).is_none());
    }

    #[test]
    fn test_tube_crossing_ray() {
        let tube = z_tube();
        let ray = Ray::new(DVec3::new(-3.0, 0.0, 2.0), DVec3::X).unwrap();

        let hits = tube.hits(&ray);
        assert_eq!(hits.len(), 2);
        assert_near(ray.at(hits[0]), DVec3::new(-1.0, 0.0, 2.0));
        assert_near(ray.at(hits[1]), DVec3::new(1.0, 0.0, 2.0));
    }

    #[test]
    fn test_tube_oblique_ray_from_inside() {
        let tube = z_tube();
        let ray = Ray::new(DVec3::ZERO, DVec3::new(1.0, 0.0, 1.0)).unwrap();

        let hits = tube.hits(&ray);
        assert_eq!(hits.len(), 1);
        assert_near(ray.at(hits[0]), DVec3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn test_tube_misses() {
        let tube = z_tube();

        // Parallel to the axis
        let parallel = Ray::new(DVec3::new(0.5, 0.0, 0.0), DVec3::Z).unwrap();
        assert!(tube.hits(&parallel).is_empty());

        // Passing outside
        let outside = Ray::new(DVec3::new(-3.0, 2.0, 0.0), DVec3::X).unwrap();
        assert!(tube.hits(&outside).is_empty());

        // Tangent
        let tangent = Ray::new(DVec3::new(-3.0, 1.0, 0.0), DVec3::X).unwrap();
        assert!(tube.hits(&tangent).is_empty());

        // Pointing away
        let away = Ray::new(DVec3::new(3.0, 0.0, 0.0), DVec3::X).unwrap();
        assert!(tube.hits(&away).is_empty());
    }
}
