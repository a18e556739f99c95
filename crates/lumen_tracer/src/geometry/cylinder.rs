//! Finite, capped cylinder primitive.

use super::{GeometryError, Plane, Tube};
use lumen_math::{align_zero, is_zero, Aabb, DVec3, Ray};

/// A tube cut to `0 < s < height` along its axis and closed by two discs.
///
/// The bottom cap lies at the axis origin, the top cap `height` further
/// along the axis direction.
#[derive(Debug, Clone)]
pub struct Cylinder {
    tube: Tube,
    height: f64,
    bottom: Plane,
    top: Plane,
    bbox: Aabb,
}

impl Cylinder {
    pub fn new(axis: Ray, radius: f64, height: f64) -> Result<Self, GeometryError> {
        let tube = Tube::new(axis, radius).map_err(|err| match err {
            GeometryError::NonPositiveRadius { radius, .. } => GeometryError::NonPositiveRadius {
                shape: "cylinder",
                radius,
            },
            other => other,
        })?;
        if !(height > 0.0) {
            return Err(GeometryError::NonPositiveHeight(height));
        }

        let dir = axis.direction();
        let base = axis.origin();
        let apex = axis.at(height);
        let bottom = Plane::new(base, -dir)?;
        let top = Plane::new(apex, dir)?;

        // Each axis extends by r * sin(angle between the axis and that world axis)
        let sin = |c: f64| (1.0 - c * c).max(0.0).sqrt();
        let extent = DVec3::new(sin(dir.x), sin(dir.y), sin(dir.z)) * radius;
        let bbox = Aabb::from_points(base.min(apex) - extent, base.max(apex) + extent);

        Ok(Self {
            tube,
            height,
            bottom,
            top,
            bbox,
        })
    }

    pub fn axis(&self) -> &Ray {
        self.tube.axis()
    }

    pub fn radius(&self) -> f64 {
        self.tube.radius()
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    /// Outward normal: the axis direction on the caps, radial on the side.
    ///
    /// Undefined at the cap centers and on the axis.
    pub fn normal_at(&self, point: DVec3) -> Option<DVec3> {
        let s = self.tube.axial_offset(point);
        let cap = if is_zero(s) {
            Some(&self.bottom)
        } else if is_zero(s - self.height) {
            Some(&self.top)
        } else {
            None
        };

        match cap {
            Some(plane) if is_zero(plane.point().distance(point)) => None,
            Some(plane) => Some(plane.normal()),
            None => self.tube.normal_at(point),
        }
    }

    fn cap_hit(&self, plane: &Plane, ray: &Ray) -> Option<f64> {
        let t = plane.hit(ray)?;
        let r = self.tube.radius();
        let inside = align_zero(r * r - plane.point().distance_squared(ray.at(t)));
        (inside > 0.0).then_some(t)
    }

    pub fn hits(&self, ray: &Ray) -> Vec<f64> {
        let mut hits: Vec<f64> = self
            .tube
            .hits(ray)
            .into_iter()
            .filter(|t| {
                let s = self.tube.axial_offset(ray.at(*t));
                s > 0.0 && align_zero(s - self.height) < 0.0
            })
            .collect();

        hits.extend(self.cap_hit(&self.bottom, ray));
        hits.extend(self.cap_hit(&self.top, ray));
        hits
    }
}
