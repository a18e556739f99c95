use crate::{is_zero, DVec3, Interval, MathError, Ray};

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// Invariant: `min <= max` on every axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    min: DVec3,
    max: DVec3,
}

impl Aabb {
    /// Create a box from its min and max corners.
    ///
    /// Fails if `min` exceeds `max` on any axis.
    pub fn new(min: DVec3, max: DVec3) -> Result<Self, MathError> {
        for axis in 0..3 {
            if min[axis] > max[axis] {
                return Err(MathError::InvertedBox { min, max, axis });
            }
        }
        Ok(Self { min, max })
    }

    /// Create an AABB from two arbitrary corner points.
    pub fn from_points(a: DVec3, b: DVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Smallest box holding every point, or `None` for no points.
    pub fn from_vertices<'a>(points: impl IntoIterator<Item = &'a DVec3>) -> Option<Self> {
        points.into_iter().fold(None, |acc: Option<Aabb>, p| {
            Some(match acc {
                Some(b) => b.union(&Aabb::from_points(*p, *p)),
                None => Aabb::from_points(*p, *p),
            })
        })
    }

    /// Union of every box, or `None` for an empty collection.
    pub fn surrounding_all(boxes: impl IntoIterator<Item = Aabb>) -> Option<Self> {
        boxes.into_iter().reduce(|acc, b| acc.union(&b))
    }

    #[inline]
    pub fn min(&self) -> DVec3 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> DVec3 {
        self.max
    }

    /// Create an AABB that surrounds both boxes.
    pub fn union(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Returns true if `other` lies entirely inside this box.
    pub fn contains(&self, other: &Aabb) -> bool {
        self.min.cmple(other.min).all() && self.max.cmpge(other.max).all()
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        Interval::new(self.min[n], self.max[n])
    }

    /// Test if a ray intersects this AABB within the given interval.
    ///
    /// Uses the slab method. A direction component that is nearly zero
    /// keeps the ray inside that slab only if its origin already is.
    pub fn hit(&self, ray: &Ray, mut ray_t: Interval) -> bool {
        let origin = ray.origin();
        let direction = ray.direction();

        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let d = direction[axis];
            let o = origin[axis];

            if is_zero(d) {
                if !slab.contains(o) {
                    return false;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t0 = (slab.min - o) * inv;
            let mut t1 = (slab.max - o) * inv;
            if inv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            ray_t = ray_t.intersect(&Interval::new(t0, t1));
            if ray_t.is_empty() {
                return false;
            }
        }

        true
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    pub fn longest_axis(&self) -> usize {
        let size = self.max - self.min;

        if size.x > size.y && size.x > size.z {
            0
        } else if size.y > size.z {
            1
        } else {
            2
        }
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }
}
