//! Intersectable trait, Intersection record and the Group composite.

use crate::{Geometry, Material};
use lumen_math::{Aabb, DVec3, Interval, Ray};

/// A single ray/surface hit.
///
/// Borrows the geometry that was hit and carries a copy of its material,
/// so shading never writes to shared scene state.
#[derive(Debug, Clone, Copy)]
pub struct Intersection<'a> {
    /// Geometry that was hit
    pub geometry: &'a Geometry,
    /// Hit point
    pub point: DVec3,
    /// Distance from the ray origin to the hit point
    pub distance: f64,
    /// Material of the hit surface
    pub material: Material,
}

/// Trait for anything a ray can be tested against.
pub trait Intersectable: Send + Sync {
    /// Every forward hit along `ray`, in no particular order.
    fn intersect<'a>(&'a self, ray: &Ray) -> Vec<Intersection<'a>>;

    /// Bounding box, or `None` when the object is empty or unbounded.
    fn bounding_box(&self) -> Option<Aabb>;

    /// The hit nearest to the ray origin.
    fn closest<'a>(&'a self, ray: &Ray) -> Option<Intersection<'a>> {
        closest_intersection(self.intersect(ray))
    }
}

/// Pick the intersection with the smallest distance.
pub fn closest_intersection(hits: Vec<Intersection<'_>>) -> Option<Intersection<'_>> {
    hits.into_iter()
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// An ordered collection of intersectables.
///
/// The group keeps the union of its children's boxes and skips all of
/// them when a ray misses it. A group holding any unbounded child has no
/// box and always tests its children.
pub struct Group {
    children: Vec<Box<dyn Intersectable>>,
    bbox: Option<Aabb>,
    unbounded: bool,
}

impl Group {
    /// Create a new empty group.
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
            bbox: None,
            unbounded: false,
        }
    }

    /// Add a child, growing the group's box.
    pub fn add(&mut self, child: Box<dyn Intersectable>) {
        match child.bounding_box() {
            None => {
                self.unbounded = true;
                self.bbox = None;
            }
            Some(b) if !self.unbounded => {
                self.bbox = Some(match self.bbox {
                    Some(current) => current.union(&b),
                    None => b,
                });
            }
            Some(_) => {}
        }
        self.children.push(child);
    }

    /// Builder-style variant of [`Group::add`].
    pub fn with(mut self, child: impl Intersectable + 'static) -> Self {
        self.add(Box::new(child));
        self
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Take the children out, e.g. to build a BVH over them.
    pub fn into_children(self) -> Vec<Box<dyn Intersectable>> {
        self.children
    }
}

impl Default for Group {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Box<dyn Intersectable>> for Group {
    fn from_iter<I: IntoIterator<Item = Box<dyn Intersectable>>>(iter: I) -> Self {
        let mut group = Group::new();
        for child in iter {
            group.add(child);
        }
        group
    }
}

impl Intersectable for Group {
    fn intersect<'a>(&'a self, ray: &Ray) -> Vec<Intersection<'a>> {
        if let Some(bbox) = &self.bbox {
            if !bbox.hit(ray, Interval::FORWARD) {
                return Vec::new();
            }
        }

        self.children
            .iter()
            .flat_map(|child| child.intersect(ray))
            .collect()
    }

    fn bounding_box(&self) -> Option<Aabb> {
        self.bbox
    }
}
