//! Geometric primitives.
//!
//! Every primitive is a [`Shape`] variant wrapped in a [`Geometry`], which
//! adds the surface material and emission. Shapes solve the ray/surface
//! equation in closed form and return the forward ray distances of every
//! hit; `Geometry` turns those into [`Intersection`]s.

mod cylinder;
mod plane;
mod polygon;
mod polygon_with_hole;
mod sphere;
mod tube;

pub use cylinder::Cylinder;
pub use plane::Plane;
pub use polygon::{Polygon, Triangle};
pub use polygon_with_hole::PolygonWithHole;
pub use sphere::Sphere;
pub use tube::Tube;

use crate::{Color, Intersectable, Intersection, Material};
use lumen_math::{Aabb, DVec3, MathError, Ray};
use thiserror::Error;

/// Errors raised while constructing a primitive.
///
/// A failed constructor never yields a partially valid shape.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("{shape}: radius must be positive, got {radius}")]
    NonPositiveRadius { shape: &'static str, radius: f64 },

    #[error("cylinder: height must be positive, got {0}")]
    NonPositiveHeight(f64),

    #[error("polygon: needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("polygon: vertices {first} and {second} coincide at {point}")]
    RepeatedVertex {
        first: usize,
        second: usize,
        point: DVec3,
    },

    #[error("{shape}: points around vertex {index} are collinear")]
    Collinear { shape: &'static str, index: usize },

    #[error("polygon: vertex {index} at {point} is not in the plane of the first three vertices")]
    NonPlanar { index: usize, point: DVec3 },

    #[error("polygon: vertex {index} breaks the ordering or convexity of the outline")]
    NonConvex { index: usize },

    #[error("polygon with hole: hole vertex {index} is not in the outer polygon's plane")]
    HoleNotCoplanar { index: usize },

    #[error("{shape}: {source}")]
    Math {
        shape: &'static str,
        #[source]
        source: MathError,
    },
}

/// The closed set of primitive shapes.
#[derive(Debug, Clone)]
pub enum Shape {
    Sphere(Sphere),
    Plane(Plane),
    Triangle(Triangle),
    Polygon(Polygon),
    PolygonWithHole(PolygonWithHole),
    Tube(Tube),
    Cylinder(Cylinder),
}

impl Shape {
    /// Forward distances along `ray` of every hit, in no particular order.
    pub fn hits(&self, ray: &Ray) -> Vec<f64> {
        match self {
            Shape::Sphere(s) => s.hits(ray),
            Shape::Plane(p) => p.hits(ray),
            Shape::Triangle(t) => t.hits(ray),
            Shape::Polygon(p) => p.hits(ray),
            Shape::PolygonWithHole(p) => p.hits(ray),
            Shape::Tube(t) => t.hits(ray),
            Shape::Cylinder(c) => c.hits(ray),
        }
    }

    /// Unit outward normal at a surface point, `None` where it is undefined.
    pub fn normal_at(&self, point: DVec3) -> Option<DVec3> {
        match self {
            Shape::Sphere(s) => s.normal_at(point),
            Shape::Plane(p) => Some(p.normal()),
            Shape::Triangle(t) => Some(t.normal()),
            Shape::Polygon(p) => Some(p.normal()),
            Shape::PolygonWithHole(p) => Some(p.normal()),
            Shape::Tube(t) => t.normal_at(point),
            Shape::Cylinder(c) => c.normal_at(point),
        }
    }

    /// Bounding box, `None` for unbounded shapes (planes, tubes).
    pub fn bounding_box(&self) -> Option<Aabb> {
        match self {
            Shape::Sphere(s) => Some(s.bounding_box()),
            Shape::Plane(_) | Shape::Tube(_) => None,
            Shape::Triangle(t) => Some(t.bounding_box()),
            Shape::Polygon(p) => Some(p.bounding_box()),
            Shape::PolygonWithHole(p) => Some(p.bounding_box()),
            Shape::Cylinder(c) => Some(c.bounding_box()),
        }
    }
}

macro_rules! shape_from {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Shape {
                fn from(shape: $variant) -> Self {
                    Shape::$variant(shape)
                }
            }
        )*
    };
}

shape_from!(Sphere, Plane, Triangle, Polygon, PolygonWithHole, Tube, Cylinder);

/// A shape with its surface properties.
#[derive(Debug, Clone)]
pub struct Geometry {
    shape: Shape,
    material: Material,
    emission: Color,
}

impl Geometry {
    /// Wrap a shape with the default material and no emission.
    pub fn new(shape: impl Into<Shape>) -> Self {
        Self {
            shape: shape.into(),
            material: Material::default(),
            emission: Color::ZERO,
        }
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = emission;
        self
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn emission(&self) -> Color {
        self.emission
    }

    pub fn normal_at(&self, point: DVec3) -> Option<DVec3> {
        self.shape.normal_at(point)
    }
}

impl Intersectable for Geometry {
    fn intersect<'a>(&'a self, ray: &Ray) -> Vec<Intersection<'a>> {
        self.shape
            .hits(ray)
            .into_iter()
            .map(|t| Intersection {
                geometry: self,
                point: ray.at(t),
                distance: t,
                material: self.material,
            })
            .collect()
    }

    fn bounding_box(&self) -> Option<Aabb> {
        self.shape.bounding_box()
    }
}
