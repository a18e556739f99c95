//! Lumen - Whitted-style CPU ray tracer
//!
//! Casts rays from a pinhole camera through a view plane and shades them
//! recursively: Phong lighting with (soft) shadows, reflection and
//! refraction, pruned by a depth ceiling and a minimum-contribution
//! threshold. Geometry is accelerated with a median-split BVH and pixels
//! are distributed over threads by the scheduler.

pub mod bvh;
pub mod camera;
pub mod config;
pub mod geometry;
pub mod image;
pub mod intersectable;
pub mod light;
pub mod material;
pub mod scene;
pub mod scheduler;
pub mod tracer;

pub use bvh::{Bvh, BvhNode};
pub use camera::{Camera, CameraBuilder, CameraError};
pub use config::{ConfigError, RenderConfig, ThreadMode};
pub use geometry::{
    Cylinder, Geometry, GeometryError, Plane, Polygon, PolygonWithHole, Shape, Sphere, Triangle,
    Tube,
};
pub use image::{ImageBuffer, ImageError};
pub use intersectable::{closest_intersection, Group, Intersectable, Intersection};
pub use light::{
    DirectionalLight, LightError, LightSample, LightSource, PointLight, SoftShadow, SpotLight,
};
pub use material::{Coefficients, Color, Material};
pub use scene::{Scene, SceneBuilder};
pub use scheduler::{render, render_pixel, PixelManager, RenderError};
pub use tracer::RayTracer;

/// Re-export the math types used throughout the public API
pub use lumen_math::{Aabb, DVec3, Interval, MathError, Ray};
