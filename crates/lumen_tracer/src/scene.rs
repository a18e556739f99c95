//! Scene container and builder.

use crate::{Bvh, Color, Group, Intersectable, LightSource};

/// Everything the tracer reads while rendering. Immutable once built.
pub struct Scene {
    name: String,
    background: Color,
    ambient: Color,
    geometries: Box<dyn Intersectable>,
    lights: Vec<Box<dyn LightSource>>,
}

impl Scene {
    /// Start describing a scene.
    pub fn builder(name: impl Into<String>) -> SceneBuilder {
        SceneBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Ambient light intensity.
    pub fn ambient(&self) -> Color {
        self.ambient
    }

    pub fn geometries(&self) -> &dyn Intersectable {
        self.geometries.as_ref()
    }

    pub fn lights(&self) -> &[Box<dyn LightSource>] {
        &self.lights
    }
}

/// Builder for [`Scene`].
pub struct SceneBuilder {
    name: String,
    background: Color,
    ambient: Color,
    geometries: Group,
    lights: Vec<Box<dyn LightSource>>,
    bvh: bool,
}

impl SceneBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            background: Color::ZERO,
            ambient: Color::ZERO,
            geometries: Group::new(),
            lights: Vec::new(),
            bvh: false,
        }
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_ambient(mut self, ambient: Color) -> Self {
        self.ambient = ambient;
        self
    }

    pub fn with_geometry(mut self, geometry: impl Intersectable + 'static) -> Self {
        self.geometries.add(Box::new(geometry));
        self
    }

    pub fn add_geometry(&mut self, geometry: Box<dyn Intersectable>) {
        self.geometries.add(geometry);
    }

    pub fn with_light(mut self, light: impl LightSource + 'static) -> Self {
        self.lights.push(Box::new(light));
        self
    }

    pub fn add_light(&mut self, light: Box<dyn LightSource>) {
        self.lights.push(light);
    }

    /// Accelerate the geometry with a BVH when it has more than two members.
    pub fn with_bvh(mut self, bvh: bool) -> Self {
        self.bvh = bvh;
        self
    }

    pub fn build(self) -> Scene {
        if self.geometries.is_empty() {
            log::warn!("Scene '{}' has no geometry", self.name);
        }
        if self.lights.is_empty() {
            log::debug!("Scene '{}' has no lights, only ambient and emission", self.name);
        }

        let geometries: Box<dyn Intersectable> = if self.bvh && self.geometries.len() > 2 {
            Box::new(Bvh::build(self.geometries.into_children()))
        } else {
            Box::new(self.geometries)
        };

        Scene {
            name: self.name,
            background: self.background,
            ambient: self.ambient,
            geometries,
            lights: self.lights,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Geometry, Sphere};
    use crate::light::PointLight;
    use lumen_math::{DVec3, Ray};

    fn ball(x: f64) -> Geometry {
        Geometry::new(Sphere::new(DVec3::new(x, 0.0, -10.0), 1.0).unwrap())
    }

    #[test]
    fn test_scene_builder() {
        let scene = Scene::builder("test")
            .with_background(Color::new(0.1, 0.2, 0.3))
            .with_ambient(Color::splat(0.15))
            .with_geometry(ball(0.0))
            .with_light(PointLight::new(Color::ONE, DVec3::Y * 10.0))
            .build();

        assert_eq!(scene.name(), "test");
        assert_eq!(scene.background(), Color::new(0.1, 0.2, 0.3));
        assert_eq!(scene.ambient(), Color::splat(0.15));
        assert_eq!(scene.lights().len(), 1);

        let ray = Ray::new(DVec3::ZERO, -DVec3::Z).unwrap();
        assert_eq!(scene.geometries().intersect(&ray).len(), 2);
    }

    #[test]
    fn test_bvh_and_flat_scenes_agree() {
        let make = |bvh| {
            (0..6)
                .fold(Scene::builder("row"), |b, i| b.with_geometry(ball(i as f64 * 3.0)))
                .with_bvh(bvh)
                .build()
        };
        let flat = make(false);
        let accelerated = make(true);

        for x in [0.0, 3.0, 4.5, 9.0, 15.0] {
            let ray = Ray::new(DVec3::new(x, 0.0, 0.0), -DVec3::Z).unwrap();
            assert_eq!(
                flat.geometries().intersect(&ray).len(),
                accelerated.geometries().intersect(&ray).len()
            );
        }
    }

    #[test]
    fn test_empty_scene() {
        let scene = Scene::builder("empty").with_bvh(true).build();
        let ray = Ray::new(DVec3::ZERO, DVec3::X).unwrap();
        assert!(scene.geometries().closest(&ray).is_none());
        assert!(scene.geometries().bounding_box().is_none());
    }
}
