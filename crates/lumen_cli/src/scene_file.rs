//! JSON scene description.
//!
//! A scene file names the camera, render settings, geometries and lights.
//! Geometries and lights are tagged by `type`. Vectors are `[x, y, z]`
//! arrays; material coefficients are either a single number or an RGB
//! triple.

use lumen_math::{DVec3, Ray};
use lumen_tracer::{
    Camera, CameraError, ConfigError, Cylinder, DirectionalLight, Geometry, GeometryError,
    LightError, LightSource, Material, Plane, PointLight, Polygon, PolygonWithHole, RenderConfig, Scene,
    Shape, Sphere, SpotLight, ThreadMode, Triangle, Tube,
};
use serde::Deserialize;
use thiserror::Error;

/// Errors turning a scene description into renderable objects.
#[derive(Error, Debug)]
pub enum SceneFileError {
    #[error("invalid scene JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("geometry #{index}: {source}")]
    Geometry {
        index: usize,
        #[source]
        source: GeometryError,
    },

    #[error("light #{index}: {source}")]
    Light {
        index: usize,
        #[source]
        source: LightError,
    },

    #[error(transparent)]
    Camera(#[from] CameraError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

type Vec3 = [f64; 3];

fn vec3(v: Vec3) -> DVec3 {
    DVec3::from_array(v)
}

fn default_name() -> String {
    "untitled".to_string()
}

fn default_true() -> bool {
    true
}

/// Top-level scene file.
#[derive(Debug, Deserialize)]
pub struct SceneFile {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub background: Vec3,
    #[serde(default)]
    pub ambient: Vec3,
    pub camera: CameraDesc,
    #[serde(default)]
    pub render: RenderDesc,
    #[serde(default)]
    pub geometries: Vec<GeometryDesc>,
    #[serde(default)]
    pub lights: Vec<LightDesc>,
    /// Build a BVH over the geometries
    #[serde(default = "default_true")]
    pub bvh: bool,
}

fn default_up() -> Vec3 {
    [0.0, 1.0, 0.0]
}

fn default_distance() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CameraDesc {
    pub position: Vec3,
    pub look_at: Vec3,
    #[serde(default = "default_up")]
    pub up: Vec3,
    /// View plane size in world units
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_distance")]
    pub distance: f64,
    /// Image size as `[columns, rows]`
    pub resolution: [u32; 2],
}

/// Render settings; every field falls back to [`RenderConfig::default`].
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderDesc {
    pub max_level: u32,
    pub min_k: f64,
    pub delta: f64,
    /// `0` sequential, `-1` rayon, `N > 0` a pool of N workers
    pub threads: i32,
    pub progress_interval: u32,
}

impl Default for RenderDesc {
    fn default() -> Self {
        let config = RenderConfig::default();
        Self {
            max_level: config.max_level,
            min_k: config.min_k,
            delta: config.delta,
            threads: -1,
            progress_interval: config.progress_interval,
        }
    }
}

/// A coefficient given as one number for all channels or as RGB.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum Coefficient {
    Uniform(f64),
    Rgb(Vec3),
}

impl From<Coefficient> for DVec3 {
    fn from(k: Coefficient) -> Self {
        match k {
            Coefficient::Uniform(k) => DVec3::splat(k),
            Coefficient::Rgb(rgb) => vec3(rgb),
        }
    }
}

fn zero() -> Coefficient {
    Coefficient::Uniform(0.0)
}

fn one() -> Coefficient {
    Coefficient::Uniform(1.0)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaterialDesc {
    #[serde(default = "one")]
    pub ka: Coefficient,
    #[serde(default = "zero")]
    pub kd: Coefficient,
    #[serde(default = "zero")]
    pub ks: Coefficient,
    #[serde(default = "zero")]
    pub kt: Coefficient,
    #[serde(default = "zero")]
    pub kr: Coefficient,
    #[serde(default)]
    pub shininess: u32,
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self {
            ka: one(),
            kd: zero(),
            ks: zero(),
            kt: zero(),
            kr: zero(),
            shininess: 0,
        }
    }
}

impl From<&MaterialDesc> for Material {
    fn from(m: &MaterialDesc) -> Self {
        Material::new()
            .with_ka(m.ka)
            .with_kd(m.kd)
            .with_ks(m.ks)
            .with_kt(m.kt)
            .with_kr(m.kr)
            .with_shininess(m.shininess)
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeDesc {
    Sphere {
        center: Vec3,
        radius: f64,
    },
    Plane {
        point: Vec3,
        normal: Vec3,
    },
    Triangle {
        vertices: [Vec3; 3],
    },
    Polygon {
        vertices: Vec<Vec3>,
    },
    PolygonWithHole {
        outer: Vec<Vec3>,
        inner: Vec<Vec3>,
    },
    Tube {
        origin: Vec3,
        direction: Vec3,
        radius: f64,
    },
    Cylinder {
        origin: Vec3,
        direction: Vec3,
        radius: f64,
        height: f64,
    },
}

fn axis(shape: &'static str, origin: Vec3, direction: Vec3) -> Result<Ray, GeometryError> {
    Ray::new(vec3(origin), vec3(direction)).map_err(|source| GeometryError::Math { shape, source })
}

fn polygon(vertices: &[Vec3]) -> Result<Polygon, GeometryError> {
    Polygon::new(vertices.iter().copied().map(vec3).collect())
}

impl ShapeDesc {
    pub fn to_shape(&self) -> Result<Shape, GeometryError> {
        let shape = match self {
            ShapeDesc::Sphere { center, radius } => Sphere::new(vec3(*center), *radius)?.into(),
            ShapeDesc::Plane { point, normal } => Plane::new(vec3(*point), vec3(*normal))?.into(),
            ShapeDesc::Triangle { vertices: [a, b, c] } => {
                Triangle::new(vec3(*a), vec3(*b), vec3(*c))?.into()
            }
            ShapeDesc::Polygon { vertices } => polygon(vertices)?.into(),
            ShapeDesc::PolygonWithHole { outer, inner } => {
                PolygonWithHole::new(polygon(outer)?, polygon(inner)?)?.into()
            }
            ShapeDesc::Tube {
                origin,
                direction,
                radius,
            } => Tube::new(axis("tube", *origin, *direction)?, *radius)?.into(),
            ShapeDesc::Cylinder {
                origin,
                direction,
                radius,
                height,
            } => Cylinder::new(axis("cylinder", *origin, *direction)?, *radius, *height)?.into(),
        };
        Ok(shape)
    }
}

#[derive(Debug, Deserialize)]
pub struct GeometryDesc {
    #[serde(flatten)]
    pub shape: ShapeDesc,
    #[serde(default)]
    pub material: MaterialDesc,
    #[serde(default)]
    pub emission: Vec3,
}

impl GeometryDesc {
    pub fn to_geometry(&self) -> Result<Geometry, GeometryError> {
        Ok(Geometry::new(self.shape.to_shape()?)
            .with_material(Material::from(&self.material))
            .with_emission(vec3(self.emission)))
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SoftShadowDesc {
    pub radius: f64,
    pub samples: usize,
}

fn default_kc() -> f64 {
    1.0
}

fn default_narrow_beam() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum LightDesc {
    Directional {
        intensity: Vec3,
        direction: Vec3,
    },
    Point {
        intensity: Vec3,
        position: Vec3,
        #[serde(default = "default_kc")]
        kc: f64,
        #[serde(default)]
        kl: f64,
        #[serde(default)]
        kq: f64,
        #[serde(default)]
        soft_shadow: Option<SoftShadowDesc>,
    },
    Spot {
        intensity: Vec3,
        position: Vec3,
        direction: Vec3,
        #[serde(default = "default_kc")]
        kc: f64,
        #[serde(default)]
        kl: f64,
        #[serde(default)]
        kq: f64,
        #[serde(default = "default_narrow_beam")]
        narrow_beam: f64,
        #[serde(default)]
        soft_shadow: Option<SoftShadowDesc>,
    },
}

impl LightDesc {
    pub fn to_light(&self) -> Result<Box<dyn LightSource>, LightError> {
        let light: Box<dyn LightSource> = match self {
            LightDesc::Directional {
                intensity,
                direction,
            } => Box::new(DirectionalLight::new(vec3(*intensity), vec3(*direction))?),
            LightDesc::Point {
                intensity,
                position,
                kc,
                kl,
                kq,
                soft_shadow,
            } => {
                let mut light = PointLight::new(vec3(*intensity), vec3(*position))
                    .with_attenuation(*kc, *kl, *kq)?;
                if let Some(soft) = soft_shadow {
                    light = light.with_soft_shadow(soft.radius, soft.samples);
                }
                Box::new(light)
            }
            LightDesc::Spot {
                intensity,
                position,
                direction,
                kc,
                kl,
                kq,
                narrow_beam,
                soft_shadow,
            } => {
                let mut light = SpotLight::new(vec3(*intensity), vec3(*position), vec3(*direction))?
                    .with_attenuation(*kc, *kl, *kq)?
                    .with_narrow_beam(*narrow_beam);
                if let Some(soft) = soft_shadow {
                    light = light.with_soft_shadow(soft.radius, soft.samples);
                }
                Box::new(light)
            }
        };
        Ok(light)
    }
}

impl SceneFile {
    pub fn from_json(json: &str) -> Result<Self, SceneFileError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the scene, honoring the file's `bvh` flag.
    pub fn to_scene(&self) -> Result<Scene, SceneFileError> {
        let mut builder = Scene::builder(self.name.clone())
            .with_background(vec3(self.background))
            .with_ambient(vec3(self.ambient))
            .with_bvh(self.bvh);

        for (index, desc) in self.geometries.iter().enumerate() {
            let geometry = desc
                .to_geometry()
                .map_err(|source| SceneFileError::Geometry { index, source })?;
            builder.add_geometry(Box::new(geometry));
        }
        for (index, desc) in self.lights.iter().enumerate() {
            let light = desc
                .to_light()
                .map_err(|source| SceneFileError::Light { index, source })?;
            builder.add_light(light);
        }

        log::debug!(
            "Scene '{}': {} geometries, {} lights",
            self.name,
            self.geometries.len(),
            self.lights.len()
        );
        Ok(builder.build())
    }

    pub fn to_camera(&self) -> Result<Camera, SceneFileError> {
        let c = &self.camera;
        let camera = Camera::look_at(vec3(c.position), vec3(c.look_at), vec3(c.up))
            .view_plane_size(c.width, c.height)
            .view_plane_distance(c.distance)
            .resolution(c.resolution[0], c.resolution[1])
            .build()?;
        Ok(camera)
    }

    pub fn to_render_config(&self) -> Result<RenderConfig, SceneFileError> {
        let r = &self.render;
        let config = RenderConfig {
            max_level: r.max_level,
            min_k: r.min_k,
            delta: r.delta,
            threads: ThreadMode::try_from(r.threads)?,
            progress_interval: r.progress_interval,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_tracer::{render, Intersectable};

    const FULL: &str = r#"{
        "name": "everything",
        "background": [0.1, 0.1, 0.2],
        "ambient": [0.15, 0.15, 0.15],
        "camera": {
            "position": [0, 2, 10],
            "look_at": [0, 0, 0],
            "width": 4, "height": 3, "distance": 5,
            "resolution": [8, 6]
        },
        "render": { "max_level": 4, "threads": 2, "progress_interval": 0 },
        "geometries": [
            { "type": "sphere", "center": [0, 1, 0], "radius": 1,
              "material": { "kd": 0.5, "ks": [0.2, 0.3, 0.4], "shininess": 20 },
              "emission": [0.1, 0, 0] },
            { "type": "plane", "point": [0, 0, 0], "normal": [0, 1, 0],
              "material": { "kr": 0.3 } },
            { "type": "triangle", "vertices": [[-3, 0, -2], [3, 0, -2], [0, 3, -2]] },
            { "type": "polygon", "vertices": [[-1, 0, -3], [1, 0, -3], [1, 2, -3], [-1, 2, -3]] },
            { "type": "polygon_with_hole",
              "outer": [[-2, 0, -4], [2, 0, -4], [2, 4, -4], [-2, 4, -4]],
              "inner": [[-1, 1, -4], [1, 1, -4], [1, 3, -4], [-1, 3, -4]] },
            { "type": "tube", "origin": [5, 0, 0], "direction": [0, 1, 0], "radius": 0.5 },
            { "type": "cylinder", "origin": [-4, 0, 0], "direction": [0, 1, 0],
              "radius": 0.5, "height": 2 }
        ],
        "lights": [
            { "type": "directional", "intensity": [0.3, 0.3, 0.3], "direction": [0, -1, -1] },
            { "type": "point", "intensity": [1, 1, 1], "position": [2, 5, 2], "kl": 0.01,
              "soft_shadow": { "radius": 0.5, "samples": 8 } },
            { "type": "spot", "intensity": [1, 0.8, 0.6], "position": [-2, 5, 2],
              "direction": [1, -2, -1], "narrow_beam": 8 }
        ]
    }"#;

    #[test]
    fn test_parse_full_scene() {
        let file = SceneFile::from_json(FULL).unwrap();
        assert_eq!(file.name, "everything");
        assert_eq!(file.geometries.len(), 7);
        assert_eq!(file.lights.len(), 3);
        assert!(file.bvh);

        let scene = file.to_scene().unwrap();
        assert_eq!(scene.lights().len(), 3);
        assert_eq!(scene.ambient(), DVec3::splat(0.15));

        let config = file.to_render_config().unwrap();
        assert_eq!(config.max_level, 4);
        assert_eq!(config.threads, ThreadMode::Pool(2));
        assert_eq!(config.delta, RenderConfig::default().delta);

        let camera = file.to_camera().unwrap();
        assert_eq!(camera.resolution(), (8, 6));
    }

    #[test]
    fn test_material_coefficients() {
        let file = SceneFile::from_json(FULL).unwrap();
        let sphere = file.geometries[0].to_geometry().unwrap();
        let material = sphere.material();

        assert_eq!(material.ka, DVec3::ONE);
        assert_eq!(material.kd, DVec3::splat(0.5));
        assert_eq!(material.ks, DVec3::new(0.2, 0.3, 0.4));
        assert_eq!(material.shininess, 20);
        assert_eq!(sphere.emission(), DVec3::new(0.1, 0.0, 0.0));
    }

    #[test]
    fn test_minimal_scene_defaults() {
        let json = r#"{
            "camera": { "position": [0, 0, 0], "look_at": [0, 0, -1],
                        "width": 1, "height": 1, "resolution": [2, 2] }
        }"#;
        let file = SceneFile::from_json(json).unwrap();
        assert_eq!(file.name, "untitled");
        assert!(file.geometries.is_empty());

        let config = file.to_render_config().unwrap();
        assert_eq!(config.threads, ThreadMode::Parallel);
        assert_eq!(config.max_level, 10);

        let scene = file.to_scene().unwrap();
        let ray = Ray::new(DVec3::ZERO, -DVec3::Z).unwrap();
        assert!(scene.geometries().intersect(&ray).is_empty());
    }

    #[test]
    fn test_invalid_geometry_reports_index() {
        let json = r#"{
            "camera": { "position": [0, 0, 0], "look_at": [0, 0, -1],
                        "width": 1, "height": 1, "resolution": [2, 2] },
            "geometries": [
                { "type": "sphere", "center": [0, 0, -5], "radius": 1 },
                { "type": "sphere", "center": [0, 0, -5], "radius": -1 }
            ]
        }"#;
        let err = SceneFile::from_json(json).unwrap().to_scene().err().unwrap();
        assert!(matches!(err, SceneFileError::Geometry { index: 1, .. }));
        assert_eq!(
            err.to_string(),
            "geometry #1: sphere: radius must be positive, got -1"
        );
    }

    #[test]
    fn test_zero_tube_axis_is_rejected() {
        let desc = ShapeDesc::Tube {
            origin: [0.0; 3],
            direction: [0.0; 3],
            radius: 1.0,
        };
        assert!(matches!(
            desc.to_shape(),
            Err(GeometryError::Math { shape: "tube", .. })
        ));
    }

    #[test]
    fn test_unknown_geometry_type() {
        let json = r#"{
            "camera": { "position": [0, 0, 0], "look_at": [0, 0, -1],
                        "width": 1, "height": 1, "resolution": [2, 2] },
            "geometries": [ { "type": "torus", "radius": 1 } ]
        }"#;
        assert!(matches!(
            SceneFile::from_json(json),
            Err(SceneFileError::Parse(_))
        ));
    }

    #[test]
    fn test_zero_attenuation_is_rejected() {
        let json = r#"{
            "camera": { "position": [0, 0, 0], "look_at": [0, 0, -1],
                        "width": 1, "height": 1, "resolution": [2, 2] },
            "lights": [
                { "type": "point", "intensity": [1, 1, 1], "position": [0, 5, 0] },
                { "type": "spot", "intensity": [1, 1, 1], "position": [0, 5, 0],
                  "direction": [0, -1, 0], "kc": 0 }
            ]
        }"#;
        let err = SceneFile::from_json(json).unwrap().to_scene().err().unwrap();
        assert!(matches!(
            err,
            SceneFileError::Light {
                index: 1,
                source: LightError::Attenuation { .. }
            }
        ));
    }

    #[test]
    fn test_negative_shininess_is_rejected() {
        let json = r#"{
            "camera": { "position": [0, 0, 0], "look_at": [0, 0, -1],
                        "width": 1, "height": 1, "resolution": [2, 2] },
            "geometries": [
                { "type": "sphere", "center": [0, 0, -5], "radius": 1,
                  "material": { "ks": 0.5, "shininess": -3 } }
            ]
        }"#;
        assert!(matches!(
            SceneFile::from_json(json),
            Err(SceneFileError::Parse(_))
        ));
    }

    #[test]
    fn test_bad_thread_count() {
        let json = r#"{
            "camera": { "position": [0, 0, 0], "look_at": [0, 0, -1],
                        "width": 1, "height": 1, "resolution": [2, 2] },
            "render": { "threads": -3 }
        }"#;
        let err = SceneFile::from_json(json)
            .unwrap()
            .to_render_config()
            .unwrap_err();
        assert!(matches!(
            err,
            SceneFileError::Config(ConfigError::ThreadCount(-3))
        ));
    }

    #[test]
    fn test_render_full_scene() {
        let file = SceneFile::from_json(FULL).unwrap();
        let scene = file.to_scene().unwrap();
        let camera = file.to_camera().unwrap();
        let config = file.to_render_config().unwrap();

        let image = render(&scene, &camera, &config).unwrap();
        assert_eq!((image.width, image.height), (8, 6));
        assert!(image.pixels.iter().all(|c| c.is_finite()));
    }
}
