//! Simple ray tracer example.
//!
//! Renders a small scene of spheres on a mirror floor under a spot light
//! with soft shadows and saves it as PNG.

use lumen_tracer::{
    material::uniform, render, Camera, Color, Cylinder, DVec3, Geometry, Material, Plane,
    PointLight, Ray, RenderConfig, Scene, Sphere, SpotLight, ThreadMode, Triangle,
};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let start = std::time::Instant::now();
    let scene = build_scene()?;
    println!("Scene built in {:?}", start.elapsed());

    let camera = Camera::look_at(DVec3::new(0.0, 3.0, 12.0), DVec3::new(0.0, 1.0, 0.0), DVec3::Y)
        .view_plane_size(8.0, 4.5)
        .view_plane_distance(10.0)
        .resolution(800, 450)
        .build()?;

    let config = RenderConfig::default().with_threads(ThreadMode::Parallel);
    let image = render(&scene, &camera, &config)?;

    let filename = "output.png";
    image.save_png(filename)?;
    println!("Saved to {}", filename);
    Ok(())
}

fn build_scene() -> Result<Scene, Box<dyn Error>> {
    let floor = Material::new()
        .with_ka(uniform(0.2))
        .with_kd(uniform(0.4))
        .with_kr(uniform(0.3));
    let glass = Material::new()
        .with_ka(uniform(0.1))
        .with_kd(uniform(0.2))
        .with_ks(uniform(0.6))
        .with_shininess(60)
        .with_kt(uniform(0.6));
    let matte = Material::new()
        .with_ka(uniform(0.2))
        .with_kd(uniform(0.6))
        .with_ks(uniform(0.3))
        .with_shininess(30);

    let scene = Scene::builder("simple")
        .with_background(Color::new(0.05, 0.07, 0.12))
        .with_ambient(Color::splat(0.15))
        .with_geometry(Geometry::new(Plane::new(DVec3::ZERO, DVec3::Y)?).with_material(floor))
        .with_geometry(
            Geometry::new(Sphere::new(DVec3::new(0.0, 1.0, 0.0), 1.0)?)
                .with_material(glass)
                .with_emission(Color::new(0.05, 0.1, 0.2)),
        )
        .with_geometry(
            Geometry::new(Sphere::new(DVec3::new(0.0, 1.0, 0.0), 0.4)?)
                .with_material(matte)
                .with_emission(Color::new(0.4, 0.1, 0.0)),
        )
        .with_geometry(
            Geometry::new(Sphere::new(DVec3::new(-3.0, 0.8, -1.0), 0.8)?)
                .with_material(matte)
                .with_emission(Color::new(0.1, 0.3, 0.1)),
        )
        .with_geometry(
            Geometry::new(Cylinder::new(
                Ray::new(DVec3::new(3.0, 0.0, -1.0), DVec3::Y)?,
                0.6,
                2.0,
            )?)
            .with_material(matte)
            .with_emission(Color::new(0.3, 0.2, 0.0)),
        )
        .with_geometry(
            Geometry::new(Triangle::new(
                DVec3::new(-6.0, 0.0, -5.0),
                DVec3::new(6.0, 0.0, -5.0),
                DVec3::new(0.0, 5.0, -5.0),
            )?)
            .with_material(matte)
            .with_emission(Color::new(0.1, 0.1, 0.15)),
        )
        .with_light(
            SpotLight::new(
                Color::splat(1.5),
                DVec3::new(4.0, 8.0, 4.0),
                DVec3::new(-1.0, -2.0, -1.0),
            )?
            .with_attenuation(1.0, 0.01, 0.002)?
            .with_narrow_beam(4.0)
            .with_soft_shadow(0.6, 16),
        )
        .with_light(
            PointLight::new(Color::splat(0.4), DVec3::new(-5.0, 6.0, 6.0))
                .with_attenuation(1.0, 0.02, 0.0)?,
        )
        .with_bvh(true)
        .build();

    Ok(scene)
}
