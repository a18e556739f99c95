//! Recursive Whitted-style ray tracer.
//!
//! For each primary ray the tracer finds the closest hit and shades it
//! with:
//! - ambient light scaled by the surface's KA (primary hit only)
//! - emission plus Phong diffuse/specular from every visible light,
//!   attenuated by translucent blockers along the shadow rays
//! - reflection (KR) and refraction (KT) through secondary rays
//!
//! Recursion is bounded by a depth ceiling and by the accumulated weight
//! `k`: a branch whose weight drops below `min_k` in every channel is
//! pruned.

use crate::light::LightSample;
use crate::{Coefficients, Color, Intersection, LightSource, RenderConfig, Scene};
use lumen_math::{align_zero, is_zero, DVec3, Ray};

/// View-dependent values of a hit, derived once per shading evaluation.
struct SurfaceHit<'a> {
    hit: Intersection<'a>,
    /// Direction of the incoming ray
    v: DVec3,
    normal: DVec3,
    n_dot_v: f64,
}

/// Light-dependent values of a hit, derived once per light.
struct LightHit<'l> {
    light: &'l dyn LightSource,
    /// Direction from the light towards the hit point
    l: DVec3,
    n_dot_l: f64,
}

/// Shades rays against a scene.
pub struct RayTracer<'s> {
    scene: &'s Scene,
    max_level: u32,
    min_k: f64,
    delta: f64,
}

impl<'s> RayTracer<'s> {
    pub fn new(scene: &'s Scene, config: &RenderConfig) -> Self {
        Self {
            scene,
            max_level: config.max_level,
            min_k: config.min_k,
            delta: config.delta,
        }
    }

    /// Color seen along `ray`; the background when nothing is hit.
    pub fn trace_ray(&self, ray: &Ray) -> Color {
        match self.scene.geometries().closest(ray) {
            Some(hit) => self.calc_color(hit, ray),
            None => self.scene.background(),
        }
    }

    fn calc_color(&self, hit: Intersection<'_>, ray: &Ray) -> Color {
        let Some(surface) = self.preprocess(hit, ray.direction()) else {
            return Color::ZERO;
        };
        self.scene.ambient() * surface.hit.material.ka
            + self.shade(&surface, self.max_level, Coefficients::ONE)
    }

    /// Normal and `n . v` at a hit. `None` for an undefined normal or a
    /// ray grazing the surface.
    fn preprocess<'a>(&self, hit: Intersection<'a>, v: DVec3) -> Option<SurfaceHit<'a>> {
        let normal = hit.geometry.normal_at(hit.point)?;
        let n_dot_v = normal.dot(v);
        if is_zero(n_dot_v) {
            return None;
        }
        Some(SurfaceHit {
            hit,
            v,
            normal,
            n_dot_v,
        })
    }

    fn shade(&self, surface: &SurfaceHit<'_>, level: u32, k: Coefficients) -> Color {
        let local = self.local_effects(surface, k);
        if level <= 1 {
            return local;
        }
        local + self.global_effects(surface, level, k)
    }

    /// True if `k` is below the threshold in every channel.
    fn negligible(&self, k: Coefficients) -> bool {
        k.cmplt(Coefficients::splat(self.min_k)).all()
    }

    fn light_hit<'l>(
        &self,
        surface: &SurfaceHit<'_>,
        light: &'l dyn LightSource,
    ) -> Option<LightHit<'l>> {
        let l = light.direction_to(surface.hit.point)?;
        let n_dot_l = surface.normal.dot(l);
        // Light and viewer must be on the same side of the surface
        if align_zero(n_dot_l * surface.n_dot_v) <= 0.0 {
            return None;
        }
        Some(LightHit { light, l, n_dot_l })
    }

    fn local_effects(&self, surface: &SurfaceHit<'_>, k: Coefficients) -> Color {
        let material = &surface.hit.material;
        let mut color = surface.hit.geometry.emission();

        for light in self.scene.lights() {
            let Some(lit) = self.light_hit(surface, light.as_ref()) else {
                continue;
            };

            let ktr = self.transparency(surface, &lit);
            if !(ktr * k).cmpgt(Coefficients::splat(self.min_k)).any() {
                continue;
            }

            let intensity = light.intensity_at(surface.hit.point);
            let diffuse = material.kd * lit.n_dot_l.abs();
            let r = lit.l - surface.normal * (2.0 * lit.n_dot_l);
            let vr = (-surface.v.dot(r)).max(0.0);
            let specular = material.ks * vr.powf(f64::from(material.shininess));

            color += intensity * ktr * (diffuse + specular);
        }

        color
    }

    /// Fraction of the light reaching the surface, averaged over the
    /// light's samples.
    fn transparency(&self, surface: &SurfaceHit<'_>, lit: &LightHit<'_>) -> Coefficients {
        let samples = lit.light.samples(surface.hit.point);
        if samples.is_empty() {
            return Coefficients::ONE;
        }

        let total: Coefficients = samples
            .iter()
            .map(|sample| self.sample_transparency(surface, lit, sample))
            .sum();
        total / samples.len() as f64
    }

    fn sample_transparency(
        &self,
        surface: &SurfaceHit<'_>,
        lit: &LightHit<'_>,
        sample: &LightSample,
    ) -> Coefficients {
        // A sample behind the surface cannot reach the side the light is on
        let n_dot_s = align_zero(surface.normal.dot(sample.direction));
        if n_dot_s * lit.n_dot_l <= 0.0 {
            return Coefficients::ZERO;
        }

        let Ok(shadow_ray) = Ray::offset(
            surface.hit.point,
            -sample.direction,
            surface.normal,
            self.delta,
        ) else {
            return Coefficients::ZERO;
        };

        let blockers = self.scene.geometries().intersect(&shadow_ray);
        // Directional lights have no distance to compare against
        if lit.light.is_directional() {
            return if blockers.is_empty() {
                Coefficients::ONE
            } else {
                Coefficients::ZERO
            };
        }

        let mut ktr = Coefficients::ONE;
        for blocker in blockers.iter().filter(|b| b.distance < sample.distance) {
            if !blocker.material.is_translucent() {
                return Coefficients::ZERO;
            }
            ktr *= blocker.material.kt;
            if self.negligible(ktr) {
                return Coefficients::ZERO;
            }
        }
        ktr
    }

    fn global_effects(&self, surface: &SurfaceHit<'_>, level: u32, k: Coefficients) -> Color {
        let material = &surface.hit.material;
        let point = surface.hit.point;
        let n = surface.normal;
        let v = surface.v;

        let reflected = v - n * (2.0 * v.dot(n));
        let reflection = Ray::offset(point, reflected, n, self.delta).ok();
        let refraction = Ray::offset(point, v, n, self.delta).ok();

        self.global_effect(reflection, level, k, material.kr)
            + self.global_effect(refraction, level, k, material.kt)
    }

    fn global_effect(
        &self,
        ray: Option<Ray>,
        level: u32,
        k: Coefficients,
        kx: Coefficients,
    ) -> Color {
        let kkx = k * kx;
        if self.negligible(kkx) {
            return Color::ZERO;
        }
        let Some(ray) = ray else {
            return Color::ZERO;
        };

        match self.scene.geometries().closest(&ray) {
            None => self.scene.background() * kx,
            Some(hit) => match self.preprocess(hit, ray.direction()) {
                Some(surface) => self.shade(&surface, level - 1, kkx) * kx,
                None => Color::ZERO,
            },
        }
    }
}
