//! Light sources.
//!
//! Every light reports, for a surface point, the intensity arriving there
//! and the unit direction `l` from the light towards the point. Lights
//! with an area (soft shadows) expose several sample positions; the
//! tracer averages their shadow terms.

use crate::Color;
use lumen_math::{unit, DVec3, MathError};
use std::f64::consts::PI;
use thiserror::Error;

/// Errors raised when building a light from invalid parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LightError {
    #[error("light: {0}")]
    Math(#[from] MathError),

    #[error(
        "light: attenuation factors must be non-negative and not all zero, \
         got kc={kc}, kl={kl}, kq={kq}"
    )]
    Attenuation { kc: f64, kl: f64, kq: f64 },
}

/// One shadow-ray target: direction from the light towards the shaded
/// point and the distance between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSample {
    pub direction: DVec3,
    pub distance: f64,
}

/// Trait for light sources.
pub trait LightSource: Send + Sync {
    /// Intensity arriving at `point`.
    fn intensity_at(&self, point: DVec3) -> Color;

    /// Unit direction from the light towards `point`; `None` when the
    /// point coincides with the light.
    fn direction_to(&self, point: DVec3) -> Option<DVec3>;

    /// Distance from the light to `point`.
    fn distance(&self, point: DVec3) -> f64;

    /// Shadow-ray targets for `point`. A hard light has a single sample.
    fn samples(&self, point: DVec3) -> Vec<LightSample> {
        self.direction_to(point)
            .map(|direction| LightSample {
                direction,
                distance: self.distance(point),
            })
            .into_iter()
            .collect()
    }

    /// Lights at infinity treat any blocker as full occlusion.
    fn is_directional(&self) -> bool {
        false
    }
}

/// Light from infinitely far away along a fixed direction.
#[derive(Debug, Clone)]
pub struct DirectionalLight {
    intensity: Color,
    direction: DVec3,
}

impl DirectionalLight {
    pub fn new(intensity: Color, direction: DVec3) -> Result<Self, MathError> {
        Ok(Self {
            intensity,
            direction: unit(direction)?,
        })
    }
}

impl LightSource for DirectionalLight {
    fn intensity_at(&self, _point: DVec3) -> Color {
        self.intensity
    }

    fn direction_to(&self, _point: DVec3) -> Option<DVec3> {
        Some(self.direction)
    }

    fn distance(&self, _point: DVec3) -> f64 {
        f64::INFINITY
    }

    fn is_directional(&self) -> bool {
        true
    }
}

/// Area of a soft-shadow light: a sphere of sample positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftShadow {
    pub radius: f64,
    pub samples: usize,
}

impl Default for SoftShadow {
    fn default() -> Self {
        Self {
            radius: 0.0,
            samples: 1,
        }
    }
}

impl SoftShadow {
    /// Deterministic sample positions around `center`, spread over a
    /// sphere of `radius` along a Fibonacci spiral, plus `center` itself.
    pub fn positions(&self, center: DVec3) -> Vec<DVec3> {
        if self.samples <= 1 || self.radius <= 0.0 {
            return vec![center];
        }

        let golden = (1.0 + 5f64.sqrt()) / 2.0;
        let n = self.samples as f64;
        let mut positions: Vec<DVec3> = (0..self.samples)
            .map(|i| {
                let i = i as f64;
                let theta = 2.0 * PI * i / golden;
                let z = 1.0 - (2.0 * i + 1.0) / n;
                let r = (1.0 - z * z).sqrt();
                center + DVec3::new(r * theta.cos(), r * theta.sin(), z) * self.radius
            })
            .collect();
        positions.push(center);
        positions
    }
}

/// Omnidirectional light at a position, attenuated with distance.
#[derive(Debug, Clone)]
pub struct PointLight {
    intensity: Color,
    position: DVec3,
    kc: f64,
    kl: f64,
    kq: f64,
    soft_shadow: SoftShadow,
}

impl PointLight {
    pub fn new(intensity: Color, position: DVec3) -> Self {
        Self {
            intensity,
            position,
            kc: 1.0,
            kl: 0.0,
            kq: 0.0,
            soft_shadow: SoftShadow::default(),
        }
    }

    /// Set the constant, linear and quadratic attenuation factors.
    ///
    /// The intensity at distance `d` is `I / (kc + kl*d + kq*d^2)`, so the
    /// factors must be non-negative and not all zero.
    pub fn with_attenuation(mut self, kc: f64, kl: f64, kq: f64) -> Result<Self, LightError> {
        let valid = [kc, kl, kq].iter().all(|k| k.is_finite() && *k >= 0.0);
        if !valid || kc + kl + kq <= 0.0 {
            return Err(LightError::Attenuation { kc, kl, kq });
        }
        self.kc = kc;
        self.kl = kl;
        self.kq = kq;
        Ok(self)
    }

    pub fn with_soft_shadow(mut self, radius: f64, samples: usize) -> Self {
        self.soft_shadow = SoftShadow { radius, samples };
        self
    }
}

impl LightSource for PointLight {
    fn intensity_at(&self, point: DVec3) -> Color {
        let d = self.position.distance(point);
        self.intensity / (self.kc + self.kl * d + self.kq * d * d)
    }

    fn direction_to(&self, point: DVec3) -> Option<DVec3> {
        unit(point - self.position).ok()
    }

    fn distance(&self, point: DVec3) -> f64 {
        self.position.distance(point)
    }

    fn samples(&self, point: DVec3) -> Vec<LightSample> {
        self.soft_shadow
            .positions(self.position)
            .into_iter()
            .filter_map(|position| {
                let direction = unit(point - position).ok()?;
                Some(LightSample {
                    direction,
                    distance: position.distance(point),
                })
            })
            .collect()
    }
}

/// Point light emitting mainly along a direction.
#[derive(Debug, Clone)]
pub struct SpotLight {
    point: PointLight,
    direction: DVec3,
    narrow_beam: f64,
}

impl SpotLight {
    pub fn new(intensity: Color, position: DVec3, direction: DVec3) -> Result<Self, MathError> {
        Ok(Self {
            point: PointLight::new(intensity, position),
            direction: unit(direction)?,
            narrow_beam: 1.0,
        })
    }

    /// Exponent of the `dir . l` falloff; larger values give a tighter beam.
    pub fn with_narrow_beam(mut self, narrow_beam: f64) -> Self {
        self.narrow_beam = narrow_beam;
        self
    }

    pub fn with_attenuation(mut self, kc: f64, kl: f64, kq: f64) -> Result<Self, LightError> {
        self.point = self.point.with_attenuation(kc, kl, kq)?;
        Ok(self)
    }

    pub fn with_soft_shadow(mut self, radius: f64, samples: usize) -> Self {
        self.point = self.point.with_soft_shadow(radius, samples);
        self
    }
}

impl LightSource for SpotLight {
    fn intensity_at(&self, point: DVec3) -> Color {
        let facing = self
            .point
            .direction_to(point)
            .map_or(0.0, |l| self.direction.dot(l).max(0.0));
        self.point.intensity_at(point) * facing.powf(self.narrow_beam)
    }

    fn direction_to(&self, point: DVec3) -> Option<DVec3> {
        self.point.direction_to(point)
    }

    fn distance(&self, point: DVec3) -> f64 {
        self.point.distance(point)
    }

    fn samples(&self, point: DVec3) -> Vec<LightSample> {
        self.point.samples(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_near(a: DVec3, b: DVec3) {
        assert!((a - b).length() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_directional_light() {
        let light = DirectionalLight::new(Color::splat(0.5), DVec3::new(0.0, -2.0, 0.0)).unwrap();
        let p = DVec3::new(3.0, 4.0, 5.0);

        assert_eq!(light.intensity_at(p), Color::splat(0.5));
        assert_eq!(light.direction_to(p), Some(-DVec3::Y));
        assert_eq!(light.distance(p), f64::INFINITY);
        assert!(light.is_directional());
        assert_eq!(light.samples(p).len(), 1);
    }

    #[test]
    fn test_directional_light_rejects_zero_direction() {
        assert!(DirectionalLight::new(Color::ONE, DVec3::ZERO).is_err());
    }

    #[test]
    fn test_point_light_attenuation() {
        let light = PointLight::new(Color::splat(100.0), DVec3::ZERO)
            .with_attenuation(1.0, 1.0, 1.0)
            .unwrap();
        let p = DVec3::new(0.0, 3.0, 0.0);

        // 100 / (1 + 3 + 9)
        assert_near(light.intensity_at(p), Color::splat(100.0 / 13.0));
        assert_near(light.direction_to(p).unwrap(), DVec3::Y);
        assert!((light.distance(p) - 3.0).abs() < 1e-12);
        assert!(!light.is_directional());
    }

    #[test]
    fn test_attenuation_rejects_degenerate_factors() {
        let light = PointLight::new(Color::ONE, DVec3::ZERO);
        assert_eq!(
            light.clone().with_attenuation(0.0, 0.0, 0.0).unwrap_err(),
            LightError::Attenuation {
                kc: 0.0,
                kl: 0.0,
                kq: 0.0
            }
        );
        assert!(light.clone().with_attenuation(1.0, -0.5, 0.0).is_err());
        assert!(light.clone().with_attenuation(f64::NAN, 1.0, 0.0).is_err());

        // Pure quadratic falloff is fine
        let quadratic = light.with_attenuation(0.0, 0.0, 1.0).unwrap();
        assert_near(quadratic.intensity_at(DVec3::new(2.0, 0.0, 0.0)), Color::splat(0.25));

        let spot = SpotLight::new(Color::ONE, DVec3::ZERO, -DVec3::Y).unwrap();
        assert!(spot.with_attenuation(0.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_point_light_direction_undefined_at_position() {
        let light = PointLight::new(Color::ONE, DVec3::ONE);
        assert!(light.direction_to(DVec3::ONE).is_none());
        assert!(light.samples(DVec3::ONE).is_empty());
    }

    #[test]
    fn test_spot_light_falloff() {
        let spot = SpotLight::new(Color::ONE, DVec3::ZERO, -DVec3::Y)
            .unwrap()
            .with_narrow_beam(2.0);

        // On the beam axis: plain point light intensity
        assert_near(spot.intensity_at(DVec3::new(0.0, -1.0, 0.0)), Color::ONE);

        // 60 degrees off axis: cos = 0.5, squared
        let off_axis = DVec3::new(3f64.sqrt() / 2.0, -0.5, 0.0);
        assert_near(spot.intensity_at(off_axis), Color::splat(0.25));

        // Behind the spot
        assert_near(spot.intensity_at(DVec3::new(0.0, 1.0, 0.0)), Color::ZERO);
    }

    #[test]
    fn test_hard_light_has_one_sample() {
        let light = PointLight::new(Color::ONE, DVec3::new(0.0, 5.0, 0.0));
        let samples = light.samples(DVec3::ZERO);
        assert_eq!(samples.len(), 1);
        assert_near(samples[0].direction, -DVec3::Y);
        assert!((samples[0].distance - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_soft_shadow_samples() {
        let center = DVec3::new(0.0, 10.0, 0.0);
        let light = PointLight::new(Color::ONE, center).with_soft_shadow(0.5, 16);

        let soft = SoftShadow {
            radius: 0.5,
            samples: 16,
        };
        let positions = soft.positions(center);
        assert_eq!(positions.len(), 17);
        for p in &positions[..16] {
            assert!((p.distance(center) - 0.5).abs() < 1e-9);
        }
        assert_eq!(positions[16], center);

        let samples = light.samples(DVec3::ZERO);
        assert_eq!(samples.len(), 17);
        for s in &samples {
            assert!((s.direction.length() - 1.0).abs() < 1e-12);
            assert!(s.distance >= 9.5 - 1e-9 && s.distance <= 10.5 + 1e-9);
        }

        // Deterministic
        assert_eq!(samples, light.samples(DVec3::ZERO));
    }
}
