//! Phong surface material.

use lumen_math::DVec3;

/// Color type alias (linear RGB, typically 0-1 per channel).
pub type Color = DVec3;

/// Per-channel attenuation triple (KA, KD, ...).
pub type Coefficients = DVec3;

/// Reflection and transmission coefficients of a surface.
///
/// Materials are plain values; every intersection carries its own copy
/// so shading never touches shared geometry state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Ambient coefficient
    pub ka: Coefficients,
    /// Diffuse coefficient
    pub kd: Coefficients,
    /// Specular coefficient
    pub ks: Coefficients,
    /// Transparency (refraction) coefficient
    pub kt: Coefficients,
    /// Reflectivity coefficient
    pub kr: Coefficients,
    /// Specular shininess exponent
    pub shininess: u32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ka: Coefficients::ONE,
            kd: Coefficients::ZERO,
            ks: Coefficients::ZERO,
            kt: Coefficients::ZERO,
            kr: Coefficients::ZERO,
            shininess: 0,
        }
    }
}

impl Material {
    /// Create a material with the default coefficients (KA = 1, rest 0).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ka(mut self, ka: impl Into<Coefficients>) -> Self {
        self.ka = ka.into();
        self
    }

    pub fn with_kd(mut self, kd: impl Into<Coefficients>) -> Self {
        self.kd = kd.into();
        self
    }

    pub fn with_ks(mut self, ks: impl Into<Coefficients>) -> Self {
        self.ks = ks.into();
        self
    }

    pub fn with_kt(mut self, kt: impl Into<Coefficients>) -> Self {
        self.kt = kt.into();
        self
    }

    pub fn with_kr(mut self, kr: impl Into<Coefficients>) -> Self {
        self.kr = kr.into();
        self
    }

    pub fn with_shininess(mut self, shininess: u32) -> Self {
        self.shininess = shininess;
        self
    }

    /// True if light passes through the surface at all.
    pub fn is_translucent(&self) -> bool {
        self.kt.max_element() > 0.0
    }
}

/// Uniform coefficient triple, e.g. `uniform(0.5)` for KD = 0.5 everywhere.
#[inline]
pub fn uniform(k: f64) -> Coefficients {
    Coefficients::splat(k)
}
