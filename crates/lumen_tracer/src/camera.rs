//! Pinhole camera for primary ray generation.
//!
//! The camera sits at `position` looking along `to`, with `up` orthogonal
//! to it and `right = to x up`. The view plane is `distance` in front of
//! the camera, `width x height` world units, split into a pixel grid.

use lumen_math::{is_zero, unit, DVec3, MathError, Ray};
use thiserror::Error;

/// Errors raised while building a camera.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    #[error("camera: {which} vector is zero")]
    ZeroVector {
        which: &'static str,
        #[source]
        source: MathError,
    },

    #[error("camera: to and up vectors must be orthogonal")]
    NotOrthogonal,

    #[error("camera: view plane size must be positive, got {width} x {height}")]
    ViewPlaneSize { width: f64, height: f64 },

    #[error("camera: view plane distance must be positive, got {0}")]
    ViewPlaneDistance(f64),

    #[error("camera: resolution must be at least 1 x 1, got {columns} x {rows}")]
    Resolution { columns: u32, rows: u32 },
}

/// Camera that maps pixels to primary rays.
#[derive(Debug, Clone)]
pub struct Camera {
    position: DVec3,
    to: DVec3,
    up: DVec3,
    right: DVec3,
    width: f64,
    height: f64,
    distance: f64,
    columns: u32,
    rows: u32,
}

impl Camera {
    /// Start building a camera from its position and orientation.
    pub fn builder(position: DVec3, to: DVec3, up: DVec3) -> CameraBuilder {
        CameraBuilder {
            position,
            to,
            up,
            width: 1.0,
            height: 1.0,
            distance: 1.0,
            columns: 1,
            rows: 1,
        }
    }

    /// Builder for a camera at `position` aimed at `target`.
    ///
    /// `up` only needs to be roughly upward; it is made orthogonal to the
    /// viewing direction.
    pub fn look_at(position: DVec3, target: DVec3, up: DVec3) -> CameraBuilder {
        let to = target - position;
        let right = to.cross(up);
        Self::builder(position, to, right.cross(to))
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    pub fn to(&self) -> DVec3 {
        self.to
    }

    pub fn up(&self) -> DVec3 {
        self.up
    }

    pub fn right(&self) -> DVec3 {
        self.right
    }

    /// Pixel grid size as `(columns, rows)`.
    pub fn resolution(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Ray from the camera through the center of pixel (`column`, `row`).
    ///
    /// Row 0 is the top of the image.
    pub fn construct_ray(&self, column: u32, row: u32) -> Ray {
        let center = self.position + self.to * self.distance;
        let rx = self.width / self.columns as f64;
        let ry = self.height / self.rows as f64;

        let xj = (column as f64 - (self.columns as f64 - 1.0) / 2.0) * rx;
        let yi = -(row as f64 - (self.rows as f64 - 1.0) / 2.0) * ry;

        let mut pixel = center;
        if !is_zero(xj) {
            pixel += self.right * xj;
        }
        if !is_zero(yi) {
            pixel += self.up * yi;
        }

        // The view plane is strictly in front of the camera
        Ray::from_unit(self.position, (pixel - self.position).normalize())
    }
}

/// Builder for [`Camera`].
#[derive(Debug, Clone)]
pub struct CameraBuilder {
    position: DVec3,
    to: DVec3,
    up: DVec3,
    width: f64,
    height: f64,
    distance: f64,
    columns: u32,
    rows: u32,
}

impl CameraBuilder {
    /// View plane size in world units.
    pub fn view_plane_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Distance from the camera to the view plane.
    pub fn view_plane_distance(mut self, distance: f64) -> Self {
        self.distance = distance;
        self
    }

    /// Image size in pixels.
    pub fn resolution(mut self, columns: u32, rows: u32) -> Self {
        self.columns = columns;
        self.rows = rows;
        self
    }

    pub fn build(self) -> Result<Camera, CameraError> {
        let to = unit(self.to).map_err(|source| CameraError::ZeroVector { which: "to", source })?;
        let up = unit(self.up).map_err(|source| CameraError::ZeroVector { which: "up", source })?;
        if !is_zero(to.dot(up)) {
            return Err(CameraError::NotOrthogonal);
        }
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(CameraError::ViewPlaneSize {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.distance > 0.0) {
            return Err(CameraError::ViewPlaneDistance(self.distance));
        }
        if self.columns == 0 || self.rows == 0 {
            return Err(CameraError::Resolution {
                columns: self.columns,
                rows: self.rows,
            });
        }

        Ok(Camera {
            position: self.position,
            to,
            up,
            right: to.cross(up),
            width: self.width,
            height: self.height,
            distance: self.distance,
            columns: self.columns,
            rows: self.rows,
        })
    }
}
