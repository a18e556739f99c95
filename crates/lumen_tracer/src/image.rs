//! Image buffer for render output.

use crate::Color;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while writing an image.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to write {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: ::image::ImageError,
    },

    #[error("Image buffer of {width}x{height} does not match its pixel data")]
    Size { width: u32, height: u32 },
}

/// Row-major grid of linear colors.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Paint every `interval`-th row and column; 0 draws nothing.
    pub fn write_grid(&mut self, interval: u32, color: Color) {
        if interval == 0 {
            return;
        }
        for y in 0..self.height {
            for x in 0..self.width {
                if x % interval == 0 || y % interval == 0 {
                    self.set(x, y, color);
                }
            }
        }
    }

    /// Convert to RGBA bytes, clamping every channel to [0, 1].
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }

    /// Write the buffer as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), ImageError> {
        let path = path.as_ref();
        let img = ::image::RgbaImage::from_raw(self.width, self.height, self.to_rgba()).ok_or(
            ImageError::Size {
                width: self.width,
                height: self.height,
            },
        )?;

        img.save_with_format(path, ::image::ImageFormat::Png)
            .map_err(|source| ImageError::Save {
                path: path.to_path_buf(),
                source,
            })?;

        log::info!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

/// Convert a color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let quantize = |c: f64| (255.0 * c.clamp(0.0, 1.0)).round() as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z), 255]
}
