//! Render scheduler: distributes pixels over threads.
//!
//! Three modes, picked by [`ThreadMode`]:
//! - `Sequential` scans rows on the calling thread
//! - `Parallel` hands rows to rayon
//! - `Pool(n)` starts `n` scoped workers that claim pixels from a shared
//!   queue until the image is exhausted
//!
//! The scene is only read during rendering, so workers share it without
//! locks. Every worker writes straight into the pixel it claimed; the
//! queue hands out each pixel exactly once.

use crate::{Camera, Color, ConfigError, ImageBuffer, RayTracer, RenderConfig, Scene, ThreadMode};
use parking_lot::Mutex;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;
use thiserror::Error;

/// Errors that abort a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid render configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to spawn render worker {index}: {source}")]
    ThreadSpawn {
        index: usize,
        #[source]
        source: std::io::Error,
    },
}

/// Counts finished pixels and logs progress every `interval` percent.
pub struct PixelManager {
    total: usize,
    interval: usize,
    done: AtomicUsize,
    reported: AtomicUsize,
}

impl PixelManager {
    /// `interval` is in percent; 0 disables progress logging.
    pub fn new(total: usize, interval: u32) -> Self {
        Self {
            total,
            interval: interval as usize,
            done: AtomicUsize::new(0),
            reported: AtomicUsize::new(0),
        }
    }

    /// Record one finished pixel.
    pub fn pixel_done(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if self.interval == 0 || self.total == 0 {
            return;
        }

        let percent = done * 100 / self.total;
        let step = percent / self.interval * self.interval;
        // Exactly one thread wins each step
        if step > 0 && self.reported.fetch_max(step, Ordering::Relaxed) < step {
            log::info!("Rendered {}% ({}/{} pixels)", step, done, self.total);
        }
    }

    pub fn completed(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

/// Trace the ray through one pixel.
#[inline]
pub fn render_pixel(tracer: &RayTracer<'_>, camera: &Camera, x: u32, y: u32) -> Color {
    tracer.trace_ray(&camera.construct_ray(x, y))
}

/// Render `scene` as seen by `camera`.
pub fn render(
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
) -> Result<ImageBuffer, RenderError> {
    config.validate()?;

    let (width, height) = camera.resolution();
    let tracer = RayTracer::new(scene, config);
    let progress = PixelManager::new(width as usize * height as usize, config.progress_interval);
    let mut image = ImageBuffer::new(width, height);

    log::info!(
        "Rendering '{}' at {}x{} ({:?})",
        scene.name(),
        width,
        height,
        config.threads
    );
    let start = Instant::now();

    match config.threads {
        ThreadMode::Sequential => {
            for y in 0..height {
                for x in 0..width {
                    image.set(x, y, render_pixel(&tracer, camera, x, y));
                    progress.pixel_done();
                }
            }
        }
        ThreadMode::Parallel => {
            image
                .pixels
                .par_chunks_mut(width as usize)
                .enumerate()
                .for_each(|(y, row)| {
                    for (x, pixel) in row.iter_mut().enumerate() {
                        *pixel = render_pixel(&tracer, camera, x as u32, y as u32);
                        progress.pixel_done();
                    }
                });
        }
        ThreadMode::Pool(workers) => {
            render_pool(&tracer, camera, &progress, workers, &mut image.pixels)?;
        }
    }

    log::info!(
        "Render finished: {} pixels in {:.2?}",
        progress.completed(),
        start.elapsed()
    );
    Ok(image)
}

/// Pull-model worker pool over the row-major `pixels` of the image.
fn render_pool(
    tracer: &RayTracer<'_>,
    camera: &Camera,
    progress: &PixelManager,
    workers: usize,
    pixels: &mut [Color],
) -> Result<(), RenderError> {
    let (width, _) = camera.resolution();
    let width = width as usize;
    let queue = Mutex::new(pixels.iter_mut().enumerate());
    let queue = &queue;

    thread::scope(|s| {
        let mut handles = Vec::with_capacity(workers);
        for index in 0..workers {
            let handle = thread::Builder::new()
                .name(format!("lumen-worker-{index}"))
                .spawn_scoped(s, move || {
                    let mut rendered = 0usize;
                    loop {
                        // Release the lock before tracing
                        let claimed = queue.lock().next();
                        let Some((i, pixel)) = claimed else {
                            break;
                        };
                        let (x, y) = ((i % width) as u32, (i / width) as u32);
                        *pixel = render_pixel(tracer, camera, x, y);
                        progress.pixel_done();
                        rendered += 1;
                    }
                    log::debug!("Worker {} rendered {} pixels", index, rendered);
                })
                .map_err(|source| RenderError::ThreadSpawn { index, source })?;
            handles.push(handle);
        }

        for handle in handles {
            if let Err(panic) = handle.join() {
                std::panic::resume_unwind(panic);
            }
        }
        Ok(())
    })
}
