//! Render configuration.

use thiserror::Error;

/// How pixels are distributed over threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadMode {
    /// Single-threaded scan in row-major order
    Sequential,
    /// Rayon data-parallel loop over rows
    Parallel,
    /// Fixed number of workers pulling pixel indices from a shared counter
    Pool(usize),
}

impl TryFrom<i32> for ThreadMode {
    type Error = ConfigError;

    /// `0` is sequential, `-1` is rayon, any positive count is a pool.
    fn try_from(threads: i32) -> Result<Self, Self::Error> {
        match threads {
            0 => Ok(ThreadMode::Sequential),
            -1 => Ok(ThreadMode::Parallel),
            n if n > 0 => Ok(ThreadMode::Pool(n as usize)),
            n => Err(ConfigError::ThreadCount(n)),
        }
    }
}

/// Errors in a render configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("thread count must be -1, 0 or positive, got {0}")]
    ThreadCount(i32),

    #[error("thread pool needs at least one worker")]
    EmptyPool,

    #[error("max_level must be at least 1, got {0}")]
    MaxLevel(u32),

    #[error("min_k must be positive, got {0}")]
    MinK(f64),

    #[error("delta must be positive, got {0}")]
    Delta(f64),

    #[error("progress_interval must be in 0..=100, got {0}")]
    ProgressInterval(u32),
}

/// Engine and scheduler settings, fixed before the first ray is traced.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Recursion depth ceiling for reflection and refraction
    pub max_level: u32,
    /// Weight below which a branch contributes nothing
    pub min_k: f64,
    /// Offset applied to secondary ray origins along the surface normal
    pub delta: f64,
    /// Pixel distribution over threads
    pub threads: ThreadMode,
    /// Progress is logged every this many percent; 0 disables it
    pub progress_interval: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_level: 10,
            min_k: 0.001,
            delta: 0.1,
            threads: ThreadMode::Parallel,
            progress_interval: 10,
        }
    }
}

impl RenderConfig {
    pub fn with_threads(mut self, threads: ThreadMode) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_max_level(mut self, max_level: u32) -> Self {
        self.max_level = max_level;
        self
    }

    pub fn with_progress_interval(mut self, progress_interval: u32) -> Self {
        self.progress_interval = progress_interval;
        self
    }

    /// Check every field; a configuration that passes is safe to render with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_level == 0 {
            return Err(ConfigError::MaxLevel(self.max_level));
        }
        if !(self.min_k > 0.0) {
            return Err(ConfigError::MinK(self.min_k));
        }
        if !(self.delta > 0.0) {
            return Err(ConfigError::Delta(self.delta));
        }
        if self.threads == ThreadMode::Pool(0) {
            return Err(ConfigError::EmptyPool);
        }
        if self.progress_interval > 100 {
            return Err(ConfigError::ProgressInterval(self.progress_interval));
        }
        Ok(())
    }
}
