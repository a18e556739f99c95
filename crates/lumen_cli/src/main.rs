//! Lumen command-line renderer.
//!
//! Usage:
//!   lumen scenes/demo.json -o demo.png
//!   lumen scenes/demo.json --threads 4 --grid 50
//!   RUST_LOG=debug lumen scenes/demo.json --no-bvh

mod scene_file;

use anyhow::{Context, Result};
use clap::Parser;
use lumen_math::DVec3;
use lumen_tracer::render;
use scene_file::SceneFile;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "lumen")]
#[command(about = "Render a JSON scene description to PNG", long_about = None)]
#[command(version)]
struct Cli {
    /// Scene description (JSON)
    scene: PathBuf,

    /// Output PNG path
    #[arg(short, long, default_value = "output.png")]
    output: PathBuf,

    /// Render threads: 0 sequential, -1 rayon, N a pool of N workers
    #[arg(short, long, allow_negative_numbers = true)]
    threads: Option<i32>,

    /// Intersect the flat geometry list instead of building a BVH
    #[arg(long)]
    no_bvh: bool,

    /// Overlay a grid line every N pixels
    #[arg(long, value_name = "N")]
    grid: Option<u32>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let json = std::fs::read_to_string(&cli.scene)
        .with_context(|| format!("Failed to read {}", cli.scene.display()))?;
    let mut file = SceneFile::from_json(&json)
        .with_context(|| format!("Failed to parse {}", cli.scene.display()))?;

    if cli.no_bvh {
        file.bvh = false;
    }
    if let Some(threads) = cli.threads {
        file.render.threads = threads;
    }

    let start = Instant::now();
    let scene = file.to_scene().context("Invalid scene")?;
    let camera = file.to_camera().context("Invalid camera")?;
    let config = file.to_render_config().context("Invalid render settings")?;
    log::info!("Scene '{}' loaded in {:.2?}", scene.name(), start.elapsed());

    let mut image = render(&scene, &camera, &config).context("Render failed")?;

    if let Some(interval) = cli.grid {
        image.write_grid(interval, DVec3::ONE);
    }

    image
        .save_png(&cli.output)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    println!("Saved {}", cli.output.display());
    Ok(())
}
