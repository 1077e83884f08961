//! Heat map demo renderer.
//!
//! Synthesizes weighted points, renders them through `HeatMap` and writes
//! the presented surface as a PNG.

use anyhow::{Context, Result};
use clap::Parser;
use heatmap_common::{DataPoint, GradientStyle, HeatmapConfig};
use heatmap_renderer::tiny_skia::{Color, Pixmap};
use heatmap_renderer::{CircleMarker, HeatMap};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "heatmap-cli")]
#[command(about = "Render synthetic points as a heat map PNG")]
struct Args {
    /// Output PNG path
    #[arg(short, long, default_value = "heatmap.png")]
    output: PathBuf,

    /// Surface width in pixels
    #[arg(long, default_value = "800")]
    width: u32,

    /// Surface height in pixels
    #[arg(long, default_value = "600")]
    height: u32,

    /// Number of random points
    #[arg(short = 'n', long, default_value = "200")]
    points: usize,

    /// Random seed
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Footprint radius in pixels (overrides HEATMAP_RADIUS)
    #[arg(long)]
    radius: Option<f32>,

    /// Blur in [0, 1] (overrides HEATMAP_BLUR)
    #[arg(long)]
    blur: Option<f32>,

    /// JSON file with a full configuration
    #[arg(long, env = "HEATMAP_CONFIG")]
    config: Option<PathBuf>,

    /// JSON file with gradient stops
    #[arg(long)]
    style: Option<PathBuf>,

    /// Draw a marker on every point
    #[arg(long)]
    markers: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder().with_max_level(level);
    if args.json_logs {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    let config = load_config(&args)?;
    info!(
        radius = config.radius,
        blur = config.blur,
        stops = config.color_stops.len(),
        "Loaded configuration"
    );

    let map = HeatMap::from_config(&config)?;
    if args.markers {
        map.set_marker(Some(Box::new(CircleMarker::default())));
    }
    map.add_all(synthesize_points(args.seed, args.points));

    let started = Instant::now();
    map.refresh(false, args.width, args.height)?;

    let mut surface = Pixmap::new(args.width, args.height)
        .with_context(|| format!("cannot allocate {}x{} surface", args.width, args.height))?;
    surface.fill(Color::WHITE);
    let stats = map.present(&mut surface)?;

    info!(
        points = map.point_count(),
        colorized = stats.colorized_pixels,
        markers = stats.markers_drawn,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Rendered heat map"
    );

    write_png(&surface, &args.output)?;
    info!(path = %args.output.display(), "Wrote PNG");

    Ok(())
}

/// Environment defaults, then the config file, then style and flags.
fn load_config(args: &Args) -> Result<HeatmapConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            HeatmapConfig::from_json(&json)?
        }
        None => HeatmapConfig::from_env(),
    };

    if let Some(path) = &args.style {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        config.color_stops = GradientStyle::from_json(&json)?.to_stops()?;
    }

    if let Some(radius) = args.radius {
        config.radius = radius;
    }
    if let Some(blur) = args.blur {
        config.blur = blur;
    }

    config.validate()?;
    Ok(config)
}

/// A few hot spots with scattered points around them.
fn synthesize_points(seed: u64, count: usize) -> Vec<DataPoint> {
    let mut rng = StdRng::seed_from_u64(seed);
    let centers: Vec<(f64, f64)> = (0..4).map(|_| (rng.gen(), rng.gen())).collect();

    (0..count)
        .map(|i| {
            let (cx, cy) = centers[i % centers.len()];
            let spread: f64 = rng.gen_range(0.0..0.2);
            let angle: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
            DataPoint::new(
                (cx + spread * angle.cos()).clamp(0.0, 1.0),
                (cy + spread * angle.sin()).clamp(0.0, 1.0),
                rng.gen_range(0.0..100.0),
            )
        })
        .collect()
}

fn write_png(surface: &Pixmap, path: &Path) -> Result<()> {
    let mut rgba = Vec::with_capacity(surface.data().len());
    for pixel in surface.pixels() {
        let c = pixel.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }

    let image = image::RgbaImage::from_raw(surface.width(), surface.height(), rgba)
        .context("pixel buffer does not match surface size")?;
    image
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
