use crate::layout::{DEFAULT_ITERATIONS, DEFAULT_SEED, SpringLayout};
use crate::output::Canvas;
use crate::raster::RasterOptions;
use clap::Parser;
use std::path::PathBuf;

/// Renders every test case of a Bellman-Ford test log as a JPEG image.
///
/// Running without arguments reads `bf_tests.log` and writes into `visualizations/`.
#[derive(Parser, Debug, Clone)]
#[command(name = "bf_visualize", version, about)]
pub struct Config {
    /// Test log to read
    #[arg(default_value = "bf_tests.log")]
    pub log_file: PathBuf,

    /// Directory for the images; old images in it are removed first
    #[arg(short, long, default_value = "visualizations")]
    pub output_dir: PathBuf,

    /// Seed of the spring layout
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Number of spring layout iterations
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    pub iterations: usize,

    /// Canvas width before scaling
    #[arg(long, default_value_t = 1400.0)]
    pub width: f64,

    /// Canvas height before scaling; grows when the title needs room
    #[arg(long, default_value_t = 1000.0)]
    pub height: f64,

    /// Raster scale factor
    #[arg(long, default_value_t = 2.0)]
    pub scale: f32,

    /// JPEG quality
    #[arg(long, default_value_t = 90, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,

    /// Also write a Graphviz DOT file next to every image
    #[arg(long)]
    pub dot: bool,
}

impl Config {
    /// Default configuration for a log file and an output directory.
    pub fn new(log_file: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Config {
            log_file: log_file.into(),
            output_dir: output_dir.into(),
            seed: DEFAULT_SEED,
            iterations: DEFAULT_ITERATIONS,
            width: 1400.0,
            height: 1000.0,
            scale: 2.0,
            quality: 90,
            dot: false,
        }
    }

    pub fn layout(&self) -> SpringLayout {
        SpringLayout {
            seed: self.seed,
            iterations: self.iterations,
        }
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    pub fn raster(&self) -> RasterOptions {
        RasterOptions {
            scale: self.scale,
            quality: self.quality,
        }
    }
}
