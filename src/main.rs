//! WSI Tiler - random tile extraction from Whole Slide Images.
//!
//! This binary opens a slide, samples tiles inside its tissue and saves them.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wsi_tiler::{
    config::Config,
    slide::{ImageSlide, Slide},
    tiler::{ExtractionReport, RandomTiler, Tiler},
    ExtractError,
};

fn main() -> ExitCode {
    let config = Config::parse();

    // Initialize logging
    init_logging(config.verbose);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let tiler_config = config.tiler_config();
    let mut tiler = match RandomTiler::new(tiler_config) {
        Ok(tiler) => tiler,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Opening slide {}", config.input.display());
    let slide = match ImageSlide::open(&config.input, &config.output_dir, config.levels) {
        Ok(slide) => slide,
        Err(e) => {
            error!("Failed to open slide: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let (width, height) = slide.dimensions();
    info!("Slide:");
    info!("  Dimensions: {}x{}", width, height);
    info!("  Levels: {}", slide.level_count());
    info!(
        "  Tiles: {} of {}x{} at level {} (seed {}, max {} attempts)",
        config.n_tiles, config.tile_size.0, config.tile_size.1, config.level, config.seed, config.max_iter
    );
    info!("  Output: {}", config.output_dir.display());

    let report = match run_extraction(&mut tiler, &slide) {
        Ok(report) => report,
        Err(e) => {
            error!("Extraction failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if config.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize report: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

/// Run any tiler over a slide and log the summary.
fn run_extraction<T: Tiler, S: Slide>(
    tiler: &mut T,
    slide: &S,
) -> Result<ExtractionReport, ExtractError> {
    let report = tiler.extract(slide)?;
    info!(
        "Extraction finished: {} tiles, {} attempts, {} out-of-bounds draws",
        report.tiles_saved, report.attempts, report.discarded
    );
    Ok(report)
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "wsi_tiler=debug"
    } else {
        "wsi_tiler=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
