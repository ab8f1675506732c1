//! Configuration management for the WSI tiler.
//!
//! This module provides the command-line configuration, which supports:
//! - Command-line arguments via clap
//! - Environment variables with `TILER_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use wsi_tiler::config::Config;
//!
//! let config = Config::parse();
//! config.validate()?;
//! let tiler_config = config.tiler_config();
//! ```
//!
//! # Environment Variables
//!
//! - `TILER_OUTPUT_DIR` - Directory receiving the tiles (default: processed)
//! - `TILER_TILE_SIZE` - Tile size as WIDTHxHEIGHT (default: 512x512)
//! - `TILER_N_TILES` - Number of tiles to extract (required)
//! - `TILER_LEVEL` - Pyramid level to extract from (default: 0)
//! - `TILER_SEED` - Seed of the sampling sequence (default: 7)
//! - `TILER_CHECK_TISSUE` - Keep only tiles with enough tissue (default: true)
//! - `TILER_PREFIX` / `TILER_SUFFIX` - Tile filename prefix and suffix
//! - `TILER_MAX_ITER` - Sampling attempt budget (default: 10000)
//! - `TILER_LEVELS` - Pyramid levels built from a raster image (default: 3)
//! - `TILER_MASK_CACHE` - Masks kept per cache (default: 100)

use std::path::PathBuf;

use clap::Parser;

use crate::mask::DEFAULT_MASK_CACHE_CAPACITY;
use crate::tiler::{TilerConfig, DEFAULT_MAX_ITER, DEFAULT_SEED, DEFAULT_SUFFIX};

// =============================================================================
// Default Values
// =============================================================================

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "processed";

/// Default tile size.
pub const DEFAULT_TILE_SIZE: &str = "512x512";

/// Default number of pyramid levels synthesised for a raster input.
pub const DEFAULT_LEVELS: u32 = 3;

// =============================================================================
// CLI Arguments
// =============================================================================

/// WSI Tiler - random tile extraction from Whole Slide Images.
///
/// Samples fixed-size tiles inside the biggest tissue region of a slide and
/// saves them as `{prefix}tile_{n}_level{level}_{x_ul}-{y_ul}-{x_br}-{y_br}{suffix}`.
#[derive(Parser, Debug, Clone)]
#[command(name = "wsi-tiler")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Input / Output
    // =========================================================================
    /// Slide image to extract tiles from.
    pub input: PathBuf,

    /// Directory receiving the extracted tiles.
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR, env = "TILER_OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Number of pyramid levels to build from the input image.
    #[arg(long, default_value_t = DEFAULT_LEVELS, env = "TILER_LEVELS")]
    pub levels: u32,

    // =========================================================================
    // Sampling Configuration
    // =========================================================================
    /// Tile size at the extraction level, as WIDTHxHEIGHT.
    #[arg(long, default_value = DEFAULT_TILE_SIZE, value_parser = parse_tile_size, env = "TILER_TILE_SIZE")]
    pub tile_size: (u32, u32),

    /// Number of tiles to extract.
    #[arg(short, long, env = "TILER_N_TILES")]
    pub n_tiles: u64,

    /// Pyramid level to extract tiles from.
    #[arg(short, long, default_value_t = 0, env = "TILER_LEVEL")]
    pub level: u32,

    /// Seed of the sampling sequence.
    #[arg(long, default_value_t = DEFAULT_SEED, env = "TILER_SEED")]
    pub seed: u32,

    /// Keep only tiles with enough tissue.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set, env = "TILER_CHECK_TISSUE")]
    pub check_tissue: bool,

    /// Maximum number of sampling attempts.
    #[arg(long, default_value_t = DEFAULT_MAX_ITER, env = "TILER_MAX_ITER")]
    pub max_iter: u64,

    // =========================================================================
    // Naming
    // =========================================================================
    /// Prefix of every tile filename.
    #[arg(long, default_value = "", env = "TILER_PREFIX")]
    pub prefix: String,

    /// Suffix (extension) of every tile filename.
    #[arg(long, default_value = DEFAULT_SUFFIX, env = "TILER_SUFFIX")]
    pub suffix: String,

    // =========================================================================
    // Cache Configuration
    // =========================================================================
    /// Maximum number of masks kept per cache.
    #[arg(long, default_value_t = DEFAULT_MASK_CACHE_CAPACITY, env = "TILER_MASK_CACHE")]
    pub mask_cache_capacity: usize,

    // =========================================================================
    // Output Configuration
    // =========================================================================
    /// Print the extraction report as JSON.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.tile_size.0 == 0 || self.tile_size.1 == 0 {
            return Err("tile_size must be non-zero in both dimensions".to_string());
        }

        if self.max_iter < self.n_tiles {
            return Err(format!(
                "max_iter ({}) must be greater than or equal to n_tiles ({})",
                self.max_iter, self.n_tiles
            ));
        }

        if self.levels == 0 {
            return Err("levels must be greater than 0".to_string());
        }
        if self.level >= self.levels {
            return Err(format!(
                "level {} does not exist, the pyramid has {} levels",
                self.level, self.levels
            ));
        }

        if self.mask_cache_capacity == 0 {
            return Err("mask_cache_capacity must be greater than 0".to_string());
        }

        if self.suffix.is_empty() {
            return Err("suffix must name a file extension, e.g. .png".to_string());
        }

        Ok(())
    }

    /// Tiler configuration described by these arguments.
    pub fn tiler_config(&self) -> TilerConfig {
        TilerConfig::new(self.tile_size, self.n_tiles)
            .with_level(self.level)
            .with_seed(self.seed)
            .with_check_tissue(self.check_tissue)
            .with_prefix(self.prefix.clone())
            .with_suffix(self.suffix.clone())
            .with_max_iter(self.max_iter)
            .with_mask_cache_capacity(self.mask_cache_capacity)
    }
}

/// Parse `WIDTHxHEIGHT` (or a single number for square tiles).
pub fn parse_tile_size(s: &str) -> Result<(u32, u32), String> {
    let parse = |v: &str| {
        v.trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid tile size '{}': {}", s, e))
    };

    match s.split_once(['x', 'X']) {
        Some((w, h)) => Ok((parse(w)?, parse(h)?)),
        None => {
            let side = parse(s)?;
            Ok((side, side))
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
