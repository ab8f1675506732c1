//! Tile placement strategies.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          Tiler::extract (driver)        │
//! │   names tiles, saves them, reports      │
//! └────────────────────┬────────────────────┘
//!                      │ pulls one tile at a time
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │             RandomTiles                 │
//! │  (seeded rejection sampling iterator)   │
//! └──────────┬───────────────────┬──────────┘
//!            │                   │
//!            ▼                   ▼
//! ┌────────────────────┐ ┌──────────────────┐
//! │  BoxMaskResolver   │ │      Slide       │
//! └────────────────────┘ └──────────────────┘
//! ```
//!
//! # Components
//!
//! - [`Tiler`]: the one operation every placement strategy provides
//! - [`RandomTiler`]: rejection sampling inside the tissue mask
//! - [`RandomTiles`]: the lazy sequence of accepted tiles
//! - [`GridTiler`]: deterministic placement, not available yet
//! - [`TilerConfig`]: immutable parameters of a random extraction
//! - [`tile_filename`] / [`ExtractionReport`]: naming and run summary
//!
//! # Example
//!
//! ```no_run
//! use wsi_tiler::slide::ImageSlide;
//! use wsi_tiler::tiler::{RandomTiler, Tiler, TilerConfig};
//!
//! let slide = ImageSlide::open("slide.png", "processed", 3).unwrap();
//! let mut tiler = RandomTiler::new(TilerConfig::new((512, 512), 100)).unwrap();
//! let report = tiler.extract(&slide).unwrap();
//! println!("{} tiles saved", report.tiles_saved);
//! ```

mod config;
mod extract;
mod grid;
mod random;

pub use config::{
    TilerConfig, DEFAULT_DISCARD_LIMIT, DEFAULT_MAX_ITER, DEFAULT_SEED, DEFAULT_SUFFIX,
};
pub use extract::{tile_filename, ExtractionReport};
pub use grid::GridTiler;
pub use random::{RandomTiler, RandomTiles};

use crate::error::ExtractError;
use crate::slide::Slide;

/// A tile placement strategy.
pub trait Tiler {
    /// Extract tiles from `slide` and save them under its processed path.
    fn extract<S: Slide>(&mut self, slide: &S) -> Result<ExtractionReport, ExtractError>;
}
