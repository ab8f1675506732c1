//! # WSI Tiler
//!
//! Random tile extraction from Whole Slide Images (WSI).
//!
//! Whole slide images are gigapixel pyramids in which most pixels show bare
//! glass. This library samples fixed-size tiles only where the slide's tissue
//! mask says there is tissue, rejects tiles that turn out to hold too little
//! of it, and stops deterministically under two budgets: the number of tiles
//! wanted and the number of sampling attempts allowed.
//!
//! ## Features
//!
//! - **Mask-driven sampling**: tile corners are drawn from the on pixels of a
//!   tissue mask rescaled to the extraction level
//! - **Reproducible runs**: a seeded sampling sequence per extraction
//! - **Mask caching**: per-slide LRU memoization of level-0 and scaled masks
//! - **Pluggable slides**: any format implementing the [`Slide`] trait
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`geometry`] - Bounding boxes and cross-level coordinate scaling
//! - [`mask`] - Binary masks, mask cache and mask resolver
//! - [`slide`] - Slide/Tile traits and the raster-image slide
//! - [`tiler`] - Random and grid tilers, extraction driver
//! - [`config`] - CLI configuration
//!
//! ## Example
//!
//! ```rust,no_run
//! use wsi_tiler::{ImageSlide, RandomTiler, Tiler, TilerConfig};
//!
//! let slide = ImageSlide::open("slide.tiff", "processed", 3).unwrap();
//!
//! let config = TilerConfig::new((512, 512), 50)
//!     .with_level(1)
//!     .with_seed(7)
//!     .with_max_iter(1000);
//!
//! let mut tiler = RandomTiler::new(config).unwrap();
//! let report = tiler.extract(&slide).unwrap();
//! assert!(report.tiles_saved <= 50);
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod mask;
pub mod slide;
pub mod tiler;

// Re-export commonly used types
pub use config::Config;
pub use error::{ExtractError, SlideError, TileError, TilerError};
pub use geometry::{scale_coordinates, CoordinatePair};
pub use mask::{BoxMask, BoxMaskResolver, MaskCache, DEFAULT_MASK_CACHE_CAPACITY};
pub use slide::{ImageSlide, ImageTile, MaskKind, Slide, Tile};
pub use tiler::{
    tile_filename, ExtractionReport, GridTiler, RandomTiler, RandomTiles, Tiler, TilerConfig,
};
