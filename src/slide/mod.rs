//! Slide abstraction layer.
//!
//! This module defines the collaborators the tilers depend on, so that the
//! sampling logic works with any slide format.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          RandomTiler / GridTiler        │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │              Slide Trait                │
//! │  (geometry, tissue masks, extraction)   │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │              ImageSlide                 │
//! │  (raster pyramid + Otsu segmentation)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use wsi_tiler::geometry::CoordinatePair;
//! use wsi_tiler::slide::{ImageSlide, Slide, Tile};
//!
//! let slide = ImageSlide::open("slide.png", "processed", 3).unwrap();
//! let tile = slide
//!     .extract_tile(&CoordinatePair::new(0, 0, 512, 512), 0)
//!     .unwrap();
//! if tile.has_enough_tissue() {
//!     tile.save("processed/tile.png".as_ref()).unwrap();
//! }
//! ```

mod image_slide;
mod reader;
pub mod tissue;

pub use image_slide::{
    ImageSlide, ImageTile, BACKGROUND_LUMA, DEFAULT_TISSUE_FRACTION, THUMBNAIL_MAX_SIDE,
};
pub use reader::{MaskKind, Slide, Tile};
