//! Slide and Tile traits for format-agnostic tile extraction.
//!
//! The tilers never decode slide files themselves. They talk to a [`Slide`]
//! collaborator that knows its pyramid geometry, can segment tissue, and can
//! cut a pixel region out of any level. Extracted regions come back as a
//! [`Tile`], which can judge its own tissue content and persist itself.
//!
//! # Implementations
//!
//! - [`crate::slide::ImageSlide`] for ordinary raster images, with a pyramid
//!   built by repeated downsampling

use std::path::Path;

use crate::error::{SlideError, TileError};
use crate::geometry::CoordinatePair;
use crate::mask::BoxMask;

// =============================================================================
// Mask Kind
// =============================================================================

/// Which tissue mask a slide should compute.
///
/// Opaque to the tilers: they only ever forward it to the slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MaskKind {
    /// Bounding box of the largest connected tissue region
    #[default]
    BiggestTissueBox,

    /// Every pixel classified as tissue
    TissueRegion,
}

// =============================================================================
// Tile Trait
// =============================================================================

/// A pixel region extracted from a slide.
pub trait Tile {
    /// Whether the tile holds enough tissue to be worth keeping.
    fn has_enough_tissue(&self) -> bool;

    /// Persist the tile at `path`.
    fn save(&self, path: &Path) -> Result<(), TileError>;
}

// =============================================================================
// Slide Trait
// =============================================================================

/// Format-agnostic interface to a Whole Slide Image.
///
/// Coordinates passed to [`Slide::extract_tile`] are always level-0 pixels,
/// whatever level the tile is read from.
pub trait Slide {
    /// The tile type produced by this slide.
    type Tile: Tile;

    /// Stable identity of the slide, used as the mask cache key.
    fn id(&self) -> &str;

    /// Number of pyramid levels. Level 0 is full resolution.
    fn level_count(&self) -> u32;

    /// Dimensions of the level-0 image as `(width, height)`.
    fn dimensions(&self) -> (u32, u32);

    /// Dimensions of `level` as `(width, height)`.
    ///
    /// # Errors
    ///
    /// Returns [`SlideError::LevelOutOfRange`] if the level does not exist.
    fn level_dimensions(&self, level: u32) -> Result<(u32, u32), SlideError>;

    /// Downsample factor of `level` relative to level 0, along x.
    fn level_downsample(&self, level: u32) -> Result<f64, SlideError> {
        let (width, _) = self.dimensions();
        let (level_width, _) = self.level_dimensions(level)?;
        if level_width == 0 {
            return Ok(1.0);
        }
        Ok(f64::from(width) / f64::from(level_width))
    }

    /// Tissue mask of the given kind, shaped like the level-0 image.
    fn tissue_mask(&self, kind: MaskKind) -> Result<BoxMask, SlideError>;

    /// Mask of the bounding box around the biggest tissue region, at level 0.
    fn biggest_tissue_box_mask(&self) -> Result<BoxMask, SlideError> {
        self.tissue_mask(MaskKind::BiggestTissueBox)
    }

    /// Extract the region `coords` (level-0 pixels) read from `level`.
    ///
    /// # Errors
    ///
    /// Returns [`SlideError::InvalidRegion`] if `coords` falls outside the
    /// slide. Any other error is a hard failure.
    fn extract_tile(&self, coords: &CoordinatePair, level: u32) -> Result<Self::Tile, SlideError>;

    /// Directory that receives the tiles extracted from this slide.
    fn processed_path(&self) -> &Path;
}
