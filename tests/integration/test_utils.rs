//! Test utilities for integration tests.
//!
//! This module provides a synthetic slide that tracks how often it is asked
//! for masks and tiles, plus helpers for temporary output directories and
//! synthetic raster slides.

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use image::{Rgb, RgbImage};

use wsi_tiler::error::{SlideError, TileError};
use wsi_tiler::geometry::CoordinatePair;
use wsi_tiler::mask::BoxMask;
use wsi_tiler::slide::{MaskKind, Slide, Tile};

// =============================================================================
// Mock Tile
// =============================================================================

/// A tile that records where it was saved instead of writing pixels.
pub struct MockTile {
    pub coords: CoordinatePair,
    pub level: u32,
    enough_tissue: bool,
    saved: Rc<RefCell<Vec<PathBuf>>>,
}

impl Tile for MockTile {
    fn has_enough_tissue(&self) -> bool {
        self.enough_tissue
    }

    fn save(&self, path: &Path) -> Result<(), TileError> {
        self.saved.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}

// =============================================================================
// Mock Slide with Call Tracking
// =============================================================================

type TissueRule = Box<dyn Fn(&CoordinatePair) -> bool>;

/// A synthetic slide with configurable pyramid, tissue mask and tissue rule.
///
/// Boxes extending past the level-0 extent fail with `InvalidRegion`, like a
/// real slide reader.
pub struct MockSlide {
    id: String,
    levels: Vec<(u32, u32)>,
    tissue: BoxMask,
    tissue_rule: TissueRule,
    failure: Option<SlideError>,
    processed_path: PathBuf,
    mask_calls: Cell<usize>,
    extract_calls: Cell<usize>,
    saved: Rc<RefCell<Vec<PathBuf>>>,
}

impl MockSlide {
    /// Slide whose tissue mask covers the whole level-0 image.
    pub fn new(id: impl Into<String>, levels: &[(u32, u32)]) -> Self {
        let (width, height) = levels[0];
        Self {
            id: id.into(),
            levels: levels.to_vec(),
            tissue: BoxMask::filled(width, height, true),
            tissue_rule: Box::new(|_| true),
            failure: None,
            processed_path: std::env::temp_dir().join("wsi-tiler-mock"),
            mask_calls: Cell::new(0),
            extract_calls: Cell::new(0),
            saved: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Set the level-0 tissue mask.
    pub fn with_tissue(mut self, tissue: BoxMask) -> Self {
        self.tissue = tissue;
        self
    }

    /// Decide tile tissue sufficiency from its level-0 box.
    pub fn with_tissue_rule(mut self, rule: impl Fn(&CoordinatePair) -> bool + 'static) -> Self {
        self.tissue_rule = Box::new(rule);
        self
    }

    /// Make every extraction fail with `error`.
    pub fn with_failure(mut self, error: SlideError) -> Self {
        self.failure = Some(error);
        self
    }

    pub fn with_processed_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.processed_path = path.into();
        self
    }

    /// Number of times the tissue mask was computed.
    pub fn mask_calls(&self) -> usize {
        self.mask_calls.get()
    }

    /// Number of extraction requests, valid or not.
    pub fn extract_calls(&self) -> usize {
        self.extract_calls.get()
    }

    /// Paths passed to `Tile::save`, in order.
    pub fn saved(&self) -> Vec<PathBuf> {
        self.saved.borrow().clone()
    }
}

impl Slide for MockSlide {
    type Tile = MockTile;

    fn id(&self) -> &str {
        &self.id
    }

    fn level_count(&self) -> u32 {
        self.levels.len() as u32
    }

    fn dimensions(&self) -> (u32, u32) {
        self.levels[0]
    }

    fn level_dimensions(&self, level: u32) -> Result<(u32, u32), SlideError> {
        self.levels
            .get(level as usize)
            .copied()
            .ok_or(SlideError::LevelOutOfRange {
                level,
                levels: self.level_count(),
            })
    }

    fn tissue_mask(&self, _kind: MaskKind) -> Result<BoxMask, SlideError> {
        self.mask_calls.set(self.mask_calls.get() + 1);
        Ok(self.tissue.clone())
    }

    fn extract_tile(&self, coords: &CoordinatePair, level: u32) -> Result<MockTile, SlideError> {
        self.extract_calls.set(self.extract_calls.get() + 1);

        if let Some(ref error) = self.failure {
            return Err(error.clone());
        }

        let (width, height) = self.dimensions();
        if !coords.fits_within((width, height)) {
            return Err(SlideError::InvalidRegion {
                coords: *coords,
                width,
                height,
            });
        }

        Ok(MockTile {
            coords: *coords,
            level,
            enough_tissue: (self.tissue_rule)(coords),
            saved: Rc::clone(&self.saved),
        })
    }

    fn processed_path(&self) -> &Path {
        &self.processed_path
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// The reference scenario: 1000x1000 slide, 500x500 level 1, tissue in the
/// upper-left quadrant of level 0.
pub fn quadrant_slide(id: &str) -> MockSlide {
    MockSlide::new(id, &[(1000, 1000), (500, 500)])
        .with_tissue(BoxMask::from_fn(1000, 1000, |x, y| x < 500 && y < 500))
}

/// Fresh, empty temporary directory unique to this test process.
pub fn temp_output_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("wsi-tiler-{}-{}", name, std::process::id()));
    if dir.exists() {
        std::fs::remove_dir_all(&dir).unwrap();
    }
    dir
}

/// Synthetic H&E-like image: glass background with a checkered tissue blob
/// covering `[x0, x1) x [y0, y1)`.
pub fn tissue_image(width: u32, height: u32, blob: (u32, u32, u32, u32)) -> RgbImage {
    let (x0, y0, x1, y1) = blob;
    RgbImage::from_fn(width, height, |x, y| {
        if x >= x0 && x < x1 && y >= y0 && y < y1 {
            let v = if (x / 8 + y / 8) % 2 == 0 { 0 } else { 30 };
            Rgb([160 + v, 70 + v, 130 + v])
        } else {
            Rgb([242, 242, 244])
        }
    })
}
