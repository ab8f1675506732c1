//! Raster-image slides.
//!
//! [`ImageSlide`] turns any image the `image` crate can decode into a small
//! pyramid: level `n` is level 0 downsampled by `2^n`. It is the concrete
//! [`Slide`] used by the command-line tool and the integration tests.
//!
//! Tissue is segmented on a grayscale thumbnail (longest side at most
//! [`THUMBNAIL_MAX_SIDE`] pixels) and the resulting mask is rescaled to
//! level 0.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, RgbImage};

use crate::error::{SlideError, TileError};
use crate::geometry::{scale_coordinates, CoordinatePair};
use crate::mask::BoxMask;

use super::reader::{MaskKind, Slide, Tile};
use super::tissue::{biggest_region_box, tissue_mask};

/// Longest side of the thumbnail used for tissue segmentation.
pub const THUMBNAIL_MAX_SIDE: u32 = 1024;

/// Luma above which a pixel counts as background glass.
pub const BACKGROUND_LUMA: u8 = 220;

/// Minimum fraction of tissue pixels for a tile to be kept.
pub const DEFAULT_TISSUE_FRACTION: f64 = 0.8;

/// Luma variance below which a tile is considered blank.
const MIN_LUMA_VARIANCE: f64 = 1.0;

// =============================================================================
// ImageTile
// =============================================================================

/// A tile cut from an [`ImageSlide`].
#[derive(Debug, Clone)]
pub struct ImageTile {
    image: RgbImage,
    level: u32,
    coords: CoordinatePair,
    tissue_fraction: f64,
}

impl ImageTile {
    pub fn new(image: RgbImage, level: u32, coords: CoordinatePair) -> Self {
        Self {
            image,
            level,
            coords,
            tissue_fraction: DEFAULT_TISSUE_FRACTION,
        }
    }

    /// Override the tissue fraction required by [`Tile::has_enough_tissue`].
    pub fn with_tissue_fraction(mut self, fraction: f64) -> Self {
        self.tissue_fraction = fraction;
        self
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Level the pixels were read from.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Level-0 box the tile was extracted for.
    pub fn coords(&self) -> CoordinatePair {
        self.coords
    }

    /// Fraction of pixels darker than [`BACKGROUND_LUMA`].
    pub fn tissue_ratio(&self) -> f64 {
        let total = u64::from(self.image.width()) * u64::from(self.image.height());
        if total == 0 {
            return 0.0;
        }
        let gray = imageops::grayscale(&self.image);
        let tissue = gray.pixels().filter(|p| p[0] <= BACKGROUND_LUMA).count();
        tissue as f64 / total as f64
    }

    fn luma_variance(&self) -> f64 {
        let gray = imageops::grayscale(&self.image);
        let n = f64::from(gray.width()) * f64::from(gray.height());
        if n == 0.0 {
            return 0.0;
        }
        let mean = gray.pixels().map(|p| f64::from(p[0])).sum::<f64>() / n;
        gray.pixels()
            .map(|p| {
                let d = f64::from(p[0]) - mean;
                d * d
            })
            .sum::<f64>()
            / n
    }
}

impl Tile for ImageTile {
    fn has_enough_tissue(&self) -> bool {
        self.tissue_ratio() >= self.tissue_fraction && self.luma_variance() >= MIN_LUMA_VARIANCE
    }

    fn save(&self, path: &Path) -> Result<(), TileError> {
        self.image.save(path).map_err(|e| TileError::Save {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

// =============================================================================
// ImageSlide
// =============================================================================

/// An in-memory slide built from a single raster image.
pub struct ImageSlide {
    id: String,
    levels: Vec<RgbImage>,
    processed_path: PathBuf,
}

impl ImageSlide {
    /// Decode the image at `path` and build a pyramid of `levels` levels.
    ///
    /// # Errors
    ///
    /// Returns [`SlideError::Decode`] if the file cannot be read or decoded.
    pub fn open(
        path: impl AsRef<Path>,
        processed_path: impl Into<PathBuf>,
        levels: u32,
    ) -> Result<Self, SlideError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|e| SlideError::Decode {
            message: format!("{}: {}", path.display(), e),
        })?;
        Ok(Self::from_image(
            path.display().to_string(),
            image,
            processed_path,
            levels,
        ))
    }

    /// Build a slide from an already decoded image.
    ///
    /// At least one level is always built; levels stop early once a side
    /// would shrink to zero.
    pub fn from_image(
        id: impl Into<String>,
        image: DynamicImage,
        processed_path: impl Into<PathBuf>,
        levels: u32,
    ) -> Self {
        let base = image.to_rgb8();
        let (width, height) = base.dimensions();

        let mut pyramid = Vec::with_capacity(levels.max(1) as usize);
        for level in 1..levels.max(1) {
            let w = width >> level;
            let h = height >> level;
            if w == 0 || h == 0 {
                break;
            }
            pyramid.push(imageops::resize(&base, w, h, FilterType::Triangle));
        }
        pyramid.insert(0, base);

        Self {
            id: id.into(),
            levels: pyramid,
            processed_path: processed_path.into(),
        }
    }

    fn level_image(&self, level: u32) -> Result<&RgbImage, SlideError> {
        self.levels
            .get(level as usize)
            .ok_or(SlideError::LevelOutOfRange {
                level,
                levels: self.level_count(),
            })
    }

    /// Grayscale thumbnail used for segmentation.
    fn thumbnail(&self) -> GrayImage {
        let base = &self.levels[0];
        let (width, height) = base.dimensions();
        let longest = width.max(height);
        let gray = imageops::grayscale(base);
        if longest <= THUMBNAIL_MAX_SIDE {
            return gray;
        }
        let scale = f64::from(THUMBNAIL_MAX_SIDE) / f64::from(longest);
        let w = ((f64::from(width) * scale).round() as u32).max(1);
        let h = ((f64::from(height) * scale).round() as u32).max(1);
        imageops::resize(&gray, w, h, FilterType::Triangle)
    }
}

impl Slide for ImageSlide {
    type Tile = ImageTile;

    fn id(&self) -> &str {
        &self.id
    }

    fn level_count(&self) -> u32 {
        self.levels.len() as u32
    }

    fn dimensions(&self) -> (u32, u32) {
        self.levels[0].dimensions()
    }

    fn level_dimensions(&self, level: u32) -> Result<(u32, u32), SlideError> {
        Ok(self.level_image(level)?.dimensions())
    }

    fn tissue_mask(&self, kind: MaskKind) -> Result<BoxMask, SlideError> {
        let (width, height) = self.dimensions();
        let thumbnail = self.thumbnail();
        let thumb_mask = tissue_mask(&thumbnail);

        match kind {
            MaskKind::TissueRegion => Ok(thumb_mask.resize(width, height)),
            MaskKind::BiggestTissueBox => {
                let Some(thumb_box) = biggest_region_box(&thumb_mask) else {
                    return Ok(BoxMask::filled(width, height, false));
                };
                let coords = scale_coordinates(thumb_box, thumbnail.dimensions(), (width, height));
                Ok(BoxMask::from_box(width, height, &coords))
            }
        }
    }

    fn extract_tile(&self, coords: &CoordinatePair, level: u32) -> Result<ImageTile, SlideError> {
        let dimensions = self.dimensions();
        if !coords.fits_within(dimensions) {
            return Err(SlideError::InvalidRegion {
                coords: *coords,
                width: dimensions.0,
                height: dimensions.1,
            });
        }

        let source = self.level_image(level)?;
        let scaled = scale_coordinates(*coords, dimensions, source.dimensions());
        let x = scaled.x_ul.min(source.width().saturating_sub(1));
        let y = scaled.y_ul.min(source.height().saturating_sub(1));
        let width = scaled.width().clamp(1, source.width() - x);
        let height = scaled.height().clamp(1, source.height() - y);

        let region = imageops::crop_imm(source, x, y, width, height).to_image();
        Ok(ImageTile::new(region, level, *coords))
    }

    fn processed_path(&self) -> &Path {
        &self.processed_path
    }
}

// =============================================================================
// Tests
// =============================================================================
