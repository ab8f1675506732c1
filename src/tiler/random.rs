//! Random tile extraction by rejection sampling.
//!
//! # Algorithm
//!
//! Each attempt draws an upper-left corner from the "on" pixels of the
//! target-level mask, forms a tile-sized box there, rescales the box to
//! level 0 and asks the slide to extract it:
//!
//! - an out-of-bounds box is discarded and does **not** count as an attempt
//! - a tile failing the tissue check counts as an attempt but is not yielded
//! - an accepted tile counts as an attempt and is yielded
//!
//! Sampling stops once `max_iter` attempts were made or `n_tiles` tiles were
//! accepted, whichever comes first. Both budgets are checked before every
//! attempt, so neither is ever exceeded.
//!
//! The x and y coordinates are drawn independently, each uniformly over the
//! column (resp. row) indices of all on pixels, so sampling density follows
//! the mask's shape rather than its bounding rectangle.

use std::fs;
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::error::{ExtractError, SlideError, TilerError};
use crate::geometry::{scale_coordinates, CoordinatePair};
use crate::mask::{BoxMask, BoxMaskResolver};
use crate::slide::{Slide, Tile};

use super::config::TilerConfig;
use super::extract::{tile_filename, ExtractionReport};
use super::Tiler;

// =============================================================================
// RandomTiler
// =============================================================================

/// Extracts randomly placed tiles from tissue regions of a slide.
///
/// The tiler owns its mask resolver, so masks computed for a slide are
/// reused across extractions with the same tiler.
pub struct RandomTiler {
    config: TilerConfig,
    resolver: BoxMaskResolver,
}

impl RandomTiler {
    /// Build a tiler, validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TilerError::InvalidConfig`] if `max_iter < n_tiles`, and the
    /// other [`TilerError`] variants for degenerate sizes.
    pub fn new(config: TilerConfig) -> Result<Self, TilerError> {
        config.validate()?;
        let resolver = BoxMaskResolver::with_capacity(
            config.check_tissue(),
            config.level(),
            config.mask_cache_capacity(),
        )?;
        Ok(Self { config, resolver })
    }

    pub fn config(&self) -> &TilerConfig {
        &self.config
    }

    /// Mask resolver shared by every extraction of this tiler.
    pub fn resolver(&self) -> &BoxMaskResolver {
        &self.resolver
    }

    /// Level-0 extraction mask of `slide`.
    pub fn box_mask<S: Slide>(&mut self, slide: &S) -> Result<Arc<BoxMask>, SlideError> {
        self.resolver.box_mask(slide)
    }

    /// Extraction mask of `slide` at the configured level.
    pub fn box_mask_at_level<S: Slide>(&mut self, slide: &S) -> Result<Arc<BoxMask>, SlideError> {
        self.resolver.box_mask_at_level(slide)
    }

    /// Start a new sampling run over `slide`.
    ///
    /// The random sequence is seeded afresh from the configured seed, so two
    /// runs over the same slide produce the same tiles.
    pub fn random_tiles<'a, S: Slide>(
        &mut self,
        slide: &'a S,
    ) -> Result<RandomTiles<'a, S>, SlideError> {
        let mask = self.resolver.box_mask_at_level(slide)?;
        let level_size = slide.level_dimensions(self.config.level())?;
        let level0_size = slide.level_dimensions(0)?;

        let (xs, ys) = mask.on_pixel_indices();
        if xs.is_empty() {
            warn!(slide_id = slide.id(), "extraction mask is empty, no tiles to sample");
        }

        Ok(RandomTiles {
            slide,
            rng: ChaCha8Rng::seed_from_u64(u64::from(self.config.seed())),
            xs,
            ys,
            tile_size: self.config.tile_size(),
            level: self.config.level(),
            level_size,
            level0_size,
            check_tissue: self.config.check_tissue(),
            n_tiles: self.config.n_tiles(),
            max_iter: self.config.max_iter(),
            discard_limit: self.config.discard_limit(),
            attempts: 0,
            accepted: 0,
            discarded: 0,
            consecutive_discards: 0,
            done: false,
        })
    }
}

impl Tiler for RandomTiler {
    /// Sample tiles from `slide` and save them under its processed path.
    ///
    /// Tiles are numbered from zero in acceptance order and named with
    /// [`tile_filename`].
    fn extract<S: Slide>(&mut self, slide: &S) -> Result<ExtractionReport, ExtractError> {
        let output_dir = slide.processed_path();
        fs::create_dir_all(output_dir).map_err(|source| ExtractError::Io {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let mut tiles = self.random_tiles(slide)?;
        let mut filenames = Vec::new();

        for (sequence, item) in tiles.by_ref().enumerate() {
            let (tile, coords) = item?;
            let filename = tile_filename(
                self.config.prefix(),
                sequence,
                self.config.level(),
                &coords,
                self.config.suffix(),
            );
            let path = output_dir.join(&filename);
            // The prefix may name subdirectories of the output directory
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|source| ExtractError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            tile.save(&path)?;
            info!("Tile {} saved: {}", sequence, filename);
            filenames.push(path);
        }

        info!("{} random tiles have been saved.", filenames.len());

        Ok(ExtractionReport {
            slide_id: slide.id().to_string(),
            tiles_saved: filenames.len() as u64,
            attempts: tiles.attempts(),
            discarded: tiles.discarded(),
            filenames,
        })
    }
}

// =============================================================================
// RandomTiles
// =============================================================================

/// Lazy, finite sequence of accepted tiles and their level-0 boxes.
///
/// Out-of-bounds draws are retried internally and never surface. Any other
/// slide error is yielded once, after which the sequence ends.
pub struct RandomTiles<'a, S: Slide> {
    slide: &'a S,
    rng: ChaCha8Rng,
    xs: Vec<u32>,
    ys: Vec<u32>,
    tile_size: (u32, u32),
    level: u32,
    level_size: (u32, u32),
    level0_size: (u32, u32),
    check_tissue: bool,
    n_tiles: u64,
    max_iter: u64,
    discard_limit: u64,
    attempts: u64,
    accepted: u64,
    discarded: u64,
    consecutive_discards: u64,
    done: bool,
}

impl<S: Slide> RandomTiles<'_, S> {
    /// Attempts counted against `max_iter` so far.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Tiles yielded so far.
    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Out-of-bounds draws discarded so far.
    pub fn discarded(&self) -> u64 {
        self.discarded
    }

    /// Level-0 box of a tile anchored at a random on pixel.
    fn random_tile_coordinates(&mut self) -> CoordinatePair {
        let x = self.xs[self.rng.random_range(0..self.xs.len())];
        let y = self.ys[self.rng.random_range(0..self.ys.len())];
        let level_coords = CoordinatePair::from_origin(x, y, self.tile_size);
        scale_coordinates(level_coords, self.level_size, self.level0_size)
    }

    fn budget_exhausted(&self) -> bool {
        self.attempts >= self.max_iter || self.accepted >= self.n_tiles
    }
}

impl<S: Slide> Iterator for RandomTiles<'_, S> {
    type Item = Result<(S::Tile, CoordinatePair), SlideError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            if self.budget_exhausted() || self.xs.is_empty() {
                self.done = true;
                return None;
            }

            let coords = self.random_tile_coordinates();
            let tile = match self.slide.extract_tile(&coords, self.level) {
                Ok(tile) => tile,
                Err(SlideError::InvalidRegion { .. }) => {
                    self.discarded += 1;
                    self.consecutive_discards += 1;
                    debug!(%coords, "discarded out-of-bounds tile");
                    if self.consecutive_discards >= self.discard_limit {
                        warn!(
                            discarded = self.consecutive_discards,
                            "too many consecutive out-of-bounds tiles, stopping"
                        );
                        self.done = true;
                        return None;
                    }
                    continue;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            };

            self.consecutive_discards = 0;
            self.attempts += 1;

            if !self.check_tissue || tile.has_enough_tissue() {
                self.accepted += 1;
                return Some(Ok((tile, coords)));
            }
        }
    }
}
