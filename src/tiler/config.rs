//! Tiler configuration.

use serde::Serialize;

use crate::error::TilerError;
use crate::mask::DEFAULT_MASK_CACHE_CAPACITY;

// =============================================================================
// Default Values
// =============================================================================

/// Default seed of the sampling sequence.
pub const DEFAULT_SEED: u32 = 7;

/// Default tile filename suffix.
pub const DEFAULT_SUFFIX: &str = ".png";

/// Default sampling-attempt budget.
pub const DEFAULT_MAX_ITER: u64 = 10_000;

/// Default number of consecutive out-of-bounds draws before giving up.
pub const DEFAULT_DISCARD_LIMIT: u64 = 100_000;

// =============================================================================
// TilerConfig
// =============================================================================

/// Parameters of a random tile extraction.
///
/// Built with [`TilerConfig::new`] and the `with_*` methods, then frozen
/// inside a [`RandomTiler`](super::RandomTiler), which validates it.
///
/// # Example
///
/// ```
/// use wsi_tiler::tiler::{RandomTiler, TilerConfig};
///
/// let config = TilerConfig::new((256, 256), 50)
///     .with_level(1)
///     .with_seed(42)
///     .with_prefix("train/");
///
/// let tiler = RandomTiler::new(config).unwrap();
/// assert_eq!(tiler.config().level(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TilerConfig {
    tile_size: (u32, u32),
    n_tiles: u64,
    level: u32,
    seed: u32,
    check_tissue: bool,
    prefix: String,
    suffix: String,
    max_iter: u64,
    discard_limit: u64,
    mask_cache_capacity: usize,
}

impl TilerConfig {
    /// Configuration for `n_tiles` tiles of `(width, height)` pixels, with
    /// defaults for everything else.
    pub fn new(tile_size: (u32, u32), n_tiles: u64) -> Self {
        Self {
            tile_size,
            n_tiles,
            level: 0,
            seed: DEFAULT_SEED,
            check_tissue: true,
            prefix: String::new(),
            suffix: DEFAULT_SUFFIX.to_string(),
            max_iter: DEFAULT_MAX_ITER,
            discard_limit: DEFAULT_DISCARD_LIMIT,
            mask_cache_capacity: DEFAULT_MASK_CACHE_CAPACITY,
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_check_tissue(mut self, check_tissue: bool) -> Self {
        self.check_tissue = check_tissue;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_max_iter(mut self, max_iter: u64) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Stop after this many consecutive out-of-bounds draws.
    pub fn with_discard_limit(mut self, limit: u64) -> Self {
        self.discard_limit = limit;
        self
    }

    pub fn with_mask_cache_capacity(mut self, capacity: usize) -> Self {
        self.mask_cache_capacity = capacity;
        self
    }

    /// Check the configuration invariants.
    ///
    /// # Errors
    ///
    /// - [`TilerError::InvalidConfig`] if `max_iter < n_tiles`
    /// - [`TilerError::ZeroTileSize`] if either tile side is zero
    /// - [`TilerError::ZeroCacheCapacity`] if the mask cache capacity is zero
    pub fn validate(&self) -> Result<(), TilerError> {
        if self.max_iter < self.n_tiles {
            return Err(TilerError::InvalidConfig {
                max_iter: self.max_iter,
                n_tiles: self.n_tiles,
            });
        }
        let (width, height) = self.tile_size;
        if width == 0 || height == 0 {
            return Err(TilerError::ZeroTileSize { width, height });
        }
        if self.mask_cache_capacity == 0 {
            return Err(TilerError::ZeroCacheCapacity);
        }
        Ok(())
    }

    /// `(width, height)` of a tile at the extraction level.
    pub fn tile_size(&self) -> (u32, u32) {
        self.tile_size
    }

    pub fn n_tiles(&self) -> u64 {
        self.n_tiles
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn check_tissue(&self) -> bool {
        self.check_tissue
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn max_iter(&self) -> u64 {
        self.max_iter
    }

    pub fn discard_limit(&self) -> u64 {
        self.discard_limit
    }

    pub fn mask_cache_capacity(&self) -> usize {
        self.mask_cache_capacity
    }
}

// =============================================================================
// Tests
// =============================================================================
