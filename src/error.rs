use std::path::PathBuf;

use thiserror::Error;

use crate::geometry::CoordinatePair;

/// Errors raised while building a tiler from its configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TilerError {
    /// The sampling budget cannot cover the requested number of tiles
    #[error(
        "The maximum number of iterations must be greater than or equal to the maximum \
         number of tiles. Got max_iter={max_iter} and n_tiles={n_tiles}"
    )]
    InvalidConfig { max_iter: u64, n_tiles: u64 },

    /// Tile width or height is zero
    #[error("Tile size must be non-zero, got {width}x{height}")]
    ZeroTileSize { width: u32, height: u32 },

    /// Mask cache capacity is zero
    #[error("Mask cache capacity must be greater than 0")]
    ZeroCacheCapacity,
}

/// Errors reported by a [`Slide`](crate::slide::Slide) collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlideError {
    /// The requested box lies outside the slide's level-0 extent.
    ///
    /// The random sampler absorbs this condition and retries.
    #[error("Invalid region {coords} for slide of size {width}x{height}")]
    InvalidRegion {
        coords: CoordinatePair,
        width: u32,
        height: u32,
    },

    /// Requested pyramid level does not exist
    #[error("Level {level} out of range (slide has {levels} levels)")]
    LevelOutOfRange { level: u32, levels: u32 },

    /// Slide file could not be opened or decoded
    #[error("Failed to decode slide: {message}")]
    Decode { message: String },

    /// A tissue mask does not match the slide's level-0 dimensions
    #[error("Mask shape {actual:?} does not match slide dimensions {expected:?}")]
    MaskShape {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

/// Errors raised while persisting a tile.
#[derive(Debug, Clone, Error)]
pub enum TileError {
    /// Writing the tile to storage failed
    #[error("Failed to save tile to {path}: {message}")]
    Save { path: PathBuf, message: String },
}

/// Errors that abort an extraction run.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Non-recoverable slide error
    #[error("Slide error: {0}")]
    Slide(#[from] SlideError),

    /// Tile persistence failed
    #[error("Tile error: {0}")]
    Tile(#[from] TileError),

    /// Output directory could not be prepared
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The tiler variant has no placement algorithm yet
    #[error("Unsupported tiler: {0}")]
    Unsupported(&'static str),
}
