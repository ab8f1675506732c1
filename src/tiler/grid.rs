//! Grid placement of tiles.
//!
//! A grid tiler places tiles deterministically so that the tissue region is
//! covered, rather than sampling them. The placement algorithm is not
//! available yet: [`GridTiler::extract`](super::Tiler::extract) reports
//! [`ExtractError::Unsupported`] without touching the slide.

use tracing::warn;

use crate::error::{ExtractError, TilerError};
use crate::slide::Slide;

use super::extract::ExtractionReport;
use super::Tiler;

/// Deterministic, coverage-oriented tiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridTiler {
    tile_size: (u32, u32),
    level: u32,
    check_tissue: bool,
    prefix: String,
    suffix: String,
}

impl GridTiler {
    pub fn new(
        tile_size: (u32, u32),
        level: u32,
        check_tissue: bool,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Result<Self, TilerError> {
        let (width, height) = tile_size;
        if width == 0 || height == 0 {
            return Err(TilerError::ZeroTileSize { width, height });
        }
        Ok(Self {
            tile_size,
            level,
            check_tissue,
            prefix: prefix.into(),
            suffix: suffix.into(),
        })
    }

    pub fn tile_size(&self) -> (u32, u32) {
        self.tile_size
    }

    pub fn level(&self) -> u32 {
        self.level
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
}

impl Tiler for GridTiler {
    fn extract<S: Slide>(&mut self, slide: &S) -> Result<ExtractionReport, ExtractError> {
        warn!(slide_id = slide.id(), "grid tiling is not available");
        Err(ExtractError::Unsupported("grid tiling"))
    }
}
