//! Resolution of the extraction mask for a slide.
//!
//! The resolver answers two questions for a slide: which level-0 pixels may
//! anchor a tile, and what that mask looks like at the tiler's target level.
//! Both answers are memoized per slide in resolver-owned [`MaskCache`]s, so
//! unrelated tilers never share cache state by accident.

use std::sync::Arc;

use tracing::debug;

use crate::error::{SlideError, TilerError};
use crate::slide::Slide;

use super::{BoxMask, MaskCache};

/// Produces and caches level-0 and target-level extraction masks.
pub struct BoxMaskResolver {
    check_tissue: bool,
    level: u32,
    level0: MaskCache,
    scaled: MaskCache,
}

impl BoxMaskResolver {
    /// Resolver with the default cache capacity for each mask kind.
    pub fn new(check_tissue: bool, level: u32) -> Self {
        Self {
            check_tissue,
            level,
            level0: MaskCache::new(),
            scaled: MaskCache::new(),
        }
    }

    /// Resolver whose two caches each hold at most `capacity` masks.
    pub fn with_capacity(check_tissue: bool, level: u32, capacity: usize) -> Result<Self, TilerError> {
        Ok(Self {
            check_tissue,
            level,
            level0: MaskCache::with_capacity(capacity)?,
            scaled: MaskCache::with_capacity(capacity)?,
        })
    }

    /// Target level of the scaled mask.
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn check_tissue(&self) -> bool {
        self.check_tissue
    }

    /// Level-0 mask of the pixels to consider for extraction.
    ///
    /// With tissue checking enabled this is the slide's biggest tissue box
    /// mask; otherwise every pixel of the slide is on. The mask has the
    /// slide's level-0 dimensions.
    pub fn box_mask<S: Slide>(&mut self, slide: &S) -> Result<Arc<BoxMask>, SlideError> {
        let check_tissue = self.check_tissue;
        self.level0
            .get_or_insert_with(slide.id(), || compute_box_mask(slide, check_tissue))
    }

    /// Extraction mask at the configured level.
    ///
    /// At level 0 this is the level-0 mask itself, with no resize.
    pub fn box_mask_at_level<S: Slide>(&mut self, slide: &S) -> Result<Arc<BoxMask>, SlideError> {
        if self.level == 0 {
            return self.box_mask(slide);
        }

        let level = self.level;
        let check_tissue = self.check_tissue;
        let level0 = &mut self.level0;
        self.scaled.get_or_insert_with(slide.id(), || {
            let source = level0
                .get_or_insert_with(slide.id(), || compute_box_mask(slide, check_tissue))?;
            let (width, height) = slide.level_dimensions(level)?;
            debug!(
                slide_id = slide.id(),
                level,
                from = ?source.dimensions(),
                to = ?(width, height),
                "resizing box mask"
            );
            Ok(source.resize(width, height))
        })
    }

    /// Cache of level-0 masks.
    pub fn level0_cache(&self) -> &MaskCache {
        &self.level0
    }

    /// Cache of target-level masks.
    pub fn scaled_cache(&self) -> &MaskCache {
        &self.scaled
    }

    /// Drop every cached mask.
    pub fn clear(&mut self) {
        self.level0.clear();
        self.scaled.clear();
    }
}

impl Default for BoxMaskResolver {
    fn default() -> Self {
        Self::new(true, 0)
    }
}

fn compute_box_mask<S: Slide>(slide: &S, check_tissue: bool) -> Result<BoxMask, SlideError> {
    let (width, height) = slide.dimensions();

    if !check_tissue {
        return Ok(BoxMask::filled(width, height, true));
    }

    let mask = slide.biggest_tissue_box_mask()?;
    if mask.dimensions() != (width, height) {
        return Err(SlideError::MaskShape {
            expected: (width, height),
            actual: mask.dimensions(),
        });
    }
    Ok(mask)
}
