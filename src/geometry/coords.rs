//! Bounding boxes and cross-level coordinate scaling.

use std::fmt;

use serde::Serialize;

// =============================================================================
// Coordinate Pair
// =============================================================================

/// A bounding box in one pyramid level's pixel space.
///
/// The upper-left corner is inclusive, the bottom-right corner exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CoordinatePair {
    pub x_ul: u32,
    pub y_ul: u32,
    pub x_br: u32,
    pub y_br: u32,
}

impl CoordinatePair {
    pub fn new(x_ul: u32, y_ul: u32, x_br: u32, y_br: u32) -> Self {
        Self {
            x_ul,
            y_ul,
            x_br,
            y_br,
        }
    }

    /// Box anchored at `(x, y)` with the given extent.
    pub fn from_origin(x: u32, y: u32, (width, height): (u32, u32)) -> Self {
        Self::new(x, y, x.saturating_add(width), y.saturating_add(height))
    }

    /// Width of the box, zero if the corners are inverted.
    pub fn width(&self) -> u32 {
        self.x_br.saturating_sub(self.x_ul)
    }

    /// Height of the box, zero if the corners are inverted.
    pub fn height(&self) -> u32 {
        self.y_br.saturating_sub(self.y_ul)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Whether the box fits inside an image of `(width, height)` pixels.
    pub fn fits_within(&self, (width, height): (u32, u32)) -> bool {
        !self.is_empty() && self.x_br <= width && self.y_br <= height
    }
}

/// Formats as `x_ul-y_ul-x_br-y_br`, the form used in tile filenames.
impl fmt::Display for CoordinatePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}-{}", self.x_ul, self.y_ul, self.x_br, self.y_br)
    }
}

// =============================================================================
// Scaling
// =============================================================================

/// Map a box from the reference level's pixel space to the target level's.
///
/// Each coordinate is multiplied by `target / reference` along its own axis
/// and rounded to the nearest pixel. Identical sizes return the input
/// untouched so level-0 boxes never drift.
pub fn scale_coordinates(
    reference: CoordinatePair,
    reference_size: (u32, u32),
    target_size: (u32, u32),
) -> CoordinatePair {
    if reference_size == target_size {
        return reference;
    }

    let (ref_w, ref_h) = reference_size;
    let (tgt_w, tgt_h) = target_size;

    CoordinatePair {
        x_ul: scale_axis(reference.x_ul, ref_w, tgt_w),
        y_ul: scale_axis(reference.y_ul, ref_h, tgt_h),
        x_br: scale_axis(reference.x_br, ref_w, tgt_w),
        y_br: scale_axis(reference.y_br, ref_h, tgt_h),
    }
}

#[inline]
fn scale_axis(value: u32, reference: u32, target: u32) -> u32 {
    if reference == target {
        return value;
    }
    if reference == 0 {
        return 0;
    }
    let scaled = (f64::from(value) * f64::from(target) / f64::from(reference)).round();
    scaled.clamp(0.0, f64::from(u32::MAX)) as u32
}

// =============================================================================
// Tests
// =============================================================================
