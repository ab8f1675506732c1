//! Simple tissue segmentation for raster slides.
//!
//! Slide glass is bright and stained tissue is dark, so a global Otsu
//! threshold on a grayscale thumbnail separates the two well enough to
//! decide where tiles may be sampled.

use std::collections::HashMap;

use image::{GrayImage, Luma};
use imageproc::contrast::otsu_level;
use imageproc::region_labelling::{connected_components, Connectivity};

use crate::geometry::CoordinatePair;
use crate::mask::BoxMask;

/// Otsu's method on an 8-bit grayscale image.
///
/// Pixels at or below the returned level form the dark class.
pub fn otsu_threshold(image: &GrayImage) -> u8 {
    otsu_level(image)
}

/// Tissue mask of a grayscale image: pixels darker than or equal to the
/// Otsu threshold. A uniform image has no tissue.
pub fn tissue_mask(image: &GrayImage) -> BoxMask {
    let (min, max) = image
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p[0]), hi.max(p[0])));
    if min >= max {
        return BoxMask::filled(image.width(), image.height(), false);
    }

    let threshold = otsu_threshold(image);
    BoxMask::from_fn(image.width(), image.height(), |x, y| {
        image.get_pixel(x, y)[0] <= threshold
    })
}

/// Bounding box of the largest 8-connected region of on pixels.
///
/// The box is exclusive on its bottom-right corner. Ties go to the region
/// found first in row-major order. Returns `None` for an empty mask.
pub fn biggest_region_box(mask: &BoxMask) -> Option<CoordinatePair> {
    let labels = connected_components(&mask.to_gray(), Connectivity::Eight, Luma([0u8]));

    // label -> (pixel count, min_x, min_y, max_x, max_y)
    let mut regions: HashMap<u32, (usize, u32, u32, u32, u32)> = HashMap::new();
    for (x, y, label) in labels.enumerate_pixels() {
        let label = label[0];
        if label == 0 {
            continue;
        }
        let region = regions.entry(label).or_insert((0, x, y, x, y));
        region.0 += 1;
        region.1 = region.1.min(x);
        region.2 = region.2.min(y);
        region.3 = region.3.max(x);
        region.4 = region.4.max(y);
    }

    regions
        .into_iter()
        .max_by(|(la, a), (lb, b)| a.0.cmp(&b.0).then(lb.cmp(la)))
        .map(|(_, (_, min_x, min_y, max_x, max_y))| {
            CoordinatePair::new(min_x, min_y, max_x + 1, max_y + 1)
        })
}

// =============================================================================
// Tests
// =============================================================================
