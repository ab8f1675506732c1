//! Binary extraction masks.
//!
//! A [`BoxMask`] holds one boolean per pixel of a pyramid level, stored
//! row-major with shape `(height, width)`. Masks are immutable once built and
//! shared behind `Arc` by the mask cache.

use image::{GrayImage, Luma};

use crate::geometry::CoordinatePair;

/// Fraction of a target pixel's source footprint that must be "on" for the
/// resized pixel to be "on".
const RESIZE_COVERAGE: f64 = 0.5;

// =============================================================================
// BoxMask
// =============================================================================

/// Boolean mask over a level's pixel grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxMask {
    width: u32,
    height: u32,
    data: Vec<bool>,
}

impl BoxMask {
    /// Mask of the given size with every pixel set to `value`.
    pub fn filled(width: u32, height: u32, value: bool) -> Self {
        Self {
            width,
            height,
            data: vec![value; width as usize * height as usize],
        }
    }

    /// Mask with every pixel off except those inside `coords` (clipped).
    pub fn from_box(width: u32, height: u32, coords: &CoordinatePair) -> Self {
        let x_end = coords.x_br.min(width);
        let y_end = coords.y_br.min(height);
        Self::from_fn(width, height, |x, y| {
            x >= coords.x_ul && x < x_end && y >= coords.y_ul && y < y_end
        })
    }

    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> bool,
    {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Build from raw row-major data. Returns `None` if the length does not
    /// match `width * height`.
    pub fn from_vec(width: u32, height: u32, data: Vec<bool>) -> Option<Self> {
        if data.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    /// Threshold a grayscale image: pixels strictly above `threshold` are on.
    pub fn from_gray(image: &GrayImage, threshold: u8) -> Self {
        Self::from_fn(image.width(), image.height(), |x, y| {
            image.get_pixel(x, y)[0] > threshold
        })
    }

    /// Render as a black/white image, mainly for debugging masks on disk.
    pub fn to_gray(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            Luma([if self.get(x, y) { 255 } else { 0 }])
        })
    }

    /// `(width, height)` of the mask.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Value at `(x, y)`; out-of-range pixels read as off.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.data[self.index(x, y)]
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Number of on pixels.
    pub fn count_on(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    /// True if no pixel is on.
    pub fn is_empty(&self) -> bool {
        !self.data.iter().any(|&v| v)
    }

    /// True if every pixel is on.
    pub fn is_full(&self) -> bool {
        self.data.iter().all(|&v| v)
    }

    /// Column and row indices of every on pixel, in row-major order.
    ///
    /// The two vectors have equal length; entry `i` of each describes the
    /// i-th on pixel.
    pub fn on_pixel_indices(&self) -> (Vec<u32>, Vec<u32>) {
        let count = self.count_on();
        let mut xs = Vec::with_capacity(count);
        let mut ys = Vec::with_capacity(count);
        for y in 0..self.height {
            let row = &self.data[self.index(0, y)..self.index(0, y) + self.width as usize];
            for (x, &on) in row.iter().enumerate() {
                if on {
                    xs.push(x as u32);
                    ys.push(y);
                }
            }
        }
        (xs, ys)
    }

    /// Resize to `(width, height)` preserving mask semantics.
    ///
    /// Each target pixel covers a rectangular footprint in the source. When
    /// downscaling, the pixel is on if at least half of its footprint is on;
    /// when upscaling the footprint is the single nearest source pixel. A
    /// target pixel whose footprint holds no on pixel is never on.
    pub fn resize(&self, width: u32, height: u32) -> Self {
        if (width, height) == (self.width, self.height) {
            return self.clone();
        }
        if self.width == 0 || self.height == 0 || width == 0 || height == 0 {
            return Self::filled(width, height, false);
        }

        let table = SummedAreaTable::new(self);
        let x_spans = footprints(self.width, width);
        let y_spans = footprints(self.height, height);

        Self::from_fn(width, height, |x, y| {
            let (x0, x1) = x_spans[x as usize];
            let (y0, y1) = y_spans[y as usize];
            let on = table.sum(x0, y0, x1, y1);
            if on == 0 {
                return false;
            }
            let area = u64::from(x1 - x0) * u64::from(y1 - y0);
            on as f64 >= area as f64 * RESIZE_COVERAGE
        })
    }
}

/// Source span `[start, end)` covered by each target pixel along one axis.
fn footprints(source: u32, target: u32) -> Vec<(u32, u32)> {
    let ratio = f64::from(source) / f64::from(target);
    (0..target)
        .map(|t| {
            if ratio <= 1.0 {
                // Upscale: nearest source pixel to the target pixel centre
                let centre = ((f64::from(t) + 0.5) * ratio).floor() as u32;
                let s = centre.min(source - 1);
                (s, s + 1)
            } else {
                let start = (f64::from(t) * ratio).floor() as u32;
                let end = (f64::from(t + 1) * ratio).ceil() as u32;
                let start = start.min(source - 1);
                (start, end.clamp(start + 1, source))
            }
        })
        .collect()
}

// =============================================================================
// Summed Area Table
// =============================================================================

/// Integral image over a mask, for O(1) on-pixel counts in any rectangle.
struct SummedAreaTable {
    stride: usize,
    sums: Vec<u64>,
}

impl SummedAreaTable {
    fn new(mask: &BoxMask) -> Self {
        let stride = mask.width as usize + 1;
        let mut sums = vec![0u64; stride * (mask.height as usize + 1)];
        for y in 0..mask.height as usize {
            let mut row = 0u64;
            for x in 0..mask.width as usize {
                row += u64::from(mask.data[y * mask.width as usize + x]);
                sums[(y + 1) * stride + x + 1] = sums[y * stride + x + 1] + row;
            }
        }
        Self { stride, sums }
    }

    /// On-pixel count in `[x0, x1) x [y0, y1)`.
    fn sum(&self, x0: u32, y0: u32, x1: u32, y1: u32) -> u64 {
        let at = |x: u32, y: u32| self.sums[y as usize * self.stride + x as usize];
        at(x1, y1) + at(x0, y0) - at(x0, y1) - at(x1, y0)
    }
}

// =============================================================================
// Tests
// =============================================================================
