//! Naming and reporting of extracted tiles.

use std::path::PathBuf;

use serde::Serialize;

use crate::geometry::CoordinatePair;

/// Filename of an extracted tile.
///
/// The pattern is
/// `{prefix}tile_{sequence}_level{level}_{x_ul}-{y_ul}-{x_br}-{y_br}{suffix}`
/// where the coordinates are level-0 pixels.
///
/// ```
/// use wsi_tiler::geometry::CoordinatePair;
/// use wsi_tiler::tiler::tile_filename;
///
/// let name = tile_filename("p_", 3, 1, &CoordinatePair::new(10, 20, 530, 540), ".png");
/// assert_eq!(name, "p_tile_3_level1_10-20-530-540.png");
/// ```
pub fn tile_filename(
    prefix: &str,
    sequence: usize,
    level: u32,
    coords: &CoordinatePair,
    suffix: &str,
) -> String {
    format!("{prefix}tile_{sequence}_level{level}_{coords}{suffix}")
}

/// Outcome of one extraction run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionReport {
    /// Identity of the slide the tiles were cut from
    pub slide_id: String,

    /// Number of tiles written
    pub tiles_saved: u64,

    /// Sampling attempts counted against the iteration budget
    pub attempts: u64,

    /// Out-of-bounds draws that were retried
    pub discarded: u64,

    /// Paths of the written tiles, in sequence order
    pub filenames: Vec<PathBuf>,
}
