//! Rejection sampler integration tests.
//!
//! Tests verify:
//! - Reproducibility for a fixed seed
//! - Tile-count and attempt budgets
//! - Out-of-bounds draws are retried without consuming the budget
//! - Sampling follows the mask shape and the extraction level
//! - Hard slide errors end the sequence

use wsi_tiler::error::SlideError;
use wsi_tiler::geometry::CoordinatePair;
use wsi_tiler::mask::BoxMask;
use wsi_tiler::slide::Slide;
use wsi_tiler::tiler::{RandomTiler, TilerConfig};

use super::test_utils::{quadrant_slide, MockSlide};

fn boxes(tiler: &mut RandomTiler, slide: &MockSlide) -> Vec<CoordinatePair> {
    tiler
        .random_tiles(slide)
        .unwrap()
        .map(|item| item.unwrap().1)
        .collect()
}

// =============================================================================
// Reproducibility
// =============================================================================

#[test]
fn test_same_seed_same_sequence() {
    let slide = quadrant_slide("slide-a");
    let config = TilerConfig::new((100, 100), 10).with_max_iter(100);

    let mut first = RandomTiler::new(config.clone()).unwrap();
    let mut second = RandomTiler::new(config).unwrap();

    let a = boxes(&mut first, &slide);
    let b = boxes(&mut second, &slide);
    assert_eq!(a.len(), 10);
    assert_eq!(a, b);
}

#[test]
fn test_reseeded_on_every_run() {
    let slide = quadrant_slide("slide-a");
    let mut tiler = RandomTiler::new(TilerConfig::new((100, 100), 10).with_max_iter(100)).unwrap();

    let a = boxes(&mut tiler, &slide);
    let b = boxes(&mut tiler, &slide);
    assert_eq!(a, b);
}

#[test]
fn test_different_seed_different_sequence() {
    let slide = quadrant_slide("slide-a");
    let config = TilerConfig::new((100, 100), 10).with_max_iter(100);

    let a = boxes(&mut RandomTiler::new(config.clone().with_seed(1)).unwrap(), &slide);
    let b = boxes(&mut RandomTiler::new(config.with_seed(2)).unwrap(), &slide);
    assert_ne!(a, b);
}

// =============================================================================
// Budgets
// =============================================================================

#[test]
fn test_stops_at_exactly_n_tiles() {
    // The accepted-tile budget is checked with `>=` before each attempt.
    // Comparing with a strict `>` after yielding, as earlier tilers did,
    // produced one tile more than requested (6 here).
    let slide = quadrant_slide("slide-a");
    let mut tiler = RandomTiler::new(TilerConfig::new((100, 100), 5).with_max_iter(50)).unwrap();

    let mut tiles = tiler.random_tiles(&slide).unwrap();
    let count = tiles.by_ref().count();

    assert_eq!(count, 5);
    assert_eq!(tiles.accepted(), 5);
    assert_eq!(tiles.attempts(), 5);
}

#[test]
fn test_attempts_never_exceed_max_iter() {
    let slide = quadrant_slide("slide-a").with_tissue_rule(|_| false);
    let mut tiler = RandomTiler::new(TilerConfig::new((100, 100), 5).with_max_iter(20)).unwrap();

    let mut tiles = tiler.random_tiles(&slide).unwrap();
    assert_eq!(tiles.by_ref().count(), 0);
    assert_eq!(tiles.attempts(), 20);
    assert_eq!(slide.extract_calls(), 20);
}

#[test]
fn test_failed_tissue_checks_consume_budget() {
    // Only tiles anchored in the left half of the tissue pass
    let slide = quadrant_slide("slide-a").with_tissue_rule(|c| c.x_ul < 250);
    let mut tiler = RandomTiler::new(TilerConfig::new((100, 100), 50).with_max_iter(60)).unwrap();

    let mut tiles = tiler.random_tiles(&slide).unwrap();
    let accepted: Vec<_> = tiles.by_ref().map(|item| item.unwrap().1).collect();

    assert!(accepted.len() < 50);
    assert!(accepted.iter().all(|c| c.x_ul < 250));
    assert_eq!(tiles.attempts(), 60);
}

#[test]
fn test_check_tissue_disabled_accepts_everything() {
    let slide = MockSlide::new("slide-a", &[(1000, 1000)]).with_tissue_rule(|_| false);
    let config = TilerConfig::new((100, 100), 8)
        .with_max_iter(8)
        .with_check_tissue(false);
    let mut tiler = RandomTiler::new(config).unwrap();

    assert_eq!(boxes(&mut tiler, &slide).len(), 8);
}

#[test]
fn test_zero_tiles_requested() {
    let slide = quadrant_slide("slide-a");
    let mut tiler = RandomTiler::new(TilerConfig::new((100, 100), 0).with_max_iter(0)).unwrap();

    assert!(boxes(&mut tiler, &slide).is_empty());
    assert_eq!(slide.extract_calls(), 0);
}

// =============================================================================
// Out-of-bounds Draws
// =============================================================================

#[test]
fn test_invalid_regions_do_not_count() {
    // Any anchor past 600 makes a 400px tile overflow the 1000px slide
    let slide = MockSlide::new("slide-a", &[(1000, 1000)]);
    let config = TilerConfig::new((400, 400), 10)
        .with_max_iter(10)
        .with_check_tissue(false);
    let mut tiler = RandomTiler::new(config).unwrap();

    let mut tiles = tiler.random_tiles(&slide).unwrap();
    let accepted: Vec<_> = tiles.by_ref().map(|item| item.unwrap().1).collect();

    assert_eq!(accepted.len(), 10);
    assert_eq!(tiles.attempts(), 10);
    assert!(accepted.iter().all(|c| c.x_br <= 1000 && c.y_br <= 1000));
    assert_eq!(
        tiles.discarded() as usize,
        slide.extract_calls() - tiles.attempts() as usize
    );
}

#[test]
fn test_discard_limit_stops_hopeless_sampling() {
    // Tiles larger than the slide can never be extracted
    let slide = MockSlide::new("slide-a", &[(100, 100)]);
    let config = TilerConfig::new((200, 200), 3)
        .with_max_iter(3)
        .with_check_tissue(false)
        .with_discard_limit(50);
    let mut tiler = RandomTiler::new(config).unwrap();

    let mut tiles = tiler.random_tiles(&slide).unwrap();
    assert!(tiles.next().is_none());
    assert_eq!(tiles.discarded(), 50);
    assert_eq!(tiles.attempts(), 0);
    assert!(tiles.next().is_none());
}

// =============================================================================
// Mask Shape and Levels
// =============================================================================

#[test]
fn test_samples_follow_mask() {
    // Two disjoint tissue patches; the gap between them is never sampled
    let tissue = BoxMask::from_fn(1000, 1000, |x, y| {
        (x < 100 && y < 100) || ((800..900).contains(&x) && (800..900).contains(&y))
    });
    let slide = MockSlide::new("slide-a", &[(1000, 1000)]).with_tissue(tissue);
    let mut tiler = RandomTiler::new(TilerConfig::new((50, 50), 40).with_max_iter(40)).unwrap();

    for coords in boxes(&mut tiler, &slide) {
        assert!(coords.x_ul < 100 || (800..900).contains(&coords.x_ul));
        assert!(coords.y_ul < 100 || (800..900).contains(&coords.y_ul));
    }
}

#[test]
fn test_level_one_boxes_are_level_zero_coordinates() {
    let slide = quadrant_slide("slide-a");
    let config = TilerConfig::new((100, 100), 10)
        .with_level(1)
        .with_max_iter(100);
    let mut tiler = RandomTiler::new(config).unwrap();

    let found = boxes(&mut tiler, &slide);
    assert_eq!(found.len(), 10);
    for coords in found {
        // 100px at level 1 is 200px at level 0
        assert_eq!(coords.width(), 200);
        assert_eq!(coords.height(), 200);
        assert_eq!(coords.x_ul % 2, 0);
        assert!(coords.x_ul < 500 && coords.y_ul < 500);
    }
}

#[test]
fn test_tiles_are_read_at_configured_level() {
    let slide = quadrant_slide("slide-a");
    let config = TilerConfig::new((100, 100), 3)
        .with_level(1)
        .with_max_iter(10);
    let mut tiler = RandomTiler::new(config).unwrap();

    for item in tiler.random_tiles(&slide).unwrap() {
        assert_eq!(item.unwrap().0.level, 1);
    }
}

#[test]
fn test_empty_mask_yields_nothing() {
    let slide = MockSlide::new("slide-a", &[(1000, 1000)])
        .with_tissue(BoxMask::filled(1000, 1000, false));
    let mut tiler = RandomTiler::new(TilerConfig::new((100, 100), 5)).unwrap();

    assert!(boxes(&mut tiler, &slide).is_empty());
    assert_eq!(slide.extract_calls(), 0);
}

// =============================================================================
// Error Propagation
// =============================================================================

#[test]
fn test_hard_error_ends_sequence() {
    let slide = quadrant_slide("slide-a").with_failure(SlideError::Decode {
        message: "corrupt".to_string(),
    });
    let mut tiler = RandomTiler::new(TilerConfig::new((100, 100), 5)).unwrap();

    let mut tiles = tiler.random_tiles(&slide).unwrap();
    let first = tiles.next().unwrap();
    assert!(matches!(first, Err(SlideError::Decode { .. })));
    assert!(tiles.next().is_none());
    assert_eq!(slide.extract_calls(), 1);
}

#[test]
fn test_unknown_level_fails_before_sampling() {
    let slide = quadrant_slide("slide-a");
    let config = TilerConfig::new((100, 100), 5).with_level(4);
    let mut tiler = RandomTiler::new(config).unwrap();

    let result = tiler.random_tiles(&slide);
    assert!(matches!(
        result.err(),
        Some(SlideError::LevelOutOfRange { level: 4, levels: 2 })
    ));
    assert_eq!(slide.level_count(), 2);
}
