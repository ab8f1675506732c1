//! Extraction masks and their caching.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              RandomTiler                │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │            BoxMaskResolver              │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │  MaskCache   │  │   MaskCache     │  │
//! │  │  (level 0)   │  │ (target level)  │  │
//! │  └──────────────┘  └─────────────────┘  │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │       Slide (tissue segmentation)       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`BoxMask`]: row-major boolean mask with area-preserving resize
//! - [`MaskCache`]: LRU cache of masks keyed by slide id
//! - [`BoxMaskResolver`]: builds the level-0 and target-level masks of a slide

mod box_mask;
mod cache;
mod resolver;

pub use box_mask::BoxMask;
pub use cache::{MaskCache, DEFAULT_MASK_CACHE_CAPACITY};
pub use resolver::BoxMaskResolver;
