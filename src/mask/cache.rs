//! LRU cache for computed slide masks.
//!
//! Mask computation (segmentation, then resizing to the target level) is the
//! most expensive step of tile extraction, and the sampler asks for the mask
//! of the same slide over and over. The cache memoizes one mask per slide.
//!
//! # Cache Key
//!
//! Entries are keyed by slide identity (the slide id string), never by mask
//! content.
//!
//! # Eviction
//!
//! The cache holds at most `capacity` masks and evicts the least-recently-used
//! entry when a new slide is inserted at capacity.
//!
//! # Thread Safety
//!
//! Lookups refresh recency order and therefore take `&mut self`. Share a
//! cache across threads only behind external synchronisation.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use tracing::debug;

use crate::error::TilerError;

use super::BoxMask;

/// Default number of masks kept per cache.
pub const DEFAULT_MASK_CACHE_CAPACITY: usize = 100;

// =============================================================================
// Mask Cache
// =============================================================================

/// Bounded LRU memoization of per-slide masks.
///
/// # Example
///
/// ```
/// use wsi_tiler::mask::{BoxMask, MaskCache};
///
/// let mut cache = MaskCache::new();
/// let mask = cache
///     .get_or_insert_with("slide-a", || Ok::<_, ()>(BoxMask::filled(4, 4, true)))
///     .unwrap();
///
/// // Second lookup returns the stored mask without calling the closure
/// let again = cache
///     .get_or_insert_with("slide-a", || Err(()))
///     .unwrap();
/// assert!(std::sync::Arc::ptr_eq(&mask, &again));
/// ```
pub struct MaskCache {
    /// The underlying LRU cache
    cache: LruCache<Arc<str>, Arc<BoxMask>>,

    hits: u64,
    misses: u64,
}

impl MaskCache {
    /// Create a cache holding [`DEFAULT_MASK_CACHE_CAPACITY`] masks.
    pub fn new() -> Self {
        Self::from_non_zero(
            NonZeroUsize::new(DEFAULT_MASK_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
        )
    }

    /// Create a cache holding at most `capacity` masks.
    ///
    /// # Errors
    ///
    /// Returns [`TilerError::ZeroCacheCapacity`] if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self, TilerError> {
        let capacity = NonZeroUsize::new(capacity).ok_or(TilerError::ZeroCacheCapacity)?;
        Ok(Self::from_non_zero(capacity))
    }

    fn from_non_zero(capacity: NonZeroUsize) -> Self {
        Self {
            cache: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Get the mask for `slide_id`, computing and storing it on a miss.
    ///
    /// A hit marks the entry as recently used and returns the very same
    /// `Arc` that was stored. Errors from `compute` are returned as-is and
    /// nothing is cached.
    pub fn get_or_insert_with<F, E>(&mut self, slide_id: &str, compute: F) -> Result<Arc<BoxMask>, E>
    where
        F: FnOnce() -> Result<BoxMask, E>,
    {
        if let Some(mask) = self.cache.get(slide_id) {
            self.hits += 1;
            debug!(slide_id, "mask cache hit");
            return Ok(Arc::clone(mask));
        }

        self.misses += 1;
        debug!(slide_id, "mask cache miss");

        let mask = Arc::new(compute()?);
        if let Some((evicted, _)) = self.cache.push(Arc::from(slide_id), Arc::clone(&mask)) {
            if &*evicted != slide_id {
                debug!(slide_id = %evicted, "evicted least recently used mask");
            }
        }
        Ok(mask)
    }

    /// Get a mask without computing it. Marks the entry as recently used.
    pub fn get(&mut self, slide_id: &str) -> Option<Arc<BoxMask>> {
        self.cache.get(slide_id).cloned()
    }

    /// Check if a mask is cached without updating LRU order.
    pub fn contains(&self, slide_id: &str) -> bool {
        self.cache.contains(slide_id)
    }

    /// Remove the mask of one slide.
    pub fn remove(&mut self, slide_id: &str) -> Option<Arc<BoxMask>> {
        self.cache.pop(slide_id)
    }

    /// Clear all entries. Hit and miss counters are kept.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Number of cached masks.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Maximum number of cached masks.
    pub fn capacity(&self) -> usize {
        self.cache.cap().get()
    }

    /// Lookups served from the cache.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that had to compute the mask.
    pub fn misses(&self) -> u64 {
        self.misses
    }
}

impl Default for MaskCache {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
