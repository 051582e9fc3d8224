/// Configuration for the masonry layout pass.
///
/// Geometry (container width, column count, gap) is passed per call via
/// [`crate::LayoutGeometry`]; these options describe the placement policy and are expected to
/// stay fixed for the lifetime of a [`crate::LayoutEngine`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutOptions {
    /// Aspect ratio at or below which a photo occupies a single column.
    pub wide_threshold: f64,
    /// Aspect ratio above which a photo is forced to `max_span`.
    pub panorama_threshold: f64,
    /// Upper bound on column span (further capped by the column count).
    pub max_span: usize,
    /// Photos are placed widest-first within batches of this size, in input order across
    /// batches.
    pub batch_size: usize,
    /// Maximum number of cached layout results.
    pub cache_capacity: usize,
    /// How many of the oldest entries to drop once the cache overflows.
    pub cache_evict_batch: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            wide_threshold: 1.0,
            panorama_threshold: 1.5,
            max_span: 3,
            batch_size: 50,
            cache_capacity: 100,
            cache_evict_batch: 10,
        }
    }
}

impl LayoutOptions {
    pub fn with_wide_threshold(mut self, wide_threshold: f64) -> Self {
        self.wide_threshold = wide_threshold;
        self
    }

    pub fn with_panorama_threshold(mut self, panorama_threshold: f64) -> Self {
        self.panorama_threshold = panorama_threshold;
        self
    }

    pub fn with_max_span(mut self, max_span: usize) -> Self {
        self.max_span = max_span;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize, evict_batch: usize) -> Self {
        self.cache_capacity = capacity;
        self.cache_evict_batch = evict_batch;
        self
    }
}

/// Overscan configuration for visibility queries.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VisibilityOptions {
    /// Overscan applied above and below the viewport when not scrolling.
    pub base_buffer: f64,
    /// Extra overscan per unit of `|velocity|` (px per px/ms).
    pub velocity_factor: f64,
    /// Hard cap on the overscan, whatever the velocity.
    pub max_buffer: f64,
}

impl Default for VisibilityOptions {
    fn default() -> Self {
        Self {
            base_buffer: 200.0,
            velocity_factor: 10.0,
            max_buffer: 1000.0,
        }
    }
}

impl VisibilityOptions {
    pub fn with_base_buffer(mut self, base_buffer: f64) -> Self {
        self.base_buffer = base_buffer;
        self
    }

    pub fn with_max_buffer(mut self, max_buffer: f64) -> Self {
        self.max_buffer = max_buffer;
        self
    }

    /// Overscan for a given scroll velocity.
    pub fn buffer_for(&self, velocity: f64) -> f64 {
        (self.base_buffer + velocity.abs() * self.velocity_factor).min(self.max_buffer)
    }
}

/// Configuration for [`crate::SearchOverlay`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchOptions {
    /// How long a cached ranking stays valid.
    pub ttl_ms: u64,
    /// Maximum number of cached rankings.
    pub cache_capacity: usize,
    /// Query tokens shorter than this (in chars) are ignored.
    pub min_token_len: usize,
    pub phrase_score: u32,
    pub token_score: u32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            ttl_ms: 5 * 60 * 1000,
            cache_capacity: 64,
            min_token_len: 2,
            phrase_score: 100,
            token_score: 50,
        }
    }
}

impl SearchOptions {
    pub fn with_ttl_ms(mut self, ttl_ms: u64) -> Self {
        self.ttl_ms = ttl_ms;
        self
    }

    pub fn with_cache_capacity(mut self, cache_capacity: usize) -> Self {
        self.cache_capacity = cache_capacity;
        self
    }
}
