use std::sync::Arc;

use crate::cache::BoundedCache;
use crate::{
    GridItem, LayoutOptions, Photo, PhotoSetId, Placement, ScrollWindow, VisibilityIndex,
};

/// Container geometry for one layout pass.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutGeometry {
    pub container_width: f64,
    pub column_count: usize,
    pub gap: f64,
}

impl LayoutGeometry {
    pub fn new(container_width: f64, column_count: usize, gap: f64) -> Self {
        Self {
            container_width,
            column_count,
            gap,
        }
    }

    /// Width of a single column, or `None` when the geometry cannot hold any item.
    pub fn column_width(&self) -> Option<f64> {
        if !self.container_width.is_finite()
            || self.container_width <= 0.0
            || self.column_count == 0
            || !self.gap.is_finite()
            || self.gap < 0.0
        {
            return None;
        }
        let gaps = self.gap * (self.column_count - 1) as f64;
        let w = (self.container_width - gaps) / self.column_count as f64;
        (w > 0.0).then_some(w)
    }

    pub fn is_valid(&self) -> bool {
        self.column_width().is_some()
    }
}

/// How many columns to use for a given container width.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColumnPolicy {
    Fixed(usize),
    /// As many columns of at least `min_column_width` as fit, up to `max_columns`.
    Responsive {
        min_column_width: f64,
        max_columns: usize,
    },
}

impl Default for ColumnPolicy {
    fn default() -> Self {
        Self::Responsive {
            min_column_width: 240.0,
            max_columns: 6,
        }
    }
}

impl ColumnPolicy {
    pub fn columns_for_width(&self, container_width: f64, gap: f64) -> usize {
        match *self {
            Self::Fixed(n) => n.max(1),
            Self::Responsive {
                min_column_width,
                max_columns,
            } => {
                let max_columns = max_columns.max(1);
                if !(container_width > 0.0) || !(min_column_width > 0.0) {
                    return 1;
                }
                let gap = gap.max(0.0);
                let n = ((container_width + gap) / (min_column_width + gap)).floor();
                (n as usize).clamp(1, max_columns)
            }
        }
    }
}

/// Number of adjacent columns a photo with `aspect_ratio` occupies.
///
/// Portrait and square photos take one column; wide photos grow with `aspect / wide_threshold`;
/// panoramas (above `panorama_threshold`) take the maximum. The result is always within
/// `1..=min(max_span, column_count)`.
pub fn column_span(aspect_ratio: f64, column_count: usize, options: &LayoutOptions) -> usize {
    let cap = options.max_span.max(1).min(column_count.max(1));
    if !(aspect_ratio > options.wide_threshold) {
        return 1;
    }
    if aspect_ratio > options.panorama_threshold {
        return cap;
    }
    let unit = if options.wide_threshold > 0.0 {
        options.wide_threshold
    } else {
        1.0
    };
    ((aspect_ratio / unit).ceil() as usize).clamp(1, cap)
}

/// Lays out `photos` with the default [`LayoutOptions`].
///
/// Returns an empty list for an empty input or invalid geometry (`container_width <= 0`,
/// `column_count == 0`, negative gap). Items are emitted in input order.
pub fn calculate_layout(
    photos: &[Photo],
    container_width: f64,
    column_count: usize,
    gap: f64,
) -> Vec<GridItem> {
    calculate_layout_with(
        photos,
        LayoutGeometry::new(container_width, column_count, gap),
        &LayoutOptions::default(),
    )
}

pub fn calculate_layout_with(
    photos: &[Photo],
    geometry: LayoutGeometry,
    options: &LayoutOptions,
) -> Vec<GridItem> {
    place(photos, geometry, options).items
}

struct Placed {
    items: Vec<GridItem>,
    content_height: f64,
    column_width: f64,
}

impl Placed {
    fn empty() -> Self {
        Self {
            items: Vec::new(),
            content_height: 0.0,
            column_width: 0.0,
        }
    }
}

fn place(photos: &[Photo], geometry: LayoutGeometry, options: &LayoutOptions) -> Placed {
    let Some(column_width) = geometry.column_width() else {
        return Placed::empty();
    };
    if photos.is_empty() {
        return Placed::empty();
    }

    let columns = geometry.column_count;
    let gap = geometry.gap;
    let batch = options.batch_size.max(1);

    let mut heights = vec![0.0f64; columns];
    let mut slots: Vec<Option<GridItem>> = vec![None; photos.len()];
    let mut order: Vec<(usize, f64)> = Vec::with_capacity(batch.min(photos.len()));

    for (b, chunk) in photos.chunks(batch).enumerate() {
        let base = b * batch;
        order.clear();
        for (i, photo) in chunk.iter().enumerate() {
            if photo.width == 0 || photo.height == 0 {
                pwarn!(
                    id = photo.id,
                    width = photo.width,
                    height = photo.height,
                    "layout: skipping photo with invalid dimensions"
                );
                continue;
            }
            order.push((base + i, photo.aspect_ratio()));
        }
        // Stable: equal aspect ratios keep input order.
        order.sort_by(|a, b| b.1.total_cmp(&a.1));

        for &(index, aspect) in &order {
            let span = column_span(aspect, columns, options);
            let (column, top) = shortest_run(&heights, span);
            let width = column_width * span as f64 + gap * (span - 1) as f64;
            let height = width / aspect;
            let next = top + height + gap;
            for h in &mut heights[column..column + span] {
                *h = next;
            }
            slots[index] = Some(GridItem {
                index,
                photo_id: photos[index].id,
                column,
                column_span: span,
                top,
                left: column as f64 * (column_width + gap),
                width,
                height,
            });
        }
    }

    let items: Vec<GridItem> = slots.into_iter().flatten().collect();
    let content_height = if items.is_empty() {
        0.0
    } else {
        let tallest = heights.iter().copied().fold(0.0, f64::max);
        (tallest - gap).max(0.0)
    };

    Placed {
        items,
        content_height,
        column_width,
    }
}

/// Finds the start column whose `span`-wide run has the lowest top edge (smallest start wins
/// ties). Returns `(column, top)`.
fn shortest_run(heights: &[f64], span: usize) -> (usize, f64) {
    let mut best = (0usize, f64::INFINITY);
    for j in 0..=heights.len() - span {
        let top = heights[j..j + span].iter().copied().fold(0.0, f64::max);
        if top < best.1 {
            best = (j, top);
        }
    }
    best
}

/// Cache key for a layout pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayoutKey {
    pub photos: PhotoSetId,
    pub column_count: usize,
    width_bits: u64,
    gap_bits: u64,
}

impl LayoutKey {
    pub fn new(photos: PhotoSetId, geometry: LayoutGeometry) -> Self {
        Self {
            photos,
            column_count: geometry.column_count,
            width_bits: geometry.container_width.to_bits(),
            gap_bits: geometry.gap.to_bits(),
        }
    }

    pub fn container_width(&self) -> f64 {
        f64::from_bits(self.width_bits)
    }

    pub fn gap(&self) -> f64 {
        f64::from_bits(self.gap_bits)
    }
}

/// The output of one layout pass, with a prebuilt visibility index.
#[derive(Clone, Debug)]
pub struct LayoutResult {
    key: LayoutKey,
    items: Vec<GridItem>,
    index: VisibilityIndex,
    content_height: f64,
    column_width: f64,
}

impl LayoutResult {
    fn from_placed(key: LayoutKey, placed: Placed) -> Self {
        let index = VisibilityIndex::new(&placed.items);
        Self {
            key,
            items: placed.items,
            index,
            content_height: placed.content_height,
            column_width: placed.column_width,
        }
    }

    pub fn key(&self) -> LayoutKey {
        self.key
    }

    pub fn photos(&self) -> PhotoSetId {
        self.key.photos
    }

    /// Items in input order.
    pub fn items(&self) -> &[GridItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn content_height(&self) -> f64 {
        self.content_height
    }

    pub fn column_width(&self) -> f64 {
        self.column_width
    }

    pub fn column_count(&self) -> usize {
        self.key.column_count
    }

    pub fn index(&self) -> &VisibilityIndex {
        &self.index
    }

    /// Items overlapping `window`, ordered by `top`.
    pub fn visible(&self, window: &ScrollWindow) -> Vec<GridItem> {
        let mut out = Vec::new();
        self.index
            .for_each_visible(&self.items, window, |it| out.push(*it));
        out
    }

    /// Render records for the items overlapping `window`.
    ///
    /// `photos` must be the list this layout was computed from. Items whose index or id no
    /// longer match are skipped rather than indexed out of range.
    pub fn visible_placements<'a>(
        &self,
        photos: &'a [Photo],
        window: &ScrollWindow,
    ) -> Vec<Placement<'a>> {
        let mut out = Vec::new();
        self.index.for_each_visible(&self.items, window, |it| {
            match photos.get(it.index) {
                Some(photo) if photo.id == it.photo_id => out.push(Placement::new(photo, it)),
                _ => {
                    pwarn!(
                        index = it.index,
                        photo_id = it.photo_id,
                        "visible_placements: item does not match photo list"
                    );
                }
            }
        });
        out
    }
}

/// An explicitly owned, bounded cache of layout results.
#[derive(Debug)]
pub struct LayoutCache {
    inner: BoundedCache<LayoutKey, Arc<LayoutResult>>,
}

impl LayoutCache {
    pub fn new(capacity: usize, evict_batch: usize) -> Self {
        Self {
            inner: BoundedCache::new(capacity, evict_batch),
        }
    }

    pub fn get(&self, key: &LayoutKey) -> Option<Arc<LayoutResult>> {
        self.inner.get(key).cloned()
    }

    pub fn insert(&mut self, result: Arc<LayoutResult>) -> usize {
        self.inner.insert(result.key(), result)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    pub fn evicted(&self) -> u64 {
        self.inner.evicted()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

/// A layout calculator that owns its result cache.
///
/// Identical inputs (same photo set, width, column count and gap) are served from the cache;
/// [`Self::placement_runs`] counts how many times the placement routine actually ran.
#[derive(Debug)]
pub struct LayoutEngine {
    options: LayoutOptions,
    cache: LayoutCache,
    placement_runs: u64,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(LayoutOptions::default())
    }
}

impl LayoutEngine {
    pub fn new(options: LayoutOptions) -> Self {
        Self {
            cache: LayoutCache::new(options.cache_capacity, options.cache_evict_batch),
            options,
            placement_runs: 0,
        }
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    pub fn cache(&self) -> &LayoutCache {
        &self.cache
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn placement_runs(&self) -> u64 {
        self.placement_runs
    }

    pub fn layout(&mut self, photos: &[Photo], geometry: LayoutGeometry) -> Arc<LayoutResult> {
        self.layout_keyed(photos, PhotoSetId::of(photos), geometry)
    }

    /// Same as [`Self::layout`], for callers that already know the photo set identity.
    pub fn layout_keyed(
        &mut self,
        photos: &[Photo],
        id: PhotoSetId,
        geometry: LayoutGeometry,
    ) -> Arc<LayoutResult> {
        let key = LayoutKey::new(id, geometry);
        if photos.is_empty() || !geometry.is_valid() {
            return Arc::new(LayoutResult::from_placed(key, Placed::empty()));
        }
        if let Some(hit) = self.cache.get(&key) {
            ptrace!(len = id.len, columns = geometry.column_count, "layout cache hit");
            return hit;
        }

        let placed = place(photos, geometry, &self.options);
        self.placement_runs = self.placement_runs.saturating_add(1);
        pdebug!(
            photos = photos.len(),
            items = placed.items.len(),
            width = geometry.container_width,
            columns = geometry.column_count,
            "layout pass"
        );
        let result = Arc::new(LayoutResult::from_placed(key, placed));
        self.cache.insert(Arc::clone(&result));
        result
    }
}
