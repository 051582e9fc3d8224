use crate::{GridItem, VisibilityOptions};

/// The scroll position a visibility query is made for, plus its overscan policy.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollWindow {
    pub scroll_top: f64,
    pub container_height: f64,
    /// Smoothed scroll velocity in px/ms. Only its magnitude matters.
    pub velocity: f64,
    pub base_buffer: f64,
    pub velocity_factor: f64,
    pub max_buffer: f64,
}

impl ScrollWindow {
    pub fn new(scroll_top: f64, container_height: f64, velocity: f64) -> Self {
        let defaults = VisibilityOptions::default();
        Self {
            scroll_top,
            container_height,
            velocity,
            base_buffer: defaults.base_buffer,
            velocity_factor: defaults.velocity_factor,
            max_buffer: defaults.max_buffer,
        }
    }

    pub fn with_options(mut self, options: &VisibilityOptions) -> Self {
        self.base_buffer = options.base_buffer;
        self.velocity_factor = options.velocity_factor;
        self.max_buffer = options.max_buffer;
        self
    }

    pub fn with_base_buffer(mut self, base_buffer: f64) -> Self {
        self.base_buffer = base_buffer;
        self
    }

    /// `min(base_buffer + |velocity| * velocity_factor, max_buffer)`.
    pub fn buffer(&self) -> f64 {
        VisibilityOptions {
            base_buffer: self.base_buffer,
            velocity_factor: self.velocity_factor,
            max_buffer: self.max_buffer,
        }
        .buffer_for(self.velocity)
    }

    /// `(viewport_top, viewport_bottom)` after overscan, or `None` for a non-finite window.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        let buffer = self.buffer();
        if !self.scroll_top.is_finite() || !self.container_height.is_finite() || !buffer.is_finite()
        {
            return None;
        }
        let height = self.container_height.max(0.0);
        Some((
            self.scroll_top - buffer,
            self.scroll_top + height + buffer,
        ))
    }
}

/// Returns the items overlapping the overscanned window.
///
/// `items` must be non-decreasing in `top`. The start is found with a lower-bound binary search
/// for the first item whose bottom reaches the window top; the scan then stops at the first item
/// starting below the window bottom.
///
/// Masonry output is not sorted by `top` in general (see [`VisibilityIndex`]); use
/// [`crate::LayoutResult::visible`] for layout results.
pub fn visible_items(items: &[GridItem], window: &ScrollWindow) -> Vec<GridItem> {
    let Some((viewport_top, viewport_bottom)) = window.bounds() else {
        return Vec::new();
    };
    let start = first_reaching(items, viewport_top);
    items[start..]
        .iter()
        .take_while(|it| it.top <= viewport_bottom)
        .copied()
        .collect()
}

fn first_reaching(items: &[GridItem], viewport_top: f64) -> usize {
    let n = items.len();
    if n == 0 {
        return 0;
    }
    if items[0].bottom() >= viewport_top {
        return 0;
    }
    if items[n - 1].bottom() < viewport_top {
        return n;
    }
    items.partition_point(|it| it.bottom() < viewport_top)
}

/// A top-sorted view over a layout's items, used for O(log n) visibility lookups.
///
/// The layout calculator emits items in input order but places them widest-first within each
/// batch, so emission order is not guaranteed to be sorted by `top`. The index keeps a stable
/// permutation sorted by `top` plus the running maximum of `bottom` along it; the running
/// maximum is monotonic, so the lower-bound search stays exact even for tall items that start
/// early and end late.
#[derive(Clone, Debug, Default)]
pub struct VisibilityIndex {
    order: Vec<usize>,
    max_bottom: Vec<f64>,
    monotonic: bool,
}

impl VisibilityIndex {
    pub fn new(items: &[GridItem]) -> Self {
        let monotonic = items.windows(2).all(|w| w[0].top <= w[1].top);
        let mut order: Vec<usize> = (0..items.len()).collect();
        if !monotonic {
            ptrace!(items = items.len(), "VisibilityIndex: emission order not sorted by top");
            order.sort_by(|&a, &b| items[a].top.total_cmp(&items[b].top));
        }

        let mut max_bottom = Vec::with_capacity(order.len());
        let mut running = f64::NEG_INFINITY;
        for &i in &order {
            running = running.max(items[i].bottom());
            max_bottom.push(running);
        }

        Self {
            order,
            max_bottom,
            monotonic,
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether the items were already sorted by `top` in emission order.
    pub fn is_monotonic(&self) -> bool {
        self.monotonic
    }

    /// Positions into the indexed item slice, sorted by `top`.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Calls `f` for every item overlapping `window`, in `top` order.
    ///
    /// `items` must be the slice this index was built from.
    pub fn for_each_visible(
        &self,
        items: &[GridItem],
        window: &ScrollWindow,
        mut f: impl FnMut(&GridItem),
    ) {
        if items.len() != self.order.len() {
            pwarn!(
                items = items.len(),
                indexed = self.order.len(),
                "VisibilityIndex: item slice does not match index"
            );
            debug_assert_eq!(items.len(), self.order.len(), "stale VisibilityIndex");
            return;
        }
        let Some((viewport_top, viewport_bottom)) = window.bounds() else {
            return;
        };

        let start = self.max_bottom.partition_point(|&b| b < viewport_top);
        for &i in &self.order[start..] {
            let it = &items[i];
            if it.top > viewport_bottom {
                break;
            }
            if it.bottom() >= viewport_top {
                f(it);
            }
        }
    }

    pub fn visible(&self, items: &[GridItem], window: &ScrollWindow) -> Vec<GridItem> {
        let mut out = Vec::new();
        self.for_each_visible(items, window, |it| out.push(*it));
        out
    }
}
