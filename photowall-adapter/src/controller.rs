use std::sync::Arc;

use photowall::{
    ColumnPolicy, FrameState, LayoutEngine, LayoutGeometry, LayoutKey, LayoutOptions, LayoutResult,
    Photo, PhotoSetId, Placement, VisibilityOptions,
};

use crate::{
    LayoutJob, LayoutOutput, SentinelPolicy, SignalOptions, ViewportSignals, ViewportUpdate,
};

/// Configuration for [`Controller`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ControllerOptions {
    pub layout: LayoutOptions,
    pub visibility: VisibilityOptions,
    pub signals: SignalOptions,
    pub columns: ColumnPolicy,
    /// Gap between columns and between stacked items, in pixels.
    pub gap: f64,
    /// When `false`, layouts are not computed on the calling thread; the host submits
    /// [`Controller::layout_job`] to a [`crate::LayoutWorker`] and hands the result back through
    /// [`Controller::install`].
    pub inline_layout: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            layout: LayoutOptions::default(),
            visibility: VisibilityOptions::default(),
            signals: SignalOptions::default(),
            columns: ColumnPolicy::default(),
            gap: 16.0,
            inline_layout: true,
        }
    }
}

impl ControllerOptions {
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_visibility(mut self, visibility: VisibilityOptions) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_signals(mut self, signals: SignalOptions) -> Self {
        self.signals = signals;
        self
    }

    pub fn with_columns(mut self, columns: ColumnPolicy) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_inline_layout(mut self, inline_layout: bool) -> Self {
        self.inline_layout = inline_layout;
        self
    }
}

/// Everything the presentation layer needs for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame<'a> {
    pub layout_version: u64,
    pub photos_version: u64,
    pub content_height: f64,
    pub placements: Vec<Placement<'a>>,
}

/// A committed layout together with the exact photo list it was computed from.
#[derive(Clone, Debug)]
struct Committed {
    photos: Arc<[Photo]>,
    photos_version: u64,
    layout: Arc<LayoutResult>,
    layout_version: u64,
}

/// A framework-neutral controller that wires viewport signals, layout and visibility together.
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `measure` once on mount, then `on_scroll` / `on_resize` when UI events occur
/// - `set_photos` whenever the photo list changes (e.g. a page or search result committed)
/// - `tick(now_ms)` each frame, then `frame()` to get the placements to render
///
/// Every layout is committed together with the photo list it was computed from, so a frame
/// never pairs a layout with a different list.
#[derive(Debug)]
pub struct Controller {
    options: ControllerOptions,
    engine: LayoutEngine,
    signals: ViewportSignals,
    photos: Arc<[Photo]>,
    photo_set: PhotoSetId,
    photos_version: u64,
    committed: Committed,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(ControllerOptions::default())
    }
}

impl Controller {
    pub fn new(options: ControllerOptions) -> Self {
        let mut engine = LayoutEngine::new(options.layout);
        let photos: Arc<[Photo]> = Arc::from(Vec::new());
        let layout = engine.layout(&photos, LayoutGeometry::new(0.0, 1, options.gap));
        Self {
            options,
            engine,
            signals: ViewportSignals::new(options.signals),
            photo_set: PhotoSetId::of(&photos),
            committed: Committed {
                photos: Arc::clone(&photos),
                photos_version: 0,
                layout,
                layout_version: 0,
            },
            photos,
            photos_version: 0,
        }
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    pub fn signals(&self) -> &ViewportSignals {
        &self.signals
    }

    pub fn signals_mut(&mut self) -> &mut ViewportSignals {
        &mut self.signals
    }

    pub fn frame_state(&self) -> FrameState {
        self.signals.frame()
    }

    /// The latest photo list (which may be newer than the committed layout).
    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn photos_version(&self) -> u64 {
        self.photos_version
    }

    pub fn layout(&self) -> &Arc<LayoutResult> {
        &self.committed.layout
    }

    pub fn layout_version(&self) -> u64 {
        self.committed.layout_version
    }

    /// The photo version the committed layout was computed from.
    pub fn layout_photos_version(&self) -> u64 {
        self.committed.photos_version
    }

    pub fn content_height(&self) -> f64 {
        self.committed.layout.content_height()
    }

    /// Layout geometry for the committed container width.
    pub fn geometry(&self) -> LayoutGeometry {
        let width = self.signals.frame().viewport.container_width;
        let columns = self.options.columns.columns_for_width(width, self.options.gap);
        LayoutGeometry::new(width, columns, self.options.gap)
    }

    /// Whether the committed layout matches the latest photos and container width.
    pub fn is_layout_current(&self) -> bool {
        self.committed.photos_version == self.photos_version
            && self.committed.layout.key() == LayoutKey::new(self.photo_set, self.geometry())
    }

    /// Replaces the photo list. `version` must increase with every new list.
    pub fn set_photos(&mut self, photos: impl Into<Arc<[Photo]>>, version: u64) {
        let photos = photos.into();
        if version < self.photos_version {
            awarn!(
                version,
                current = self.photos_version,
                "Controller::set_photos: older photo version ignored"
            );
            return;
        }
        self.photo_set = PhotoSetId::of(&photos);
        self.photos = photos;
        self.photos_version = version;
        self.relayout();
    }

    /// Sets the container size immediately (no debounce), e.g. on mount.
    pub fn measure(&mut self, container_width: f64, container_height: f64) {
        let prev_width = self.signals.frame().viewport.container_width;
        if self.signals.measure(container_width, container_height)
            && prev_width != container_width
        {
            self.relayout();
        }
    }

    pub fn on_scroll(&mut self, scroll_top: f64, now_ms: u64) {
        self.signals.on_scroll(scroll_top, now_ms);
    }

    pub fn on_resize(&mut self, container_width: f64, container_height: f64, now_ms: u64) {
        self.signals.on_resize(container_width, container_height, now_ms);
    }

    /// The frame callback: commits pending viewport signals and relayouts on width changes.
    pub fn tick(&mut self, now_ms: u64) -> Option<ViewportUpdate> {
        let prev_width = self.signals.frame().viewport.container_width;
        let update = self.signals.tick(now_ms)?;
        if update.resize && update.frame.viewport.container_width != prev_width {
            self.relayout();
        }
        Some(update)
    }

    fn relayout(&mut self) {
        if !self.options.inline_layout {
            return;
        }
        let geometry = self.geometry();
        let layout = self
            .engine
            .layout_keyed(&self.photos, self.photo_set, geometry);
        self.commit(Arc::clone(&self.photos), self.photos_version, layout);
    }

    fn commit(&mut self, photos: Arc<[Photo]>, photos_version: u64, layout: Arc<LayoutResult>) {
        let same = layout.key() == self.committed.layout.key()
            && photos_version == self.committed.photos_version;
        if same {
            return;
        }
        self.committed = Committed {
            photos,
            photos_version,
            layout,
            layout_version: self.committed.layout_version + 1,
        };
        adebug!(
            layout_version = self.committed.layout_version,
            photos_version,
            items = self.committed.layout.len(),
            "Controller: layout committed"
        );
    }

    /// The job to hand to a [`crate::LayoutWorker`] when layout is not computed inline.
    ///
    /// Returns `None` when the committed layout is already current.
    pub fn layout_job(&self) -> Option<LayoutJob> {
        if self.is_layout_current() {
            return None;
        }
        Some(LayoutJob {
            photos: Arc::clone(&self.photos),
            photos_version: self.photos_version,
            geometry: self.geometry(),
        })
    }

    /// Installs a worker-computed layout. Rejected unless it was computed from the latest photos
    /// and the current geometry.
    pub fn install(&mut self, output: LayoutOutput) -> bool {
        if output.photos_version != self.photos_version || output.geometry != self.geometry() {
            atrace!(
                seq = output.seq,
                photos_version = output.photos_version,
                "Controller::install: outdated layout rejected"
            );
            return false;
        }
        self.commit(output.photos, output.photos_version, output.result);
        true
    }

    /// Placements for the committed layout and the committed viewport.
    pub fn frame(&self) -> Frame<'_> {
        let window = self.signals.frame().window(&self.options.visibility);
        let c = &self.committed;
        Frame {
            layout_version: c.layout_version,
            photos_version: c.photos_version,
            content_height: c.layout.content_height(),
            placements: c.layout.visible_placements(&c.photos, &window),
        }
    }

    /// Like [`Self::frame`], but only if the committed layout was computed from `photos_version`.
    pub fn frame_for(&self, photos_version: u64) -> Option<Frame<'_>> {
        if self.committed.photos_version != photos_version {
            atrace!(
                requested = photos_version,
                committed = self.committed.photos_version,
                "Controller::frame_for: version mismatch"
            );
            return None;
        }
        Some(self.frame())
    }

    pub fn is_sentinel_visible(&self, policy: &SentinelPolicy) -> bool {
        policy.is_visible(&self.signals.frame(), self.content_height())
    }

    /// Resolves a selection event from the presentation layer.
    pub fn photo_by_id(&self, id: u64) -> Option<&Photo> {
        self.committed.photos.iter().find(|p| p.id == id)
    }

    /// Cancels all viewport timers. Safe to call more than once.
    pub fn teardown(&mut self) {
        self.signals.teardown();
    }
}
