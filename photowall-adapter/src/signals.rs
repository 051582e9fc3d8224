use core::ops::{Deref, DerefMut};

use photowall::{FrameState, ViewportState};

use crate::{Deadline, Debounce, Throttle};

/// Timing policy for [`ViewportSignals`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SignalOptions {
    /// At most one scroll sample is processed per interval (one display frame by default).
    pub scroll_throttle_ms: u64,
    pub resize_debounce_ms: u64,
    /// Velocity snaps to zero after this long without a raw scroll event.
    pub velocity_reset_ms: u64,
    /// Weight of the previous velocity in the exponential smoothing, in `[0, 1]`.
    pub velocity_smoothing: f64,
}

impl Default for SignalOptions {
    fn default() -> Self {
        Self {
            scroll_throttle_ms: 16,
            resize_debounce_ms: 100,
            velocity_reset_ms: 150,
            velocity_smoothing: 0.8,
        }
    }
}

impl SignalOptions {
    pub fn with_scroll_throttle_ms(mut self, scroll_throttle_ms: u64) -> Self {
        self.scroll_throttle_ms = scroll_throttle_ms;
        self
    }

    pub fn with_resize_debounce_ms(mut self, resize_debounce_ms: u64) -> Self {
        self.resize_debounce_ms = resize_debounce_ms;
        self
    }

    pub fn with_velocity_reset_ms(mut self, velocity_reset_ms: u64) -> Self {
        self.velocity_reset_ms = velocity_reset_ms;
        self
    }

    pub fn with_velocity_smoothing(mut self, velocity_smoothing: f64) -> Self {
        self.velocity_smoothing = velocity_smoothing.clamp(0.0, 1.0);
        self
    }
}

/// What a frame tick committed.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportUpdate {
    pub scroll: bool,
    pub resize: bool,
    pub velocity_reset: bool,
    /// The committed state after this tick.
    pub frame: FrameState,
}

impl ViewportUpdate {
    fn is_empty(&self) -> bool {
        !(self.scroll || self.resize || self.velocity_reset)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ScrollSample {
    top: f64,
    at_ms: u64,
}

/// Turns raw scroll/resize events into throttled, debounced viewport commits.
///
/// Events only stage work; [`Self::tick`] is the frame callback that commits it. Scroll
/// samples go through a [`Throttle`] and feed an exponentially smoothed velocity (px/ms). Every
/// raw scroll event re-arms a quiet [`Deadline`]; when it fires the velocity is reset to exactly
/// zero. Resizes go through a [`Debounce`] and are committed only if the size actually changed.
#[derive(Clone, Debug)]
pub struct ViewportSignals {
    options: SignalOptions,
    committed: FrameState,
    scroll: Throttle<ScrollSample>,
    last_sample: Option<ScrollSample>,
    velocity: f64,
    staged_scroll: Option<f64>,
    quiet: Deadline,
    resize: Debounce<ViewportState>,
    torn_down: bool,
}

impl Default for ViewportSignals {
    fn default() -> Self {
        Self::new(SignalOptions::default())
    }
}

impl ViewportSignals {
    pub fn new(options: SignalOptions) -> Self {
        Self {
            options,
            committed: FrameState::default(),
            scroll: Throttle::new(options.scroll_throttle_ms),
            last_sample: None,
            velocity: 0.0,
            staged_scroll: None,
            quiet: Deadline::new(options.velocity_reset_ms),
            resize: Debounce::new(options.resize_debounce_ms),
            torn_down: false,
        }
    }

    pub fn options(&self) -> &SignalOptions {
        &self.options
    }

    /// The last committed state.
    pub fn frame(&self) -> FrameState {
        self.committed
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Sets the initial container size without debouncing (e.g. on mount).
    ///
    /// Returns whether the committed size changed.
    pub fn measure(&mut self, container_width: f64, container_height: f64) -> bool {
        if self.torn_down {
            return false;
        }
        let next = ViewportState {
            container_width,
            container_height,
        };
        if next == self.committed.viewport {
            return false;
        }
        self.committed.viewport = next;
        true
    }

    pub fn on_scroll(&mut self, scroll_top: f64, now_ms: u64) {
        if self.torn_down || !scroll_top.is_finite() {
            return;
        }
        self.quiet.arm(now_ms);
        let sample = ScrollSample {
            top: scroll_top,
            at_ms: now_ms,
        };
        if let Some(sample) = self.scroll.push(sample, now_ms) {
            self.process(sample);
        }
    }

    pub fn on_resize(&mut self, container_width: f64, container_height: f64, now_ms: u64) {
        if self.torn_down {
            return;
        }
        self.resize.push(
            ViewportState {
                container_width,
                container_height,
            },
            now_ms,
        );
    }

    fn process(&mut self, sample: ScrollSample) {
        if let Some(prev) = self.last_sample {
            let dt = sample.at_ms.saturating_sub(prev.at_ms);
            if dt > 0 {
                let raw = (sample.top - prev.top) / dt as f64;
                let s = self.options.velocity_smoothing;
                self.velocity = s * self.velocity + (1.0 - s) * raw;
            }
        }
        self.last_sample = Some(sample);
        self.staged_scroll = Some(sample.top);
    }

    /// The frame callback. Returns what changed, or `None` when nothing was committed.
    pub fn tick(&mut self, now_ms: u64) -> Option<ViewportUpdate> {
        if self.torn_down {
            return None;
        }
        let mut update = ViewportUpdate::default();

        if let Some(sample) = self.scroll.poll(now_ms) {
            self.process(sample);
        }
        if let Some(top) = self.staged_scroll.take() {
            self.committed.scroll.scroll_top = top;
            self.committed.scroll.velocity = self.velocity;
            update.scroll = true;
        }

        if self.quiet.fired(now_ms) {
            self.velocity = 0.0;
            self.last_sample = None;
            if self.committed.scroll.velocity != 0.0 {
                self.committed.scroll.velocity = 0.0;
                update.velocity_reset = true;
            }
        }

        if let Some(next) = self.resize.poll(now_ms) {
            if next != self.committed.viewport {
                adebug!(
                    width = next.container_width,
                    height = next.container_height,
                    "ViewportSignals: resize committed"
                );
                self.committed.viewport = next;
                update.resize = true;
            }
        }

        if update.is_empty() {
            return None;
        }
        update.frame = self.committed;
        atrace!(
            scroll = update.scroll,
            resize = update.resize,
            velocity_reset = update.velocity_reset,
            "ViewportSignals::tick"
        );
        Some(update)
    }

    /// Earliest time a pending timer wants a tick, for hosts that schedule wakeups.
    pub fn next_deadline(&self) -> Option<u64> {
        [
            self.scroll.due_at(),
            self.quiet.due_at(),
            self.resize.due_at(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    pub fn pending_timers(&self) -> usize {
        [
            self.scroll.pending(),
            self.quiet.pending(),
            self.resize.pending(),
        ]
        .into_iter()
        .filter(|p| *p)
        .count()
    }

    /// Cancels every timer and stops accepting events. Safe to call more than once.
    pub fn teardown(&mut self) {
        if !self.torn_down {
            adebug!(pending = self.pending_timers(), "ViewportSignals::teardown");
        }
        self.scroll.cancel();
        self.quiet.cancel();
        self.resize.cancel();
        self.staged_scroll = None;
        self.last_sample = None;
        self.torn_down = true;
    }

    /// Re-attaches the processor and returns a guard that tears it down when dropped.
    pub fn subscribe(&mut self) -> ViewportSubscription<'_> {
        self.torn_down = false;
        ViewportSubscription { signals: self }
    }
}

/// A scoped subscription to viewport events. Dropping it tears the processor down.
#[derive(Debug)]
pub struct ViewportSubscription<'a> {
    signals: &'a mut ViewportSignals,
}

impl Deref for ViewportSubscription<'_> {
    type Target = ViewportSignals;

    fn deref(&self) -> &ViewportSignals {
        self.signals
    }
}

impl DerefMut for ViewportSubscription<'_> {
    fn deref_mut(&mut self) -> &mut ViewportSignals {
        self.signals
    }
}

impl Drop for ViewportSubscription<'_> {
    fn drop(&mut self) {
        self.signals.teardown();
    }
}
