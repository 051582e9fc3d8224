use crate::{ScrollWindow, VisibilityOptions};

/// A lightweight, serializable snapshot of the container geometry.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportState {
    pub container_width: f64,
    pub container_height: f64,
}

/// A lightweight, serializable snapshot of the current scroll state.
///
/// `velocity` is the smoothed scroll speed in px/ms; it is exactly `0.0` once scrolling has
/// settled.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollState {
    pub scroll_top: f64,
    pub velocity: f64,
}

impl ScrollState {
    pub fn is_scrolling(&self) -> bool {
        self.velocity != 0.0
    }
}

/// A combined snapshot of viewport + scroll state.
///
/// This is everything a visibility query needs, and is useful for restoring UI state across
/// frames or sessions without coupling the engine to any specific UI framework.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameState {
    pub viewport: ViewportState,
    pub scroll: ScrollState,
}

impl FrameState {
    /// The overscanned window this frame should render.
    pub fn window(&self, options: &VisibilityOptions) -> ScrollWindow {
        ScrollWindow::new(
            self.scroll.scroll_top,
            self.viewport.container_height,
            self.scroll.velocity,
        )
        .with_options(options)
    }
}
