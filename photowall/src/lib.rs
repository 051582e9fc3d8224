//! A headless masonry layout and virtualization engine for large photo collections.
//!
//! For adapter-level utilities (scroll/resize signals, pagination, layout offload), see the
//! `photowall-adapter` crate.
//!
//! This crate focuses on the core algorithms needed to show an ever-growing photo wall at
//! interactive frame rates: greedy shortest-column masonry placement, a velocity-aware overscan
//! window with binary-search lookup, and cached free-text ranking.
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - container geometry (width/height)
//! - scroll offset and smoothed scroll velocity
//! - a monotonic `now_ms` clock for cache expiry
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod cache;
mod error;
mod layout;
mod options;
mod search;
mod state;
mod types;
mod visibility;

#[cfg(test)]
mod tests;

pub use cache::{BoundedCache, ExpiringCache};
pub use error::PhotoError;
pub use layout::{
    ColumnPolicy, LayoutCache, LayoutEngine, LayoutGeometry, LayoutKey, LayoutResult,
    calculate_layout, calculate_layout_with, column_span,
};
pub use options::{LayoutOptions, SearchOptions, VisibilityOptions};
pub use search::{
    Ranking, SearchCache, SearchOverlay, normalize_query, rank, score, searchable_text,
};
pub use state::{FrameState, ScrollState, ViewportState};
pub use types::{GridItem, Photo, PhotoSetId, PhotoSrc, Placement};
pub use visibility::{ScrollWindow, VisibilityIndex, visible_items};
