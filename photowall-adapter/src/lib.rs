//! Adapter utilities for the `photowall` crate.
//!
//! The `photowall` crate is UI-agnostic and focuses on layout and visibility math. This crate
//! provides the framework-neutral workflows an adapter needs around it:
//!
//! - Scroll/resize signal processing (throttle, debounce, velocity smoothing)
//! - Pagination with a single in-flight fetch per query and stale-response discard
//! - A version-stamped controller that pairs each layout with the photo list it was computed from
//! - Optional layout offload to a worker thread
//!
//! Time is always supplied by the caller as `now_ms`; only the fetch and worker edges are async.
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod controller;
mod feed;
mod pagination;
mod signals;
mod source;
mod timers;
mod worker;


pub use controller::{Controller, ControllerOptions, Frame};
pub use feed::Feed;
pub use pagination::{
    Completion, PageRequest, PaginationCoordinator, PaginationOptions, Query, SentinelPolicy,
    Ticket,
};
pub use signals::{SignalOptions, ViewportSignals, ViewportSubscription, ViewportUpdate};
pub use source::{FetchError, PhotoPage, PhotoSource};
pub use timers::{Deadline, Debounce, Throttle};
pub use worker::{LayoutJob, LayoutOutput, LayoutWorker};
