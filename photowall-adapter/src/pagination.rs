use std::collections::HashSet;

use photowall::{FrameState, Photo, normalize_query};
use tokio_util::sync::CancellationToken;

use crate::{FetchError, PhotoPage};

/// What the feed is paging through.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Query {
    #[default]
    Listing,
    /// A normalized (trimmed, lowercased) search string.
    Search(String),
}

impl Query {
    /// A search query; blank input falls back to the listing.
    pub fn search(text: &str) -> Self {
        let normalized = normalize_query(text);
        if normalized.is_empty() {
            Self::Listing
        } else {
            Self::Search(normalized)
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Listing => None,
            Self::Search(q) => Some(q.as_str()),
        }
    }
}

/// Identifies one issued fetch. A completion is applied only if its ticket is the in-flight one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ticket {
    /// Bumped on every query change.
    pub generation: u64,
    pub page: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageRequest {
    pub ticket: Ticket,
    pub query: Query,
    /// 1-based.
    pub page: u32,
    pub per_page: u32,
}

/// Where the "load more" sentinel sits relative to the end of the content.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SentinelPolicy {
    /// Fixed margin in pixels.
    Pixels(f64),
    /// Margin as a fraction of the container height.
    ViewportFraction(f64),
}

impl Default for SentinelPolicy {
    fn default() -> Self {
        Self::ViewportFraction(1.0)
    }
}

impl SentinelPolicy {
    pub fn margin(&self, container_height: f64) -> f64 {
        let m = match *self {
            Self::Pixels(px) => px,
            Self::ViewportFraction(f) => f * container_height.max(0.0),
        };
        if m.is_finite() { m.max(0.0) } else { 0.0 }
    }

    /// Whether the window bottom plus the margin reaches the end of the content.
    ///
    /// Always `true` for empty content, so the first page is requested on mount.
    pub fn is_visible(&self, frame: &FrameState, content_height: f64) -> bool {
        if content_height <= 0.0 {
            return true;
        }
        let height = frame.viewport.container_height;
        frame.scroll.scroll_top + height + self.margin(height) >= content_height
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PaginationOptions {
    pub per_page: u32,
    pub sentinel: SentinelPolicy,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            per_page: 30,
            sentinel: SentinelPolicy::default(),
        }
    }
}

impl PaginationOptions {
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    pub fn with_sentinel(mut self, sentinel: SentinelPolicy) -> Self {
        self.sentinel = sentinel;
        self
    }
}

/// How [`PaginationCoordinator::complete`] handled a fetch result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Completion {
    /// The page was committed.
    Applied {
        ticket: Ticket,
        /// Photos appended after validation and de-duplication.
        added: usize,
        has_more: bool,
    },
    /// The ticket was not the in-flight request; nothing changed.
    Stale,
    /// The fetch reported its own abort; nothing changed and no error was recorded.
    Aborted,
    /// The fetch failed; loaded photos are untouched and the error is latched.
    Failed(FetchError),
}

#[derive(Debug)]
struct InFlight {
    request: PageRequest,
    cancel: CancellationToken,
}

/// Infinite-scroll paging state for one feed.
///
/// At most one request is in flight. Changing the query aborts it and bumps the generation, so
/// late responses for the old query come back as [`Completion::Stale`]. Photos of the previous
/// query stay loaded until the first page of the new one commits.
#[derive(Debug)]
pub struct PaginationCoordinator {
    options: PaginationOptions,
    query: Query,
    generation: u64,
    next_page: u32,
    has_more: bool,
    photos: Vec<Photo>,
    seen: HashSet<u64>,
    replace_on_commit: bool,
    version: u64,
    in_flight: Option<InFlight>,
    error: Option<FetchError>,
}

impl Default for PaginationCoordinator {
    fn default() -> Self {
        Self::new(PaginationOptions::default())
    }
}

impl PaginationCoordinator {
    pub fn new(options: PaginationOptions) -> Self {
        Self {
            options,
            query: Query::Listing,
            generation: 0,
            next_page: 1,
            has_more: true,
            photos: Vec::new(),
            seen: HashSet::new(),
            replace_on_commit: false,
            version: 0,
            in_flight: None,
            error: None,
        }
    }

    pub fn options(&self) -> &PaginationOptions {
        &self.options
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn next_page(&self) -> u32 {
        self.next_page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    /// Bumped on every committed page.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<Ticket> {
        self.in_flight.as_ref().map(|f| f.request.ticket)
    }

    /// Cancellation token of the in-flight request.
    pub fn cancel_token(&self) -> Option<CancellationToken> {
        self.in_flight.as_ref().map(|f| f.cancel.clone())
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    fn issue(&mut self, page: u32) -> PageRequest {
        let request = PageRequest {
            ticket: Ticket {
                generation: self.generation,
                page,
            },
            query: self.query.clone(),
            page,
            per_page: self.options.per_page.max(1),
        };
        adebug!(
            generation = self.generation,
            page,
            "PaginationCoordinator: issuing fetch"
        );
        self.in_flight = Some(InFlight {
            request: request.clone(),
            cancel: CancellationToken::new(),
        });
        request
    }

    /// Requests the next page when the sentinel is visible, nothing is in flight and more pages
    /// exist. A latched error blocks until [`Self::retry`] or a query change.
    pub fn maybe_request_more(&mut self, sentinel_visible: bool) -> Option<PageRequest> {
        if !sentinel_visible || self.in_flight.is_some() || !self.has_more || self.error.is_some()
        {
            return None;
        }
        Some(self.issue(self.next_page))
    }

    /// Switches to `query`, aborting any in-flight fetch. Returns the first-page request, or
    /// `None` when the query is unchanged.
    pub fn set_query(&mut self, query: Query) -> Option<PageRequest> {
        if query == self.query {
            return None;
        }
        Some(self.restart(query))
    }

    /// Restarts the current query from page 1.
    pub fn reload(&mut self) -> PageRequest {
        self.restart(self.query.clone())
    }

    fn restart(&mut self, query: Query) -> PageRequest {
        self.abort();
        self.query = query;
        self.generation += 1;
        self.next_page = 1;
        self.has_more = true;
        self.error = None;
        self.replace_on_commit = true;
        self.issue(1)
    }

    /// Re-issues the page that failed.
    pub fn retry(&mut self) -> Option<PageRequest> {
        if self.error.is_none() || self.in_flight.is_some() {
            return None;
        }
        self.error = None;
        Some(self.issue(self.next_page))
    }

    /// Cancels the in-flight fetch. Returns its ticket the first time only.
    pub fn abort(&mut self) -> Option<Ticket> {
        let flight = self.in_flight.take()?;
        flight.cancel.cancel();
        atrace!(
            generation = flight.request.ticket.generation,
            page = flight.request.ticket.page,
            "PaginationCoordinator: aborted"
        );
        Some(flight.request.ticket)
    }

    /// Applies the result of the fetch identified by `ticket`.
    pub fn complete(&mut self, ticket: Ticket, result: Result<PhotoPage, FetchError>) -> Completion {
        let is_current = self
            .in_flight
            .as_ref()
            .is_some_and(|f| f.request.ticket == ticket);
        if !is_current {
            atrace!(
                generation = ticket.generation,
                page = ticket.page,
                "PaginationCoordinator: stale completion discarded"
            );
            return Completion::Stale;
        }
        let Some(flight) = self.in_flight.take() else {
            return Completion::Stale;
        };

        match result {
            Ok(page) => self.commit(&flight.request, page),
            Err(FetchError::Aborted) => {
                atrace!(page = ticket.page, "PaginationCoordinator: fetch aborted by source");
                Completion::Aborted
            }
            Err(err) => {
                awarn!(page = ticket.page, error = %err, "PaginationCoordinator: fetch failed");
                self.error = Some(err.clone());
                Completion::Failed(err)
            }
        }
    }

    fn commit(&mut self, request: &PageRequest, page: PhotoPage) -> Completion {
        let received = page.photos.len();
        if self.replace_on_commit {
            self.photos.clear();
            self.seen.clear();
            self.replace_on_commit = false;
        }

        let before = self.photos.len();
        for photo in page.photos {
            if let Err(_err) = photo.validate() {
                awarn!(error = %_err, "PaginationCoordinator: dropping invalid photo");
                continue;
            }
            if self.seen.insert(photo.id) {
                self.photos.push(photo);
            }
        }
        let added = self.photos.len() - before;

        let short_page = received < request.per_page as usize;
        let past_total = page
            .total_results
            .is_some_and(|total| u64::from(request.page) * u64::from(request.per_page) >= total);
        self.has_more = !(short_page || past_total);
        self.next_page = request.page.saturating_add(1);
        self.version += 1;

        adebug!(
            page = request.page,
            received,
            added,
            has_more = self.has_more,
            "PaginationCoordinator: page committed"
        );
        Completion::Applied {
            ticket: request.ticket,
            added,
            has_more: self.has_more,
        }
    }
}
