use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::{
    Completion, FetchError, PageRequest, PaginationCoordinator, PaginationOptions, PhotoPage,
    PhotoSource, Query, Ticket,
};

type Delivery = (Ticket, Result<PhotoPage, FetchError>);

enum Next {
    Delivered(Option<Delivery>),
    Joined(Result<(), JoinError>),
}

/// Drives a [`PaginationCoordinator`] against a [`PhotoSource`] on the tokio runtime.
///
/// Each issued request is spawned as a task that races the fetch against its cancellation
/// token; a cancelled task delivers nothing. Results come back over a channel and are applied
/// through the coordinator, which discards anything stale.
///
/// Methods that issue requests must be called from within a tokio runtime. Dropping the feed
/// cancels the in-flight fetch.
#[derive(Debug)]
pub struct Feed<S> {
    source: Arc<S>,
    coordinator: PaginationCoordinator,
    tx: mpsc::UnboundedSender<Delivery>,
    rx: mpsc::UnboundedReceiver<Delivery>,
    task: Option<(Ticket, JoinHandle<()>)>,
}

impl<S> Drop for Feed<S> {
    fn drop(&mut self) {
        self.coordinator.abort();
    }
}

impl<S: PhotoSource> Feed<S> {
    pub fn new(source: S, options: PaginationOptions) -> Self {
        Self::from_arc(Arc::new(source), options)
    }

    pub fn from_arc(source: Arc<S>, options: PaginationOptions) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            coordinator: PaginationCoordinator::new(options),
            tx,
            rx,
            task: None,
        }
    }

    pub fn coordinator(&self) -> &PaginationCoordinator {
        &self.coordinator
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Spawns the fetch for `request` if it is the coordinator's in-flight request.
    pub fn request(&mut self, request: PageRequest) {
        let Some(cancel) = self
            .coordinator
            .cancel_token()
            .filter(|_| self.coordinator.in_flight() == Some(request.ticket))
        else {
            awarn!(page = request.page, "Feed::request: not the in-flight request");
            return;
        };
        self.spawn(request, cancel);
    }

    fn spawn(&mut self, request: PageRequest, cancel: CancellationToken) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let ticket = request.ticket;
        let handle = tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return,
                result = source.fetch(request, cancel.clone()) => result,
            };
            // The receiver only goes away with the feed itself.
            let _ = tx.send((ticket, result));
        });
        self.task = Some((ticket, handle));
    }

    /// Fetches the next page when the sentinel is visible. Returns whether a fetch started.
    pub fn load_more(&mut self, sentinel_visible: bool) -> bool {
        match self.coordinator.maybe_request_more(sentinel_visible) {
            Some(request) => {
                self.request(request);
                true
            }
            None => false,
        }
    }

    /// Switches query, aborting the in-flight fetch. Returns whether a fetch started.
    pub fn set_query(&mut self, query: Query) -> bool {
        match self.coordinator.set_query(query) {
            Some(request) => {
                self.request(request);
                true
            }
            None => false,
        }
    }

    pub fn search(&mut self, text: &str) -> bool {
        self.set_query(Query::search(text))
    }

    pub fn reload(&mut self) {
        let request = self.coordinator.reload();
        self.request(request);
    }

    pub fn retry(&mut self) -> bool {
        match self.coordinator.retry() {
            Some(request) => {
                self.request(request);
                true
            }
            None => false,
        }
    }

    pub fn abort(&mut self) -> Option<Ticket> {
        self.coordinator.abort()
    }

    /// Waits for the next delivered result and applies it.
    ///
    /// Returns `None` once nothing is in flight and no delivery is queued. A fetch task that
    /// panicked completes as [`FetchError::Network`].
    pub async fn next_completion(&mut self) -> Option<Completion> {
        if let Ok((ticket, result)) = self.rx.try_recv() {
            return Some(self.coordinator.complete(ticket, result));
        }
        loop {
            if !self.coordinator.is_loading() {
                return None;
            }
            let next = match self.task.as_mut() {
                Some((_, handle)) => tokio::select! {
                    biased;
                    delivery = self.rx.recv() => Next::Delivered(delivery),
                    joined = handle => Next::Joined(joined),
                },
                // `self.tx` keeps the channel open, so `recv` only returns `Some`.
                None => Next::Delivered(self.rx.recv().await),
            };
            match next {
                Next::Delivered(delivery) => {
                    let (ticket, result) = delivery?;
                    return Some(self.coordinator.complete(ticket, result));
                }
                Next::Joined(joined) => {
                    let Some((ticket, _)) = self.task.take() else {
                        continue;
                    };
                    if let Err(err) = joined {
                        awarn!(page = ticket.page, error = %err, "Feed: fetch task failed");
                        let failure = FetchError::Network(format!("fetch task failed: {err}"));
                        return Some(self.coordinator.complete(ticket, Err(failure)));
                    }
                    // Finished normally: its delivery (if any) is already queued.
                }
            }
        }
    }

    /// Applies every result delivered so far without waiting.
    pub fn drain(&mut self) -> Vec<Completion> {
        let mut out = Vec::new();
        while let Ok((ticket, result)) = self.rx.try_recv() {
            out.push(self.coordinator.complete(ticket, result));
        }
        out
    }
}
