//! Caller-clocked timer wrappers.
//!
//! None of these types own a clock or a thread: the adapter feeds events with `push`/`arm` and
//! asks what is due with `poll`/`fired` from its frame or timer callback. Cancelling is always
//! idempotent.

/// Lets one value through per interval and coalesces the rest into a single trailing value.
///
/// The first value after a quiet interval passes immediately (leading edge). Values pushed
/// inside the interval replace each other; the newest one is released by [`Self::poll`] once
/// the interval has elapsed since the last release.
#[derive(Clone, Debug, PartialEq)]
pub struct Throttle<T> {
    interval_ms: u64,
    last_emit_ms: Option<u64>,
    trailing: Option<T>,
}

impl<T> Throttle<T> {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_emit_ms: None,
            trailing: None,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    fn is_open(&self, now_ms: u64) -> bool {
        self.last_emit_ms
            .is_none_or(|last| now_ms.saturating_sub(last) >= self.interval_ms)
    }

    /// Returns `value` if it may pass now; otherwise keeps it as the trailing value.
    pub fn push(&mut self, value: T, now_ms: u64) -> Option<T> {
        if self.is_open(now_ms) {
            self.last_emit_ms = Some(now_ms);
            self.trailing = None;
            return Some(value);
        }
        self.trailing = Some(value);
        None
    }

    /// Releases the trailing value once the interval has elapsed.
    pub fn poll(&mut self, now_ms: u64) -> Option<T> {
        if self.trailing.is_none() || !self.is_open(now_ms) {
            return None;
        }
        self.last_emit_ms = Some(now_ms);
        self.trailing.take()
    }

    /// Whether a trailing value is waiting to be released.
    pub fn pending(&self) -> bool {
        self.trailing.is_some()
    }

    /// When the trailing value becomes releasable.
    pub fn due_at(&self) -> Option<u64> {
        self.trailing.as_ref()?;
        Some(
            self.last_emit_ms
                .map_or(0, |last| last.saturating_add(self.interval_ms)),
        )
    }

    pub fn cancel(&mut self) {
        self.trailing = None;
        self.last_emit_ms = None;
    }
}

/// Releases the last pushed value once no new value arrived for `delay_ms`.
#[derive(Clone, Debug, PartialEq)]
pub struct Debounce<T> {
    delay_ms: u64,
    last_push_ms: u64,
    value: Option<T>,
}

impl<T> Debounce<T> {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            last_push_ms: 0,
            value: None,
        }
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Stores `value` and re-arms the deadline.
    pub fn push(&mut self, value: T, now_ms: u64) {
        self.value = Some(value);
        self.last_push_ms = now_ms;
    }

    pub fn poll(&mut self, now_ms: u64) -> Option<T> {
        if now_ms.saturating_sub(self.last_push_ms) < self.delay_ms {
            return None;
        }
        self.value.take()
    }

    pub fn pending(&self) -> bool {
        self.value.is_some()
    }

    pub fn due_at(&self) -> Option<u64> {
        self.value
            .as_ref()
            .map(|_| self.last_push_ms.saturating_add(self.delay_ms))
    }

    pub fn cancel(&mut self) {
        self.value = None;
    }
}

/// A one-shot timer. Re-arming moves the deadline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Deadline {
    delay_ms: u64,
    due_at: Option<u64>,
}

impl Deadline {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            due_at: None,
        }
    }

    pub fn arm(&mut self, now_ms: u64) {
        self.due_at = Some(now_ms.saturating_add(self.delay_ms));
    }

    /// Returns `true` exactly once when the deadline has passed, disarming it.
    pub fn fired(&mut self, now_ms: u64) -> bool {
        match self.due_at {
            Some(due) if now_ms >= due => {
                self.due_at = None;
                true
            }
            _ => false,
        }
    }

    pub fn pending(&self) -> bool {
        self.due_at.is_some()
    }

    pub fn due_at(&self) -> Option<u64> {
        self.due_at
    }

    pub fn cancel(&mut self) {
        self.due_at = None;
    }
}
