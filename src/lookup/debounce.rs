//! lookup::debounce
//!
//! Composition-aware debouncing of the raw search query.
//!
//! # Design
//!
//! The debouncer is driven by an explicit clock: callers pass `Instant`s
//! into `edit`/`poll` instead of the debouncer owning a timer task. That
//! keeps every rule deterministic and testable without sleeping.
//!
//! # Rules
//!
//! - A value forwards only after it has been quiescent for the configured
//!   delay, and only when it differs from the last forwarded value.
//! - While a composition session is open (a multi-keystroke input method is
//!   building characters), nothing forwards, regardless of elapsed time.
//! - The instant composition ends the debouncer re-synchronizes to the
//!   current raw value; it forwards immediately, but only if the value
//!   actually changed relative to the last forwarded one.
//! - An explicit submit bypasses the delay and forwards the raw value
//!   verbatim.
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use veridoc::lookup::debounce::QueryDebouncer;
//!
//! let mut deb = QueryDebouncer::new(Duration::from_millis(400));
//! let t0 = Instant::now();
//!
//! deb.edit("contr", t0);
//! assert_eq!(deb.poll(t0), None); // not quiescent yet
//!
//! deb.edit("contract", t0 + Duration::from_millis(100));
//! let ready = t0 + Duration::from_millis(500);
//! assert_eq!(deb.poll(ready), Some("contract".to_string()));
//! assert_eq!(deb.poll(ready), None); // already forwarded
//! ```

use std::time::{Duration, Instant};

/// Debounce delay used by the reference UI.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(400);

/// Turns a rapidly-changing raw query into a stable, delayed value.
#[derive(Debug, Clone)]
pub struct QueryDebouncer {
    delay: Duration,
    raw: String,
    /// Last value handed to the listing fetcher, `None` before the first.
    last_forwarded: Option<String>,
    /// Open composition session: intermediate text is not a finished query.
    composing: bool,
    /// When the raw value last changed; `None` when nothing is pending.
    dirty_since: Option<Instant>,
    /// Pending value may forward without waiting (set at composition end).
    immediate: bool,
}

impl QueryDebouncer {
    /// Create a debouncer with the given quiescence delay.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            raw: String::new(),
            last_forwarded: None,
            composing: false,
            dirty_since: None,
            immediate: false,
        }
    }

    /// The current raw value.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Whether a composition session is open.
    pub fn is_composing(&self) -> bool {
        self.composing
    }

    /// Record an edit to the raw value at time `now`.
    pub fn edit(&mut self, value: impl Into<String>, now: Instant) {
        let value = value.into();
        if value == self.raw {
            return;
        }
        self.raw = value;
        self.dirty_since = Some(now);
        self.immediate = false;
    }

    /// Mark the start of a composition session.
    pub fn composition_start(&mut self) {
        self.composing = true;
    }

    /// Mark the end of a composition session, re-synchronizing to `value`.
    ///
    /// Forwarding resumes immediately: if the final value differs from the
    /// last forwarded one, the next `poll` returns it without waiting for
    /// the delay. An unchanged value triggers nothing.
    pub fn composition_end(&mut self, value: impl Into<String>, now: Instant) {
        self.composing = false;
        self.raw = value.into();
        if self.last_forwarded.as_deref() != Some(self.raw.as_str()) {
            self.dirty_since = Some(now);
            self.immediate = true;
        } else {
            self.dirty_since = None;
            self.immediate = false;
        }
    }

    /// The stable value ready to forward at time `now`, if any.
    ///
    /// Returns `Some` at most once per settled value; the forwarded value is
    /// recorded so repeats and echoes never re-trigger a fetch.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        if self.composing {
            return None;
        }
        let dirty_since = self.dirty_since?;
        if !self.immediate && now.duration_since(dirty_since) < self.delay {
            return None;
        }
        self.dirty_since = None;
        self.immediate = false;
        if self.last_forwarded.as_deref() == Some(self.raw.as_str()) {
            return None;
        }
        self.last_forwarded = Some(self.raw.clone());
        Some(self.raw.clone())
    }

    /// Bypass the delay and forward the raw value verbatim (explicit
    /// submit, e.g. pressing enter).
    pub fn submit_now(&mut self) -> String {
        self.dirty_since = None;
        self.immediate = false;
        self.last_forwarded = Some(self.raw.clone());
        self.raw.clone()
    }
}

impl Default for QueryDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
