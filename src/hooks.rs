//! Observer seams between the crawler core and its host.
//!
//! The core holds no shared mutable state of its own. Hosts that want usage
//! counters or progress output inject them through these traits:
//! - [`UsageHook`]: told once per completed top-level call
//! - [`ProgressObserver`]: told after each URL of a batch fetch
//!
//! Both are fire-and-forget: they return nothing and cannot change the result
//! of the call that triggered them.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::debug;

/// Kind of top-level call being counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invocation {
    Search,
    Fetch,
    Analysis,
}

/// Receives one notification per completed top-level call.
pub trait UsageHook: Send + Sync {
    fn record(&self, invocation: Invocation);
}

/// A hook that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHook;

impl UsageHook for NoopHook {
    fn record(&self, _invocation: Invocation) {}
}

/// Receives batch progress as `(completed, total)` after each item.
pub trait ProgressObserver {
    fn on_progress(&self, completed: usize, total: usize);
}

/// An observer that ignores progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&self, _completed: usize, _total: usize) {}
}

impl<T: Fn(usize, usize)> ProgressObserver for T {
    fn on_progress(&self, completed: usize, total: usize) {
        self(completed, total)
    }
}

/// Process-wide invocation counters.
#[derive(Debug)]
pub struct UsageStats {
    search_count: AtomicU64,
    fetch_count: AtomicU64,
    analysis_count: AtomicU64,
    started: Instant,
}

impl Default for UsageStats {
    fn default() -> Self {
        Self::new()
    }
}

impl UsageStats {
    pub fn new() -> Self {
        Self {
            search_count: AtomicU64::new(0),
            fetch_count: AtomicU64::new(0),
            analysis_count: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    pub fn snapshot(&self) -> UsageSnapshot {
        let search_count = self.search_count.load(Ordering::Relaxed);
        let fetch_count = self.fetch_count.load(Ordering::Relaxed);
        let analysis_count = self.analysis_count.load(Ordering::Relaxed);
        UsageSnapshot {
            search_count,
            fetch_count,
            analysis_count,
            total_requests: search_count + fetch_count + analysis_count,
            uptime: Uptime::from_secs(self.started.elapsed().as_secs()),
        }
    }
}

impl UsageHook for UsageStats {
    fn record(&self, invocation: Invocation) {
        let counter = match invocation {
            Invocation::Search => &self.search_count,
            Invocation::Fetch => &self.fetch_count,
            Invocation::Analysis => &self.analysis_count,
        };
        let count = counter.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(?invocation, count, "Recorded invocation");
    }
}

/// Point-in-time copy of [`UsageStats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageSnapshot {
    pub search_count: u64,
    pub fetch_count: u64,
    pub analysis_count: u64,
    pub total_requests: u64,
    pub uptime: Uptime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Uptime {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Uptime {
    pub fn from_secs(total: u64) -> Self {
        Self {
            days: total / 86_400,
            hours: total % 86_400 / 3_600,
            minutes: total % 3_600 / 60,
            seconds: total % 60,
        }
    }
}
