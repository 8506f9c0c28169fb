//! Ground-truth tracking for the benchmark.
//!
//! Whenever a tainted value actually reaches a dangerous evaluation sink at
//! runtime, the sink reports its own source location here. The accumulated
//! set of locations is the ground truth that a static-analysis tool's
//! findings are compared against.
//!
//! A location is a string in the format `handlers/arrays.rs:42`.

pub mod sarif;

use regex::Regex;
use std::collections::HashSet;
use std::sync::{LazyLock, Mutex};
use tracing::info;

/// Call sites that report issues must live in a sink module under
/// `handlers/`; the capture is the canonical relative path.
static SINK_MODULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(handlers/[a-z0-9_-]+\.rs)$").unwrap_or_else(|e| panic!("regex: {e}"))
});

/// Process-wide registry of issue locations reached at runtime.
///
/// Created once at startup and injected into the request handlers; insertion
/// is append-only and idempotent, and the set is only cleared through
/// [`IssueTracker::reset`] (test isolation) or a process restart.
#[derive(Debug, Default)]
pub struct IssueTracker {
    reported: Mutex<HashSet<String>>,
}

impl IssueTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the calling sink's own source location as ground truth and
    /// returns the canonical `path:line` string.
    ///
    /// The call site is resolved from caller metadata, so instrumentation is
    /// a single no-argument call inside the sink. The caller must be a sink
    /// module (`handlers/*.rs`); anything else means the instrumentation
    /// convention was violated and is a fatal programming error, not a data
    /// error.
    #[track_caller]
    pub fn report(&self) -> String {
        let caller = std::panic::Location::caller();
        let file = caller.file().replace('\\', "/");
        let Some(captures) = SINK_MODULE.captures(&file) else {
            panic!(
                "issue reported from non-sink call site {}:{}; report() may only be \
                 called from handlers/*.rs",
                file,
                caller.line()
            );
        };
        self.report_at(&captures[1], caller.line())
    }

    /// Canonicalizes and records a location. Also the seam for seeding a
    /// tracker from previously recorded ground truth.
    pub fn report_at(&self, path: &str, line: u32) -> String {
        let location = format!("{path}:{line}");
        info!(location = %location, "Reporting issue");
        self.reported
            .lock()
            .expect("issue set lock poisoned")
            .insert(location.clone());
        location
    }

    /// The current ground-truth set. A comparison sees the insertions that
    /// completed before the snapshot was taken.
    pub fn snapshot(&self) -> HashSet<String> {
        self.reported
            .lock()
            .expect("issue set lock poisoned")
            .clone()
    }

    pub fn contains(&self, location: &str) -> bool {
        self.reported
            .lock()
            .expect("issue set lock poisoned")
            .contains(location)
    }

    pub fn len(&self) -> usize {
        self.reported.lock().expect("issue set lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all recorded locations. Only for test isolation; during a
    /// server's lifetime the set is append-only.
    pub fn reset(&self) {
        self.reported
            .lock()
            .expect("issue set lock poisoned")
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_at_returns_canonical_location() {
        let tracker = IssueTracker::new();
        let location = tracker.report_at("handlers/arrays.rs", 42);
        assert_eq!(location, "handlers/arrays.rs:42");
        assert!(tracker.contains("handlers/arrays.rs:42"));
    }

    #[test]
    fn reporting_is_idempotent() {
        let tracker = IssueTracker::new();
        tracker.report_at("handlers/arrays.rs", 42);
        tracker.report_at("handlers/arrays.rs", 42);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn distinct_lines_are_distinct_locations() {
        let tracker = IssueTracker::new();
        tracker.report_at("handlers/arrays.rs", 42);
        tracker.report_at("handlers/arrays.rs", 43);
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn snapshot_is_detached_from_later_writes() {
        let tracker = IssueTracker::new();
        tracker.report_at("handlers/a.rs", 1);
        let snapshot = tracker.snapshot();
        tracker.report_at("handlers/b.rs", 2);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn reset_clears_the_set() {
        let tracker = IssueTracker::new();
        tracker.report_at("handlers/a.rs", 1);
        tracker.reset();
        assert!(tracker.is_empty());
    }

    #[test]
    #[should_panic(expected = "non-sink call site")]
    fn report_outside_sink_module_is_fatal() {
        // This test file is not under handlers/, so the convention check
        // must fail loudly.
        let tracker = IssueTracker::new();
        tracker.report();
    }
}
