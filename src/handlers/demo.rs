//! Demonstration sinks.
//!
//! Each function simulates a handler that lets a tainted input reach a
//! dangerous evaluation sink, reporting ground truth at the moment it does.
//! The recorded canonical location is returned so callers can embed it in
//! expected-output fixtures.

use crate::issues::IssueTracker;

/// Puts the tainted value into a one-element array, extracts it, and feeds
/// it to the sink.
pub fn eval_from_single_element_array(tracker: &IssueTracker, input: &str) -> String {
    let a = [input];
    let _tainted = a[0];
    tracker.report()
}

/// Passes the tainted value through a local binding before it reaches the
/// sink.
pub fn eval_through_variable(tracker: &IssueTracker, input: &str) -> String {
    let x = input;
    let _tainted = x;
    tracker.report()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_sinks_record_their_own_locations() {
        let tracker = IssueTracker::new();
        let first = eval_from_single_element_array(&tracker, "2 + 2");
        let second = eval_through_variable(&tracker, "2 + 2");

        assert!(first.starts_with("handlers/demo.rs:"), "got {first}");
        assert!(second.starts_with("handlers/demo.rs:"), "got {second}");
        assert_ne!(first, second);
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn repeated_requests_report_the_same_location() {
        let tracker = IssueTracker::new();
        let first = eval_through_variable(&tracker, "a");
        let second = eval_through_variable(&tracker, "b");
        assert_eq!(first, second);
        assert_eq!(tracker.len(), 1);
    }
}
