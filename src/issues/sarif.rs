//! Comparison of a tool's reported findings against the recorded ground
//! truth.
//!
//! The tool under evaluation submits a JSON array of findings in a
//! SARIF-like shape; each finding is normalized to the canonical
//! `path:line` format and classified as a true or false positive, and every
//! unreported ground-truth location becomes a false negative.

use super::IssueTracker;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Findings whose path names this module would report on the comparison
/// machinery itself rather than on a benchmark example; they are discarded.
const SELF_MODULE: &str = "issues";

#[derive(Debug, Deserialize)]
struct SarifEntry {
    most_recent_instance: SarifInstance,
}

#[derive(Debug, Deserialize)]
struct SarifInstance {
    location: SarifLocation,
}

#[derive(Debug, Deserialize)]
struct SarifLocation {
    path: String,
    start_line: u32,
}

/// Result of comparing a findings payload against the ground-truth set.
/// Constructed fresh per comparison; not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    /// Ground-truth locations in set iteration order (not sorted).
    pub ground_truth: Vec<String>,
    /// All normalized findings, sorted.
    pub sarif: Vec<String>,
    pub num_tp: usize,
    pub num_fp: usize,
    pub num_fn: usize,
    pub tp: Vec<String>,
    pub fp: Vec<String>,
    #[serde(rename = "fn")]
    pub fn_: Vec<String>,
}

/// Extracts the list of issue locations from a JSON-serialized SARIF-like
/// payload.
///
/// Fails with a parse error if the payload is not valid JSON or not an
/// array of finding records. SARIF lines are 0-based; canonical locations
/// are 1-based.
pub fn extract_issues_from_sarif(payload: &str) -> Result<Vec<String>> {
    let entries: Vec<SarifEntry> = serde_json::from_str(payload)
        .map_err(|e| Error::parse(format!("Invalid SARIF payload: {e}")))?;
    Ok(entries
        .into_iter()
        .map(|e| {
            let loc = e.most_recent_instance.location;
            format!("{}:{}", loc.path, loc.start_line + 1)
        })
        .filter(|loc| !loc.contains(SELF_MODULE))
        .collect())
}

/// Classifies normalized findings against the ground-truth set.
///
/// A finding present in the ground truth is a true positive, otherwise a
/// false positive; a ground-truth location never reported is a false
/// negative. All three classification lists are sorted for deterministic
/// output. Pure function of its two inputs.
pub fn compare_results(ground_truth: &HashSet<String>, sarif_issues: Vec<String>) -> Comparison {
    let mut tp = Vec::new();
    let mut fp = Vec::new();
    for issue in &sarif_issues {
        if ground_truth.contains(issue) {
            tp.push(issue.clone());
        } else {
            fp.push(issue.clone());
        }
    }

    let sarif_set: HashSet<&str> = sarif_issues.iter().map(String::as_str).collect();
    let mut fn_: Vec<String> = ground_truth
        .iter()
        .filter(|loc| !sarif_set.contains(loc.as_str()))
        .cloned()
        .collect();

    tp.sort();
    fp.sort();
    fn_.sort();
    let mut sarif = sarif_issues;
    sarif.sort();

    Comparison {
        ground_truth: ground_truth.iter().cloned().collect(),
        sarif,
        num_tp: tp.len(),
        num_fp: fp.len(),
        num_fn: fn_.len(),
        tp,
        fp,
        fn_,
    }
}

/// The comparison-endpoint boundary: snapshot the tracker's ground truth,
/// extract the submitted findings, classify.
///
/// Callable repeatedly; the only side effect is reading the tracker.
pub fn compare_sarif(tracker: &IssueTracker, payload: &str) -> Result<Comparison> {
    let ground_truth = tracker.snapshot();
    let sarif_issues = extract_issues_from_sarif(payload)?;
    Ok(compare_results(&ground_truth, sarif_issues))
}
