//! Consistency checks between the catalog's declared routes and the routes
//! actually registered on the server, with edit-distance suggestions for
//! likely typos.

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::error;

/// A catalog route with no exact match among the registered routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingRoute {
    pub missing: String,
    /// The most similar registered route, if any routes are registered.
    pub similar: Option<String>,
}

/// A sub-router mounted on the server at one level (not nested), e.g. the
/// `arrays` router serving `/arrays/single-element-array`.
#[derive(Debug, Clone, Deserialize)]
pub struct RouterMount {
    pub prefix: String,
    pub paths: Vec<String>,
}

static MOUNT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").unwrap_or_else(|e| panic!("regex: {e}")));
static MOUNT_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(/[a-z0-9-]+)+$").unwrap_or_else(|e| panic!("regex: {e}")));

/// Compute the Levenshtein edit distance between two route strings: the
/// minimum number of single-character insertions, deletions and
/// substitutions to transform one into the other.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Two rows instead of the full matrix.
    let mut prev_row: Vec<usize> = (0..=n).collect();
    let mut curr_row: Vec<usize> = vec![0; n + 1];

    for i in 1..=m {
        curr_row[0] = i;
        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            curr_row[j] = (prev_row[j] + 1)
                .min(curr_row[j - 1] + 1)
                .min(prev_row[j - 1] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[n]
}

/// The registered route closest to `route` by edit distance; ties go to the
/// first-encountered candidate.
fn find_closest(route: &str, all_routes: &[String]) -> Option<String> {
    let mut closest: Option<(&str, usize)> = None;
    for candidate in all_routes {
        let dist = levenshtein(route, candidate);
        match closest {
            Some((_, best)) if dist >= best => {}
            _ => closest = Some((candidate.as_str(), dist)),
        }
    }
    closest.map(|(c, _)| c.to_string())
}

/// All catalog routes with no exact match in `registered`, each annotated
/// with the most similar registered route.
pub fn find_missing_routes(catalog: &Catalog, registered: &[String]) -> Vec<MissingRoute> {
    let lookup: HashSet<&str> = registered.iter().map(String::as_str).collect();
    catalog
        .iter_handlers()
        .filter(|h| !lookup.contains(h.route.as_str()))
        .map(|h| MissingRoute {
            missing: h.route.clone(),
            similar: find_closest(&h.route, registered),
        })
        .collect()
}

/// Routes the catalog declares more than once, in catalog traversal order,
/// reported on their second and later occurrences.
pub fn find_duplicate_routes(catalog: &Catalog) -> Vec<String> {
    let mut already_seen: HashSet<&str> = HashSet::new();
    let mut duplicates = Vec::new();
    for handler in catalog.iter_handlers() {
        if !already_seen.insert(handler.route.as_str()) {
            duplicates.push(handler.route.clone());
        }
    }
    duplicates
}

/// Flattens mounted sub-routers into the full list of concrete route paths
/// (`/{prefix}{path}`). Mount prefixes and path segments must consist of
/// lowercase alphanumerics and dashes.
pub fn enumerate_routes(mounts: &[RouterMount]) -> Result<Vec<String>> {
    let mut routes = Vec::new();
    for mount in mounts {
        if !MOUNT_PREFIX.is_match(&mount.prefix) {
            return Err(Error::config(format!(
                "Invalid router mount prefix: {:?}",
                mount.prefix
            )));
        }
        for path in &mount.paths {
            if !MOUNT_PATH.is_match(path) {
                return Err(Error::config(format!(
                    "Invalid route path {path:?} under mount {:?}",
                    mount.prefix
                )));
            }
            routes.push(format!("/{}{}", mount.prefix, path));
        }
    }
    Ok(routes)
}

/// Checks that every catalog route has a registered handler and that no
/// route is declared twice.
///
/// Both failure classes are evaluated and reported in the same run; missing
/// routes are reported first. Passes only when both are empty.
pub fn validate_routes(catalog: &Catalog, registered: &[String]) -> bool {
    let missing = find_missing_routes(catalog, registered);
    let duplicates = find_duplicate_routes(catalog);

    for route in &missing {
        match &route.similar {
            Some(similar) => error!(
                missing = %route.missing,
                "Missing route, did you mean {similar:?}?"
            ),
            None => error!(missing = %route.missing, "Missing route"),
        }
    }
    if !missing.is_empty() {
        error!(count = missing.len(), "There were missing routes");
    }

    for route in &duplicates {
        error!(route = %route, "Duplicate route");
    }
    if !duplicates.is_empty() {
        error!(count = duplicates.len(), "There were duplicate routes");
    }

    missing.is_empty() && duplicates.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, Example, Handler};

    fn catalog_with_routes(routes: &[&str]) -> Catalog {
        let handlers = routes
            .iter()
            .map(|r| Handler {
                heading: None,
                description: String::new(),
                route: (*r).into(),
                test_cases: Vec::new(),
            })
            .collect();
        Catalog {
            categories: vec![Category {
                heading: "C".into(),
                description: String::new(),
                examples: vec![Example {
                    heading: "e".into(),
                    description: String::new(),
                    handlers,
                }],
            }],
        }
    }

    fn registered(routes: &[&str]) -> Vec<String> {
        routes.iter().map(|r| (*r).to_string()).collect()
    }

    // -- levenshtein --

    #[test]
    fn distance_identical() {
        assert_eq!(levenshtein("/a/x", "/a/x"), 0);
    }

    #[test]
    fn distance_substitution() {
        assert_eq!(levenshtein("cat", "car"), 1);
    }

    #[test]
    fn distance_insertion_and_deletion() {
        assert_eq!(levenshtein("/a/y", "/a/yy"), 1);
        assert_eq!(levenshtein("hello", "helo"), 1);
    }

    #[test]
    fn distance_multiple_edits() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
    }

    #[test]
    fn distance_empty() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
    }

    // -- missing routes --

    #[test]
    fn exact_matches_are_not_missing() {
        let catalog = catalog_with_routes(&["/a/x", "/a/y"]);
        let missing = find_missing_routes(&catalog, &registered(&["/a/x", "/a/y"]));
        assert!(missing.is_empty());
    }

    #[test]
    fn missing_route_suggests_closest_registered() {
        let catalog = catalog_with_routes(&["/a/yy"]);
        let missing = find_missing_routes(&catalog, &registered(&["/a/x", "/a/y"]));
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].missing, "/a/yy");
        assert_eq!(missing[0].similar.as_deref(), Some("/a/y"));
    }

    #[test]
    fn missing_route_with_no_registered_routes_has_no_suggestion() {
        let catalog = catalog_with_routes(&["/a/x"]);
        let missing = find_missing_routes(&catalog, &[]);
        assert_eq!(missing.len(), 1);
        assert!(missing[0].similar.is_none());
    }

    #[test]
    fn suggestion_ties_break_on_first_encountered() {
        let catalog = catalog_with_routes(&["/ab"]);
        // Both candidates are distance 1; the first one wins.
        let missing = find_missing_routes(&catalog, &registered(&["/aa", "/ac"]));
        assert_eq!(missing[0].similar.as_deref(), Some("/aa"));
    }

    // -- duplicate routes --

    #[test]
    fn duplicate_route_reported_on_second_occurrence() {
        let catalog = catalog_with_routes(&["/a/x", "/a/y", "/a/x"]);
        assert_eq!(find_duplicate_routes(&catalog), vec!["/a/x"]);
    }

    #[test]
    fn duplicate_reported_even_when_registered() {
        let catalog = catalog_with_routes(&["/a/x", "/a/x"]);
        assert_eq!(find_duplicate_routes(&catalog), vec!["/a/x"]);
        assert!(!validate_routes(&catalog, &registered(&["/a/x"])));
    }

    // -- enumerate_routes --

    #[test]
    fn enumerate_flattens_mounts() {
        let mounts = vec![
            RouterMount {
                prefix: "arrays".into(),
                paths: vec!["/single-element-array".into(), "/for-loop".into()],
            },
            RouterMount {
                prefix: "scopes".into(),
                paths: vec!["/block-scope".into()],
            },
        ];
        let routes = enumerate_routes(&mounts).unwrap();
        assert_eq!(
            routes,
            vec![
                "/arrays/single-element-array",
                "/arrays/for-loop",
                "/scopes/block-scope"
            ]
        );
    }

    #[test]
    fn enumerate_rejects_uppercase_prefix() {
        let mounts = vec![RouterMount {
            prefix: "Arrays".into(),
            paths: vec!["/x".into()],
        }];
        assert!(enumerate_routes(&mounts).is_err());
    }

    #[test]
    fn enumerate_rejects_malformed_path() {
        let mounts = vec![RouterMount {
            prefix: "arrays".into(),
            paths: vec!["no-leading-slash".into()],
        }];
        assert!(enumerate_routes(&mounts).is_err());
    }

    // -- validate_routes --

    #[test]
    fn valid_configuration_passes() {
        let catalog = catalog_with_routes(&["/a/x", "/a/y"]);
        assert!(validate_routes(&catalog, &registered(&["/a/x", "/a/y", "/a/z"])));
    }

    #[test]
    fn both_failure_classes_detected_in_one_run() {
        // One missing route and one duplicate: the result reflects both.
        let catalog = catalog_with_routes(&["/a/x", "/a/x", "/a/zz"]);
        assert!(!validate_routes(&catalog, &registered(&["/a/x"])));
        assert_eq!(find_missing_routes(&catalog, &registered(&["/a/x"])).len(), 1);
        assert_eq!(find_duplicate_routes(&catalog).len(), 1);
    }
}
