//! Duplicate-heading detection across the catalog's nesting levels.
//!
//! Headings must be unique among siblings at every level: the top-level
//! category list, each category's examples, and each example's handlers.
//! The same heading under two different parents is fine.

use crate::catalog::Catalog;
use std::collections::HashSet;
use std::fmt;

/// A heading that collides with an earlier sibling, identified by the full
/// path of headings from the root down to the offending level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateHeading {
    pub full_path: Vec<String>,
}

impl fmt::Display for DuplicateHeading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted: Vec<String> = self.full_path.iter().map(|x| format!("\"{x}\"")).collect();
        write!(f, "{}", quoted.join(" -> "))
    }
}

/// Walks the catalog and collects every sibling heading collision.
///
/// A heading counts as duplicate on its second and subsequent occurrences
/// among its siblings; the first occurrence is never reported. Violations
/// are ordered level-first: collisions at a level come before collisions
/// inside that level's children.
pub fn find_duplicate_headings(catalog: &Catalog) -> Vec<DuplicateHeading> {
    let mut out = duplicate_keys(
        catalog.categories.iter().map(|c| c.heading.as_str()),
        &[],
    );
    for category in &catalog.categories {
        let category_path = [category.heading.clone()];
        out.extend(duplicate_keys(
            category.examples.iter().map(|e| e.heading.as_str()),
            &category_path,
        ));
        for example in &category.examples {
            let example_path = [category.heading.clone(), example.heading.clone()];
            // Heading-less handlers do not participate in collision detection.
            out.extend(duplicate_keys(
                example.handlers.iter().filter_map(|h| h.heading.as_deref()),
                &example_path,
            ));
        }
    }
    out
}

/// Collects keys seen more than once, keyed off an already-fixed path prefix.
fn duplicate_keys<'a>(
    keys: impl Iterator<Item = &'a str>,
    prefix: &[String],
) -> Vec<DuplicateHeading> {
    let mut already_seen: HashSet<&str> = HashSet::new();
    let mut duplicates = Vec::new();
    for key in keys {
        if !already_seen.insert(key) {
            let mut full_path = prefix.to_vec();
            full_path.push(key.to_string());
            duplicates.push(DuplicateHeading { full_path });
        }
    }
    duplicates
}
