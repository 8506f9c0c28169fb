//! Typed model of the example catalog.
//!
//! The catalog is the benchmark's table of contents: categories of examples,
//! each example backed by one or more server handlers, each handler carrying
//! the test cases that are sent against its route. The structure is decoded
//! once at startup (after the schema gate has accepted the raw JSON) and is
//! read-only from then on.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: Vec<Category>,
}

/// A group of examples sharing a common theme (Arrays, Scopes, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub heading: String,
    pub description: String,
    pub examples: Vec<Example>,
}

/// One benchmark example; may be demonstrated by several closely related
/// handlers (e.g. a false-positive and a false-negative variant of the same
/// setup).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub heading: String,
    pub description: String,
    pub handlers: Vec<Handler>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handler {
    #[serde(default)]
    pub heading: Option<String>,
    pub description: String,
    /// Full route to the handler as registered on the server.
    pub route: String,
    pub test_cases: Vec<TestCase>,
}

/// An input/expected-output pair sent to a handler's route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub description: String,
    pub input: String,
    pub expected_output: String,
}

impl Catalog {
    /// All handlers in catalog traversal order
    /// (categories, then examples, then handlers).
    pub fn iter_handlers(&self) -> impl Iterator<Item = &Handler> {
        self.categories
            .iter()
            .flat_map(|c| c.examples.iter())
            .flat_map(|e| e.handlers.iter())
    }

    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        let categories: Vec<Category> = serde_json::from_value(value.clone())
            .map_err(|e| Error::parse(format!("Failed to decode catalog: {e}")))?;
        Ok(Self { categories })
    }
}

/// Reads a catalog definition file into its raw JSON form.
///
/// The result is deliberately untyped: the schema gate inspects the raw value
/// so that missing or ill-typed fields are reported as validation findings,
/// not as decode errors.
pub fn load_raw(path: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("Failed to read catalog {}: {e}", path.display())))?;
    serde_json::from_str(&content)
        .map_err(|e| Error::parse(format!("Catalog {} is not valid JSON: {e}", path.display())))
}
