//! Startup self-validation of the benchmark catalog.
//!
//! Three ordered checks gate server startup: schema validity of the raw
//! catalog JSON, route consistency against the registered routes, and
//! heading uniqueness. Each check reports every individual violation before
//! the gate gives up, and each carries its own process exit code so the
//! host can abort startup with a distinct status.

pub mod headings;
pub mod routes;
pub mod schema;

use crate::catalog::Catalog;
use serde_json::Value;
use std::fmt;
use tracing::{error, info};

/// Which startup check failed. Checks run in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateFailure {
    Schema,
    Routes,
    Headings,
}

impl GateFailure {
    /// Distinct nonzero exit status per failing check.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Schema => 1,
            Self::Routes => 2,
            Self::Headings => 3,
        }
    }
}

impl fmt::Display for GateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema => write!(f, "schema validation"),
            Self::Routes => write!(f, "routes configuration"),
            Self::Headings => write!(f, "heading uniqueness"),
        }
    }
}

/// Runs the startup checks against the raw catalog JSON and the routes
/// registered on the live server.
///
/// On success returns the decoded, typed catalog; from then on the catalog
/// is read-only data. On failure every violation of the failing check has
/// already been logged.
pub fn run_startup_gate(
    raw: &Value,
    registered: &[String],
) -> std::result::Result<Catalog, GateFailure> {
    let Some(raw_categories) = raw.as_array() else {
        error!("Catalog definition must be a JSON array of categories");
        return Err(GateFailure::Schema);
    };

    if !schema::validate_categories(raw_categories) {
        error!("Schema validation failed");
        return Err(GateFailure::Schema);
    }

    // The schema gate has accepted the shape, so decoding is expected to
    // succeed; a failure here is still a schema-class problem.
    let catalog = match Catalog::from_value(raw) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!(error = %e, "Catalog decoding failed after schema validation");
            return Err(GateFailure::Schema);
        }
    };

    if !routes::validate_routes(&catalog, registered) {
        error!("Invalid routes configuration");
        return Err(GateFailure::Routes);
    }

    let duplicate_headings = headings::find_duplicate_headings(&catalog);
    if !duplicate_headings.is_empty() {
        for duplicate in &duplicate_headings {
            error!(path = %duplicate, "Duplicate heading");
        }
        error!(
            count = duplicate_headings.len(),
            "There were duplicate headings"
        );
        return Err(GateFailure::Headings);
    }

    info!(
        categories = catalog.categories.len(),
        handlers = catalog.iter_handlers().count(),
        "startup validation passed"
    );
    Ok(catalog)
}
