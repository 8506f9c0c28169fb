//! Structural validation of the raw catalog JSON.
//!
//! Each catalog entity has its own schema struct so the four shapes stay
//! independently testable. Nested references (Category contains Examples,
//! Example contains Handlers, Handler contains TestCases) are resolved at
//! construction time into direct struct composition, not looked up by name
//! at validation time.

use serde_json::{Map, Value};
use std::fmt;
use tracing::error;

/// One structural defect, with a JSON-path-ish pointer into the validated
/// value (empty path means the value itself).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    pub path: String,
    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

#[derive(Debug, Default)]
pub struct TestCaseSchema;

#[derive(Debug, Default)]
pub struct HandlerSchema {
    test_case: TestCaseSchema,
}

#[derive(Debug, Default)]
pub struct ExampleSchema {
    handler: HandlerSchema,
}

#[derive(Debug, Default)]
pub struct CategorySchema {
    example: ExampleSchema,
}

impl TestCaseSchema {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, value: &Value) -> Vec<SchemaViolation> {
        let mut out = Vec::new();
        self.validate_at(value, "", &mut out);
        out
    }

    fn validate_at(&self, value: &Value, path: &str, out: &mut Vec<SchemaViolation>) {
        let Some(obj) = require_object(value, path, out) else {
            return;
        };
        require_string(obj, "description", path, out);
        require_string(obj, "input", path, out);
        require_string(obj, "expectedOutput", path, out);
    }
}

impl HandlerSchema {
    pub fn new() -> Self {
        Self {
            test_case: TestCaseSchema::new(),
        }
    }

    pub fn validate(&self, value: &Value) -> Vec<SchemaViolation> {
        let mut out = Vec::new();
        self.validate_at(value, "", &mut out);
        out
    }

    fn validate_at(&self, value: &Value, path: &str, out: &mut Vec<SchemaViolation>) {
        let Some(obj) = require_object(value, path, out) else {
            return;
        };
        // `heading` is the one optional field; when present it must be a string.
        optional_string(obj, "heading", path, out);
        require_string(obj, "description", path, out);
        require_string(obj, "route", path, out);
        if let Some(items) = require_array(obj, "testCases", path, out) {
            for (i, item) in items.iter().enumerate() {
                let item_path = join(path, &format!("testCases[{i}]"));
                self.test_case.validate_at(item, &item_path, out);
            }
        }
    }
}

impl ExampleSchema {
    pub fn new() -> Self {
        Self {
            handler: HandlerSchema::new(),
        }
    }

    pub fn validate(&self, value: &Value) -> Vec<SchemaViolation> {
        let mut out = Vec::new();
        self.validate_at(value, "", &mut out);
        out
    }

    fn validate_at(&self, value: &Value, path: &str, out: &mut Vec<SchemaViolation>) {
        let Some(obj) = require_object(value, path, out) else {
            return;
        };
        require_string(obj, "heading", path, out);
        require_string(obj, "description", path, out);
        if let Some(items) = require_array(obj, "handlers", path, out) {
            for (i, item) in items.iter().enumerate() {
                let item_path = join(path, &format!("handlers[{i}]"));
                self.handler.validate_at(item, &item_path, out);
            }
        }
    }
}

impl CategorySchema {
    pub fn new() -> Self {
        Self {
            example: ExampleSchema::new(),
        }
    }

    pub fn validate(&self, value: &Value) -> Vec<SchemaViolation> {
        let mut out = Vec::new();
        self.validate_at(value, "", &mut out);
        out
    }

    fn validate_at(&self, value: &Value, path: &str, out: &mut Vec<SchemaViolation>) {
        let Some(obj) = require_object(value, path, out) else {
            return;
        };
        require_string(obj, "heading", path, out);
        require_string(obj, "description", path, out);
        if let Some(items) = require_array(obj, "examples", path, out) {
            for (i, item) in items.iter().enumerate() {
                let item_path = join(path, &format!("examples[{i}]"));
                self.example.validate_at(item, &item_path, out);
            }
        }
    }
}

/// Validates every category and reports every failure.
///
/// Checks all categories even after the first failure, so one run surfaces
/// all structural defects. Diagnostics go to the log; the return value is
/// the overall pass/fail.
pub fn validate_categories(categories: &[Value]) -> bool {
    let schema = CategorySchema::new();
    let mut successful = true;
    for (i, category) in categories.iter().enumerate() {
        let violations = schema.validate(category);
        if violations.is_empty() {
            continue;
        }
        let heading = category
            .get("heading")
            .and_then(Value::as_str)
            .unwrap_or("no heading");
        let details: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
        error!(
            index = i,
            heading,
            "Schema validation failed for example category: {}",
            details.join("; ")
        );
        successful = false;
    }
    successful
}

fn join(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{path}.{segment}")
    }
}

fn require_object<'a>(
    value: &'a Value,
    path: &str,
    out: &mut Vec<SchemaViolation>,
) -> Option<&'a Map<String, Value>> {
    match value.as_object() {
        Some(obj) => Some(obj),
        None => {
            out.push(SchemaViolation {
                path: path.to_string(),
                message: "expected an object".into(),
            });
            None
        }
    }
}

fn require_string(
    obj: &Map<String, Value>,
    field: &str,
    path: &str,
    out: &mut Vec<SchemaViolation>,
) {
    match obj.get(field) {
        None => out.push(SchemaViolation {
            path: path.to_string(),
            message: format!("missing required field \"{field}\""),
        }),
        Some(Value::String(_)) => {}
        Some(_) => out.push(SchemaViolation {
            path: path.to_string(),
            message: format!("field \"{field}\" must be a string"),
        }),
    }
}

fn optional_string(
    obj: &Map<String, Value>,
    field: &str,
    path: &str,
    out: &mut Vec<SchemaViolation>,
) {
    if let Some(value) = obj.get(field)
        && !value.is_string()
    {
        out.push(SchemaViolation {
            path: path.to_string(),
            message: format!("field \"{field}\" must be a string"),
        });
    }
}

fn require_array<'a>(
    obj: &'a Map<String, Value>,
    field: &str,
    path: &str,
    out: &mut Vec<SchemaViolation>,
) -> Option<&'a Vec<Value>> {
    match obj.get(field) {
        None => {
            out.push(SchemaViolation {
                path: path.to_string(),
                message: format!("missing required field \"{field}\""),
            });
            None
        }
        Some(Value::Array(items)) => Some(items),
        Some(_) => {
            out.push(SchemaViolation {
                path: path.to_string(),
                message: format!("field \"{field}\" must be an array"),
            });
            None
        }
    }
}
