//! Schema check for grammar documents.
//!
//! Grammar files are checked against `schema/grammar.schema.json` before they
//! are deserialized, so a misspelled key or a marker missing its `::` is
//! reported with the path of the offending value instead of a serde error.

use std::sync::OnceLock;

use serde_json::Value;
use thiserror::Error;

const GRAMMAR_SCHEMA: &str = include_str!("../../../../schema/grammar.schema.json");

static COMPILED: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The embedded schema itself failed to compile.
    #[error("Grammar schema unavailable: {0}")]
    Unavailable(String),

    #[error("{} schema violation(s): {}", .0.len(), .0.join("; "))]
    Violations(Vec<String>),
}

impl SchemaError {
    /// One line per problem, suitable for listing to a user.
    pub fn violations(&self) -> Vec<String> {
        match self {
            SchemaError::Violations(violations) => violations.clone(),
            SchemaError::Unavailable(_) => vec![self.to_string()],
        }
    }
}

fn compiled() -> Result<&'static jsonschema::Validator, SchemaError> {
    COMPILED
        .get_or_init(|| {
            let schema: Value = serde_json::from_str(GRAMMAR_SCHEMA).map_err(|e| e.to_string())?;
            jsonschema::options().build(&schema).map_err(|e| e.to_string())
        })
        .as_ref()
        .map_err(|e| SchemaError::Unavailable(e.clone()))
}

/// Check a grammar document, before deserialization.
///
/// Each violation reads `<json pointer>: <message>`, with `(root)` standing in
/// for the empty pointer.
pub fn validate_grammar_schema(document: &Value) -> Result<(), SchemaError> {
    let violations: Vec<String> = compiled()?
        .iter_errors(document)
        .map(|e| {
            let path = e.instance_path.to_string();
            let path = if path.is_empty() { "(root)" } else { path.as_str() };
            format!("{}: {}", path, e)
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::Violations(violations))
    }
}
