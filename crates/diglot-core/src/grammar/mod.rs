//! Grammar catalogs.
//!
//! A grammar lists the section markers a sentence block must (and may)
//! contain. It is plain data, loadable from YAML/JSON and schema-checked, so
//! the catalog can be varied without touching the validation algorithm.

mod catalog;
mod schema;

pub use catalog::{markers, Grammar, GrammarError, GrammarFormat, STANDARD_GRAMMAR_VERSION};
pub use schema::{validate_grammar_schema, SchemaError};
