//! Node.js bindings.
//!
//! ```js
//! const { validateBlock, parseBlock } = require('diglot');
//! const errors = validateBlock(response);
//! ```

#[macro_use]
extern crate napi_derive;

use diglot_core::{BlockParser, BlockValidator, DocumentValidator, Grammar};
use napi::{Error, Result, Status};

fn load_grammar(grammar_yaml: Option<String>) -> Result<Grammar> {
    match grammar_yaml {
        Some(yaml) => Grammar::from_yaml(&yaml)
            .map_err(|e| Error::new(Status::InvalidArg, e.to_string())),
        None => Ok(Grammar::standard()),
    }
}

/// Validate one block; an empty array means valid.
#[napi]
pub fn validate_block(block_text: String, grammar_yaml: Option<String>) -> Result<Vec<String>> {
    match grammar_yaml {
        None => Ok(diglot_core::validate_block(&block_text)),
        Some(yaml) => Ok(BlockValidator::new(load_grammar(Some(yaml))?).validate(&block_text)),
    }
}

#[napi]
pub fn strip_echoed_terminators(raw: String) -> String {
    diglot_core::strip_echoed_terminators(&raw)
}

/// Validate a stage file and return its report.
#[napi]
pub fn validate_document(
    text: String,
    source: Option<String>,
    grammar_yaml: Option<String>,
) -> Result<serde_json::Value> {
    let grammar = load_grammar(grammar_yaml)?;
    let report = DocumentValidator::new(grammar)
        .validate(&text, source.unwrap_or_else(|| "<memory>".to_string()));
    serde_json::to_value(&report).map_err(|e| Error::from_reason(e.to_string()))
}

/// Parse a valid block; throws with the diagnostics otherwise.
#[napi]
pub fn parse_block(block_text: String, grammar_yaml: Option<String>) -> Result<serde_json::Value> {
    let grammar = load_grammar(grammar_yaml)?;
    let block = BlockParser::new(grammar)
        .parse(&block_text)
        .map_err(|e| Error::new(Status::InvalidArg, e.to_string()))?;
    serde_json::to_value(&block).map_err(|e| Error::from_reason(e.to_string()))
}
