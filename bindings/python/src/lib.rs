//! Python module `diglot`.
//!
//! ```python
//! import diglot
//!
//! errors = diglot.validate_block(llm_response)
//! if not errors:
//!     block = json.loads(diglot.parse_block(llm_response))
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use diglot_core::{BlockParser, DocumentValidator, Grammar};

fn load_grammar(grammar_yaml: Option<&str>) -> PyResult<Grammar> {
    match grammar_yaml {
        Some(yaml) => Grammar::from_yaml(yaml).map_err(|e| PyValueError::new_err(e.to_string())),
        None => Ok(Grammar::standard()),
    }
}

/// Validate one LLM response block. Returns the list of errors; empty means valid.
#[pyfunction]
#[pyo3(signature = (block_text, grammar_yaml=None))]
fn validate_block(block_text: &str, grammar_yaml: Option<&str>) -> PyResult<Vec<String>> {
    match grammar_yaml {
        None => Ok(diglot_core::validate_block(block_text)),
        Some(_) => {
            let grammar = load_grammar(grammar_yaml)?;
            Ok(diglot_core::BlockValidator::new(grammar).validate(block_text))
        }
    }
}

/// Remove echoed END_SENTENCE lines from a raw response.
#[pyfunction]
fn strip_echoed_terminators(raw: &str) -> String {
    diglot_core::strip_echoed_terminators(raw)
}

/// Validate a whole stage file. Returns the report as a JSON string.
#[pyfunction]
#[pyo3(signature = (text, source="<memory>", grammar_yaml=None))]
fn validate_document(text: &str, source: &str, grammar_yaml: Option<&str>) -> PyResult<String> {
    let grammar = load_grammar(grammar_yaml)?;
    let report = DocumentValidator::new(grammar).validate(text, source);
    serde_json::to_string(&report).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Parse a valid block into JSON. Raises ValueError listing the errors otherwise.
#[pyfunction]
#[pyo3(signature = (block_text, grammar_yaml=None))]
fn parse_block(block_text: &str, grammar_yaml: Option<&str>) -> PyResult<String> {
    let grammar = load_grammar(grammar_yaml)?;
    let block = BlockParser::new(grammar)
        .parse(block_text)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    serde_json::to_string(&block).map_err(|e| PyValueError::new_err(e.to_string()))
}

#[pymodule]
fn diglot(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(validate_block, m)?)?;
    m.add_function(wrap_pyfunction!(strip_echoed_terminators, m)?)?;
    m.add_function(wrap_pyfunction!(validate_document, m)?)?;
    m.add_function(wrap_pyfunction!(parse_block, m)?)?;
    m.add("END_SENTENCE", diglot_core::END_SENTENCE)?;
    Ok(())
}
