//! Marker catalog parsing from YAML/JSON.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::schema::{validate_grammar_schema, SchemaError};

/// Well-known section markers of the sentence block format.
pub mod markers {
    pub const ADV_S: &str = "AdvS::";
    pub const SIM_S: &str = "SimS::";
    pub const SIM_E: &str = "SimE::";
    pub const SIM_S_SEGMENTS: &str = "SimS_Segments::";
    pub const PHRASE_ALIGN: &str = "PHRASE_ALIGN::";
    pub const SIM_SL: &str = "SimSL::";
    pub const ADV_SL: &str = "AdvSL::";
    pub const DIGLOT_MAP: &str = "DIGLOT_MAP::";
    pub const LOCKED_PHRASE: &str = "LOCKED_PHRASE::";
}

/// Version stamped on the standard grammar.
pub const STANDARD_GRAMMAR_VERSION: &str = "1.0";

/// Errors that can occur when loading a grammar.
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("Failed to read grammar file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Grammar does not match schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("Grammar validation failed: {0}")]
    ValidationError(String),
}

impl GrammarError {
    /// One line per problem: every schema violation, or the error itself.
    pub fn problems(&self) -> Vec<String> {
        match self {
            GrammarError::Schema(err) => err.violations(),
            other => vec![other.to_string()],
        }
    }
}

/// Serialization of a grammar document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrammarFormat {
    Yaml,
    Json,
}

impl GrammarFormat {
    /// `.json` files are JSON; anything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            GrammarFormat::Json
        } else {
            GrammarFormat::Yaml
        }
    }
}

/// The marker catalog a block is validated against.
///
/// Required markers must each appear exactly once and in the listed order.
/// Optional markers may appear at most once, anywhere.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Grammar {
    /// Version of this grammar (`<major>.<minor>`)
    pub grammar_version: String,

    /// Markers every block must contain, in mandatory order
    pub required_markers: Vec<String>,

    /// Markers a block may contain at most once
    #[serde(default)]
    pub optional_markers: Vec<String>,
}

impl Default for Grammar {
    fn default() -> Self {
        Self::standard()
    }
}

impl Grammar {
    /// The catalog the stage-two prompts ask the LLM to produce.
    pub fn standard() -> Self {
        use markers::*;

        Self {
            grammar_version: STANDARD_GRAMMAR_VERSION.to_string(),
            required_markers: [
                ADV_S,
                SIM_S,
                SIM_E,
                SIM_S_SEGMENTS,
                PHRASE_ALIGN,
                SIM_SL,
                ADV_SL,
                DIGLOT_MAP,
            ]
            .iter()
            .map(|m| m.to_string())
            .collect(),
            optional_markers: vec![LOCKED_PHRASE.to_string()],
        }
    }

    /// Parse a grammar document.
    ///
    /// The document is checked against the grammar schema first, then
    /// deserialized, then held to the structural rules of [`Grammar::validate`].
    pub fn parse(content: &str, format: GrammarFormat) -> Result<Self, GrammarError> {
        let document: serde_json::Value = match format {
            GrammarFormat::Yaml => serde_yaml::from_str(content)?,
            GrammarFormat::Json => serde_json::from_str(content)?,
        };
        validate_grammar_schema(&document)?;

        let grammar: Grammar = serde_json::from_value(document)?;
        grammar.validate()?;
        Ok(grammar)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, GrammarError> {
        Self::parse(yaml, GrammarFormat::Yaml)
    }

    pub fn from_json(json: &str) -> Result<Self, GrammarError> {
        Self::parse(json, GrammarFormat::Json)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, GrammarError> {
        Self::parse(&fs::read_to_string(path)?, GrammarFormat::Yaml)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, GrammarError> {
        Self::parse(&fs::read_to_string(path)?, GrammarFormat::Json)
    }

    /// Load a grammar file, choosing the format from its extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GrammarError> {
        let path = path.as_ref();
        Self::parse(&fs::read_to_string(path)?, GrammarFormat::from_path(path))
    }

    /// Required markers followed by optional markers.
    ///
    /// This is the boundary set used when extracting section content.
    pub fn all_markers(&self) -> Vec<String> {
        self.required_markers
            .iter()
            .chain(self.optional_markers.iter())
            .cloned()
            .collect()
    }

    /// Whether the grammar lists `marker` at all.
    pub fn declares(&self, marker: &str) -> bool {
        self.is_required(marker) || self.optional_markers.iter().any(|m| m == marker)
    }

    /// Whether `marker` is one of the required markers.
    pub fn is_required(&self, marker: &str) -> bool {
        self.required_markers.iter().any(|m| m == marker)
    }

    /// Validate the grammar structure.
    pub fn validate(&self) -> Result<(), GrammarError> {
        if self.grammar_version.trim().is_empty() {
            return Err(GrammarError::ValidationError(
                "grammar_version must not be empty".to_string(),
            ));
        }

        if self.required_markers.is_empty() {
            return Err(GrammarError::ValidationError(
                "at least one required marker is needed".to_string(),
            ));
        }

        for marker in self.required_markers.iter().chain(self.optional_markers.iter()) {
            if marker.trim() != marker || marker.len() <= 2 || !marker.ends_with("::") {
                return Err(GrammarError::ValidationError(format!(
                    "Invalid marker '{}': expected a name followed by '::'",
                    marker
                )));
            }
        }

        self.validate_unique_markers()
    }

    /// Ensure no marker is listed twice across both catalogs.
    fn validate_unique_markers(&self) -> Result<(), GrammarError> {
        let mut seen = HashSet::new();

        for marker in self.required_markers.iter().chain(self.optional_markers.iter()) {
            if !seen.insert(marker) {
                return Err(GrammarError::ValidationError(format!(
                    "Duplicate marker: {}",
                    marker
                )));
            }
        }

        Ok(())
    }
}
