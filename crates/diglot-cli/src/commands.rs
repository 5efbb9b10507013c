//! Subcommand implementations.
//!
//! Each returns the process exit code: 0 when everything checked out, 1 when
//! the input was rejected. I/O failures are returned as errors.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use diglot_core::{
    BlockParser, BlockReport, BlockValidator, DocumentReport, DocumentValidator, Grammar,
    GrammarError,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::{GrammarFormat, ReportFormat};

/// Load the grammar named by `--grammar`, or the standard catalog.
pub fn load_grammar(path: Option<&Path>) -> Result<Grammar> {
    let Some(path) = path else {
        return Ok(Grammar::standard());
    };

    debug!(path = %path.display(), "Loading grammar");
    Grammar::from_file(path).map_err(|e| match e {
        GrammarError::IoError(_) => {
            anyhow::Error::new(e).context(format!("Failed to read {}", path.display()))
        }
        other => anyhow::anyhow!(
            "Invalid grammar {}:\n  {}",
            path.display(),
            other.problems().join("\n  ")
        ),
    })
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum FileReport {
    Document(DocumentReport),
    Block {
        source: String,
        #[serde(flatten)]
        report: BlockReport,
    },
}

impl FileReport {
    fn is_valid(&self) -> bool {
        match self {
            FileReport::Document(report) => report.is_valid(),
            FileReport::Block { report, .. } => report.is_valid(),
        }
    }
}

pub fn run_validate(
    grammar: &Grammar,
    files: &[PathBuf],
    block: bool,
    format: ReportFormat,
) -> Result<ExitCode> {
    let block_validator = BlockValidator::new(grammar.clone());
    let document_validator = DocumentValidator::new(grammar.clone());

    let mut reports = Vec::with_capacity(files.len());
    for path in files {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let source = path.display().to_string();

        let report = if block {
            FileReport::Block {
                source,
                report: block_validator.report(&text),
            }
        } else {
            FileReport::Document(document_validator.validate(&text, source))
        };
        reports.push(report);
    }

    let ok = reports.iter().all(FileReport::is_valid);
    info!(files = reports.len(), ok, "Validation finished");

    match format {
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        ReportFormat::Text => {
            for report in &reports {
                print_report(report);
            }
        }
    }

    Ok(exit_code(ok))
}

fn print_report(report: &FileReport) {
    match report {
        FileReport::Block { source, report } => {
            if report.is_valid() {
                println!("{}: OK", source);
            } else {
                println!("{}: INVALID ({} errors)", source, report.errors.len());
                for error in &report.errors {
                    println!("  - {}", error);
                }
            }
        }
        FileReport::Document(doc) => {
            let status = if doc.is_valid() { "OK" } else { "INVALID" };
            println!(
                "{}: {} ({} sentences, {} chapter markers, {} directives{})",
                doc.source,
                status,
                doc.sentence_count,
                doc.chapter_marker_count,
                doc.directive_count,
                if doc.complete { ", complete" } else { "" }
            );
            for block in doc.invalid_blocks() {
                if let Some(index) = block.index {
                    println!("  entry {}:", index);
                }
                for error in &block.errors {
                    println!("    - {}", error);
                }
            }
        }
    }
}

pub fn run_parse(grammar: &Grammar, file: &Path, pretty: bool) -> Result<ExitCode> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let parser = BlockParser::new(grammar.clone());
    let document = match parser.parse_document(&text, file.display().to_string()) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("{}: {}", file.display(), e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let json = if pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    println!("{}", json);
    Ok(ExitCode::SUCCESS)
}

pub fn run_grammar(grammar: &Grammar, format: GrammarFormat) -> Result<ExitCode> {
    let rendered = match format {
        GrammarFormat::Yaml => serde_yaml::to_string(grammar)?,
        GrammarFormat::Json => serde_json::to_string_pretty(grammar)?,
    };
    println!("{}", rendered.trim_end());
    Ok(ExitCode::SUCCESS)
}

pub fn run_check_grammar(file: &Path) -> Result<ExitCode> {
    let errors = match Grammar::from_file(file) {
        Ok(_) => Vec::new(),
        Err(GrammarError::IoError(e)) => {
            return Err(e).with_context(|| format!("Failed to read {}", file.display()))
        }
        Err(e) => e.problems(),
    };
    if errors.is_empty() {
        println!("{}: OK", file.display());
    } else {
        println!("{}: INVALID", file.display());
        for error in &errors {
            println!("  - {}", error);
        }
    }
    Ok(exit_code(errors.is_empty()))
}
