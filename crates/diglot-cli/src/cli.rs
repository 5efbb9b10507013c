//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Diglot - validate LLM-generated sentence blocks
///
/// Checks the section-marker format produced by the stage-2 LLM pass and
/// reads accepted blocks into JSON.
#[derive(Parser, Debug)]
#[command(name = "diglot")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Grammar file (YAML or JSON) replacing the standard marker catalog
    #[arg(short, long, global = true, env = "DIGLOT_GRAMMAR")]
    pub grammar: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate stage output files
    Validate {
        /// Files to validate
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Treat each file as a single block instead of a stage file
        #[arg(long)]
        block: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },

    /// Parse a stage file into JSON
    Parse {
        file: PathBuf,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Print the active grammar
    Grammar {
        #[arg(short, long, value_enum, default_value_t = GrammarFormat::Yaml)]
        format: GrammarFormat,
    },

    /// Check a grammar file against the schema and structural rules
    CheckGrammar { file: PathBuf },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrammarFormat {
    Yaml,
    Json,
}
