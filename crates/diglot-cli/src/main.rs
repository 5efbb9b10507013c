//! Diglot CLI entry point.

mod cli;
mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Commands};

/// Exit status for I/O and configuration failures.
const EXIT_FAILURE: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("diglot={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let grammar = || commands::load_grammar(cli.grammar.as_deref());

    match &cli.command {
        Commands::Validate {
            files,
            block,
            format,
        } => commands::run_validate(&grammar()?, files, *block, *format),

        Commands::Parse { file, pretty } => commands::run_parse(&grammar()?, file, *pretty),

        Commands::Grammar { format } => commands::run_grammar(&grammar()?, *format),

        // Checks its own argument; the active grammar is irrelevant.
        Commands::CheckGrammar { file } => commands::run_check_grammar(file),
    }
}
