// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Standalone submission format checker
//!
//! Exits non-zero when any checked file violates its grammar, so scoring
//! scripts can gate on it.

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use factcheck_eval::diagnostics::LogReporter;
use factcheck_eval::format::{check_submission_file, GrammarMode, SubmissionFormat};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Grammar {
    /// line_number\tscore rows, line numbers exactly 1..N in order
    Task1,
    /// bare line numbers ordered by predicted rank
    Task1Ranked,
    /// claim_number\tlabel rows
    Task2,
}

impl Grammar {
    fn format(self) -> SubmissionFormat {
        match self {
            Grammar::Task1 => SubmissionFormat::Ranking(GrammarMode::Sequential),
            Grammar::Task1Ranked => SubmissionFormat::Ranking(GrammarMode::Ranked),
            Grammar::Task2 => SubmissionFormat::Veracity,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "check-format")]
#[command(about = "Check a submission file against a task grammar")]
#[command(version)]
struct Args {
    /// Which grammar to enforce
    #[arg(long, value_enum)]
    grammar: Grammar,

    /// Comma-separated list of submission file paths
    #[arg(long)]
    pred_file_path: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut reporter = LogReporter;

    for path in args.pred_file_path.split(',') {
        let path = PathBuf::from(path.trim());
        if !check_submission_file(&path, args.grammar.format(), &mut reporter)? {
            bail!("wrong format in submission file {}", path.display());
        }
    }

    Ok(())
}
