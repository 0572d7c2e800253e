// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Random baseline runner
//!
//! Generates a seeded random submission from a gold file, verifies it passes
//! the format checker, and by default scores it against the same gold file.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use factcheck_eval::baselines::{write_random_ranking, write_random_veracity};
use factcheck_eval::classification;
use factcheck_eval::diagnostics::LogReporter;
use factcheck_eval::format::{check_submission_file, GrammarMode, SubmissionFormat};
use factcheck_eval::pipeline::{score_ranking_run, score_veracity_run, RunConfig};
use factcheck_eval::ranking;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TaskKind {
    /// Check-worthiness ranking (Task 1)
    Checkworthiness,
    /// Claim veracity classification (Task 2)
    Veracity,
}

#[derive(Parser, Debug)]
#[command(name = "run-baseline")]
#[command(about = "Generate and score a random baseline submission")]
#[command(version)]
struct Args {
    /// Which task to generate a baseline for
    #[arg(long, value_enum)]
    task: TaskKind,

    /// Gold annotation file to derive the submission from
    #[arg(long)]
    gold_file_path: PathBuf,

    /// Where to write the baseline submission
    #[arg(long)]
    output: PathBuf,

    /// Seed for the random generator
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Score the generated submission against the gold file
    #[arg(long, default_value_t = true)]
    score: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut reporter = LogReporter;

    let format = match args.task {
        TaskKind::Checkworthiness => {
            write_random_ranking(&args.gold_file_path, &args.output, args.seed)
                .context("could not generate the ranking baseline")?;
            SubmissionFormat::Ranking(GrammarMode::Sequential)
        }
        TaskKind::Veracity => {
            write_random_veracity(&args.gold_file_path, &args.output, args.seed)
                .context("could not generate the veracity baseline")?;
            SubmissionFormat::Veracity
        }
    };

    if !check_submission_file(&args.output, format, &mut reporter)? {
        bail!("generated baseline {} failed the format check", args.output.display());
    }

    if args.score {
        let config = RunConfig::new(vec![args.gold_file_path.clone()], vec![args.output.clone()]);
        match args.task {
            TaskKind::Checkworthiness => {
                let results = score_ranking_run(&config, format, &mut reporter)?;
                println!("{}", results.format());
                println!("{}", ranking::metrics_description());
            }
            TaskKind::Veracity => {
                let results = score_veracity_run(&config, &mut reporter)?;
                println!("{}", results.format());
                println!("{}", classification::metrics_description());
            }
        }
    }

    Ok(())
}
