// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Submission scoring CLI
//!
//! Usage:
//!   score-submissions checkworthiness --gold-file-path gold.txt --pred-file-path pred.txt
//!   score-submissions veracity --gold-file-path g1.txt,g2.txt --pred-file-path p1.txt,p2.txt

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use factcheck_eval::classification;
use factcheck_eval::datasets::CompletenessMode;
use factcheck_eval::diagnostics::LogReporter;
use factcheck_eval::format::{GrammarMode, SubmissionFormat};
use factcheck_eval::pipeline::{
    save_results, score_ranking_run, score_veracity_run, RunConfig,
};
use factcheck_eval::ranking;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "score-submissions")]
#[command(about = "Score competition submissions against gold annotation files")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand, Debug)]
enum Task {
    /// Rank debate lines by check-worthiness (Task 1)
    Checkworthiness {
        /// Comma-separated list of gold annotation file paths
        #[arg(long)]
        gold_file_path: String,

        /// Comma-separated list of prediction file paths, matched by position
        #[arg(long)]
        pred_file_path: String,

        /// Comma-separated Precision@N cutoffs (default: 1,3,5,10,20,50 and
        /// the ranking length)
        #[arg(long)]
        thresholds: Option<String>,

        /// Only warn when predictions do not cover every gold line
        #[arg(long)]
        lenient: bool,

        /// Write the run results as JSON to this path
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Classify fact-checked claims by veracity (Task 2)
    Veracity {
        /// Comma-separated list of gold annotation file paths
        #[arg(long)]
        gold_file_path: String,

        /// Comma-separated list of prediction file paths, matched by position
        #[arg(long)]
        pred_file_path: String,

        /// Write the run results as JSON to this path
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn split_paths(list: &str) -> Vec<PathBuf> {
    list.split(',')
        .map(|path| PathBuf::from(path.trim()))
        .collect()
}

fn parse_thresholds(list: &str) -> Result<Vec<usize>> {
    list.split(',')
        .map(|value| {
            value
                .trim()
                .parse::<usize>()
                .with_context(|| format!("invalid threshold {:?}", value))
        })
        .collect()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut reporter = LogReporter;

    match args.task {
        Task::Checkworthiness {
            gold_file_path,
            pred_file_path,
            thresholds,
            lenient,
            output,
        } => {
            let mut config = RunConfig::new(split_paths(&gold_file_path), split_paths(&pred_file_path));
            if let Some(thresholds) = thresholds {
                config.thresholds = parse_thresholds(&thresholds)?;
            }
            if lenient {
                config.completeness = CompletenessMode::Lenient;
            }

            tracing::info!("Started evaluating results for the check-worthiness task ...");
            let results = score_ranking_run(
                &config,
                SubmissionFormat::Ranking(GrammarMode::Sequential),
                &mut reporter,
            )
            .context("scoring the check-worthiness run failed")?;

            println!("{}", results.format());
            println!("{}", ranking::metrics_description());

            if let Some(output) = output {
                save_results(&results, &output)
                    .with_context(|| format!("could not write {}", output.display()))?;
            }
        }
        Task::Veracity {
            gold_file_path,
            pred_file_path,
            output,
        } => {
            let config = RunConfig::new(split_paths(&gold_file_path), split_paths(&pred_file_path));

            tracing::info!("Started evaluating results for the veracity task ...");
            let results = score_veracity_run(&config, &mut reporter)
                .context("scoring the veracity run failed")?;

            println!("{}", results.format());
            println!("{}", classification::metrics_description());

            if let Some(output) = output {
                save_results(&results, &output)
                    .with_context(|| format!("could not write {}", output.display()))?;
            }
        }
    }

    Ok(())
}
