// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Multi-file scoring runs
//!
//! Orchestrates one evaluation over N (gold, prediction) file pairs, matched
//! positionally:
//! - validates the pairing and every prediction file's format up front
//! - check-worthiness: scores each pair, then averages metrics across files
//! - veracity: pools all pairs under per-file claim namespaces and computes
//!   one metric set over the combined data
//!
//! Results carry a timestamp and serialize to JSON.

use crate::classification::ClassificationReport;
use crate::datasets::{
    load_ranking_gold, load_ranking_predictions, load_veracity_gold, load_veracity_predictions,
    CompletenessMode, VeracityLabels,
};
use crate::diagnostics::Reporter;
use crate::error::{EvalError, Result};
use crate::format::{check_submission_file, SubmissionFormat};
use crate::ranking::{RankingMetrics, RankingSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// One scoring run over positionally matched gold and prediction files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub gold_paths: Vec<PathBuf>,
    pub pred_paths: Vec<PathBuf>,
    /// Precision@N cutoffs for the ranking task; empty selects the defaults
    pub thresholds: Vec<usize>,
    /// Gold-coverage enforcement for ranking submissions
    pub completeness: CompletenessMode,
}

impl RunConfig {
    pub fn new(gold_paths: Vec<PathBuf>, pred_paths: Vec<PathBuf>) -> Self {
        Self {
            gold_paths,
            pred_paths,
            thresholds: Vec::new(),
            completeness: CompletenessMode::Strict,
        }
    }
}

/// Ranking metrics for one prediction file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingFileResult {
    pub pred_path: PathBuf,
    pub metrics: RankingMetrics,
}

/// Results of a check-worthiness scoring run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingRunResults {
    pub per_file: Vec<RankingFileResult>,
    pub summary: RankingSummary,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

/// Results of a claim-veracity scoring run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VeracityRunResults {
    pub pred_paths: Vec<PathBuf>,
    pub report: ClassificationReport,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

/// Checks the file pairing and every prediction file's format.
///
/// Fails before any metric computation on a count mismatch, a prediction
/// file listed twice, or a grammar violation.
pub fn validate_run(
    config: &RunConfig,
    format: SubmissionFormat,
    reporter: &mut dyn Reporter,
) -> Result<()> {
    if config.gold_paths.len() != config.pred_paths.len() {
        return Err(EvalError::FileCountMismatch {
            gold: config.gold_paths.len(),
            predictions: config.pred_paths.len(),
        });
    }

    let distinct: HashSet<&PathBuf> = config.pred_paths.iter().collect();
    if distinct.len() != config.pred_paths.len() {
        return Err(EvalError::DuplicateKey {
            kind: "prediction file",
            key: "the prediction files should be for different debates".to_string(),
        });
    }

    for pred_path in &config.pred_paths {
        if !check_submission_file(pred_path, format, reporter)? {
            return Err(EvalError::Format {
                path: pred_path.display().to_string(),
            });
        }
    }

    Ok(())
}

/// Scores a check-worthiness run: per-file metrics plus across-file means.
pub fn score_ranking_run(
    config: &RunConfig,
    format: SubmissionFormat,
    reporter: &mut dyn Reporter,
) -> Result<RankingRunResults> {
    validate_run(config, format, reporter)?;
    tracing::info!("Started evaluating {} ranking submission(s)", config.pred_paths.len());

    let mut per_file = Vec::with_capacity(config.pred_paths.len());
    for (gold_path, pred_path) in config.gold_paths.iter().zip(&config.pred_paths) {
        let gold = load_ranking_gold(gold_path)?;
        let scored = load_ranking_predictions(pred_path, &gold, config.completeness, reporter)?;
        per_file.push(RankingFileResult {
            pred_path: pred_path.clone(),
            metrics: RankingMetrics::compute(&gold, &scored, &config.thresholds),
        });
    }

    let summary = RankingSummary::from_metrics(
        &per_file.iter().map(|r| r.metrics.clone()).collect::<Vec<_>>(),
    );

    Ok(RankingRunResults {
        per_file,
        summary,
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Scores a claim-veracity run: all pairs pooled into one confusion matrix.
///
/// Claim numbers are only unique within one debate, so each file pair gets
/// the namespace `file-{index}`; a single pair uses the empty namespace.
pub fn score_veracity_run(
    config: &RunConfig,
    reporter: &mut dyn Reporter,
) -> Result<VeracityRunResults> {
    validate_run(config, SubmissionFormat::Veracity, reporter)?;
    tracing::info!("Started evaluating {} veracity submission(s)", config.pred_paths.len());

    let mut all_gold = VeracityLabels::new();
    let mut all_predictions = VeracityLabels::new();

    for (idx, (gold_path, pred_path)) in
        config.gold_paths.iter().zip(&config.pred_paths).enumerate()
    {
        let namespace = if config.gold_paths.len() == 1 {
            String::new()
        } else {
            format!("file-{}", idx)
        };
        let gold = load_veracity_gold(gold_path, &namespace)?;
        let predictions = load_veracity_predictions(pred_path, &gold, &namespace)?;
        all_gold.extend(gold);
        all_predictions.extend(predictions);
    }

    let report = ClassificationReport::compute(&all_gold, &all_predictions)?;

    Ok(VeracityRunResults {
        pred_paths: config.pred_paths.clone(),
        report,
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Serializes run results as pretty JSON.
pub fn save_results<T: Serialize>(results: &T, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(results)?;
    std::fs::write(output_path, json)?;
    tracing::info!("Results saved to {}", output_path.display());
    Ok(())
}

impl RankingRunResults {
    /// Per-file blocks followed by the averaged summary when the run covers
    /// more than one debate.
    pub fn format(&self) -> String {
        let mut out = String::new();
        for result in &self.per_file {
            let name = result
                .pred_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| result.pred_path.display().to_string());
            out.push_str(&result.metrics.format(&name));
        }
        if self.per_file.len() > 1 {
            out.push_str(&self.summary.format());
        }
        out
    }
}

impl VeracityRunResults {
    pub fn format(&self) -> String {
        self.report.format()
    }
}
