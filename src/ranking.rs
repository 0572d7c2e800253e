// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Ranking metrics for the check-worthiness task
//!
//! Implements the standard IR metrics over a score-ranked list of transcript
//! lines:
//! - Average Precision (MAP across debates is the official metric)
//! - Reciprocal Rank
//! - R-Precision
//! - Precision@N at caller-chosen thresholds
//!
//! All metrics are computed from the same ranking: predictions sorted by
//! score descending, ties broken by submission order.

use crate::datasets::{LineNumber, RankingGold, ScoredLine};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Default Precision@N cutoffs; the ranking length is appended at runtime
pub const MAIN_THRESHOLDS: [usize; 6] = [1, 3, 5, 10, 20, 50];

/// Sorts predictions by score descending, preserving submission order
/// between equal scores.
pub fn rank_by_score(scored: &[ScoredLine]) -> Vec<LineNumber> {
    let mut ordered: Vec<ScoredLine> = scored.to_vec();
    ordered.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    ordered.into_iter().map(|s| s.line).collect()
}

/// Precision@k for every k in 1..=len(ranked), as one cumulative vector.
pub fn cumulative_precisions(gold: &RankingGold, ranked: &[LineNumber]) -> Vec<f64> {
    let mut precisions = Vec::with_capacity(ranked.len());
    let mut num_correct = 0usize;

    for (i, line) in ranked.iter().enumerate() {
        if gold.get(line).is_some_and(|label| label.is_worthy()) {
            num_correct += 1;
        }
        precisions.push(num_correct as f64 / (i + 1) as f64);
    }

    precisions
}

/// Average Precision: precision at each worthy line's rank, summed and
/// divided by the total number of worthy gold lines. 0.0 when the gold file
/// has no worthy lines.
pub fn average_precision(gold: &RankingGold, ranked: &[LineNumber]) -> f64 {
    let num_positive = gold.values().filter(|label| label.is_worthy()).count();
    if num_positive == 0 {
        return 0.0;
    }

    let mut precision_sum = 0.0;
    let mut num_correct = 0usize;

    for (i, line) in ranked.iter().enumerate() {
        if gold.get(line).is_some_and(|label| label.is_worthy()) {
            num_correct += 1;
            precision_sum += num_correct as f64 / (i + 1) as f64;
        }
    }

    precision_sum / num_positive as f64
}

/// Reciprocal of the rank of the first worthy line; 0.0 if none is ranked.
pub fn reciprocal_rank(gold: &RankingGold, ranked: &[LineNumber]) -> f64 {
    for (i, line) in ranked.iter().enumerate() {
        if gold.get(line).is_some_and(|label| label.is_worthy()) {
            return 1.0 / (i + 1) as f64;
        }
    }
    0.0
}

/// Precision@N reported at one cutoff
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPrecision {
    pub threshold: usize,
    pub precision: f64,
}

/// All ranking metrics for one (gold, prediction) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingMetrics {
    pub average_precision: f64,
    pub reciprocal_rank: f64,
    pub r_precision: f64,
    /// Count of worthy lines in the gold file (the R of R-Precision)
    pub num_relevant: usize,
    pub precision_at: Vec<ThresholdPrecision>,
}

impl RankingMetrics {
    /// Computes every metric over the score-descending ranking of `scored`.
    ///
    /// An empty `thresholds` selects [`MAIN_THRESHOLDS`] plus the ranking
    /// length; thresholds beyond the ranking length are clamped to it.
    pub fn compute(gold: &RankingGold, scored: &[ScoredLine], thresholds: &[usize]) -> Self {
        let ranked = rank_by_score(scored);
        let precisions = cumulative_precisions(gold, &ranked);
        let num_relevant = gold.values().filter(|label| label.is_worthy()).count();

        let thresholds: Vec<usize> = if thresholds.is_empty() {
            MAIN_THRESHOLDS
                .iter()
                .copied()
                .chain(std::iter::once(ranked.len()))
                .collect()
        } else {
            thresholds.to_vec()
        };

        let precision_at_index = |k: usize| -> f64 {
            let clamped = k.min(precisions.len());
            if clamped == 0 {
                0.0
            } else {
                precisions[clamped - 1]
            }
        };

        let precision_at = thresholds
            .iter()
            .map(|&threshold| ThresholdPrecision {
                threshold,
                precision: precision_at_index(threshold),
            })
            .collect();

        Self {
            average_precision: average_precision(gold, &ranked),
            reciprocal_rank: reciprocal_rank(gold, &ranked),
            r_precision: precision_at_index(num_relevant),
            num_relevant,
            precision_at,
        }
    }

    /// Human-readable results block for one prediction file.
    pub fn format(&self, name: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{:=^90}", format!(" RESULTS for {} ", name));
        let _ = writeln!(out, "{:<30}{:.4}", "AVERAGE PRECISION:", self.average_precision);
        let _ = writeln!(out, "{:<30}{:.4}", "RECIPROCAL RANK:", self.reciprocal_rank);
        let _ = writeln!(
            out,
            "{:<30}{:.4}",
            format!("R-PRECISION (R={}):", self.num_relevant),
            self.r_precision
        );
        out.push_str(&format_thresholded("PRECISION@N:", &self.precision_at));
        out
    }
}

/// Arithmetic means of the per-file ranking metrics across one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingSummary {
    /// Mean Average Precision, the official competition metric
    pub mean_average_precision: f64,
    pub mean_reciprocal_rank: f64,
    pub mean_r_precision: f64,
    pub mean_precision_at: Vec<ThresholdPrecision>,
}

impl RankingSummary {
    /// Averages each metric over the per-file results. Precision@N is
    /// averaged per threshold, over the thresholds every file reports.
    pub fn from_metrics(per_file: &[RankingMetrics]) -> Self {
        let count = per_file.len().max(1) as f64;

        let shared_thresholds: Vec<usize> = per_file
            .first()
            .map(|first| {
                first
                    .precision_at
                    .iter()
                    .map(|tp| tp.threshold)
                    .filter(|t| {
                        per_file
                            .iter()
                            .all(|m| m.precision_at.iter().any(|tp| tp.threshold == *t))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let mean_precision_at = shared_thresholds
            .into_iter()
            .map(|threshold| ThresholdPrecision {
                threshold,
                precision: per_file
                    .iter()
                    .flat_map(|m| m.precision_at.iter())
                    .filter(|tp| tp.threshold == threshold)
                    .map(|tp| tp.precision)
                    .sum::<f64>()
                    / count,
            })
            .collect();

        Self {
            mean_average_precision: per_file.iter().map(|m| m.average_precision).sum::<f64>()
                / count,
            mean_reciprocal_rank: per_file.iter().map(|m| m.reciprocal_rank).sum::<f64>() / count,
            mean_r_precision: per_file.iter().map(|m| m.r_precision).sum::<f64>() / count,
            mean_precision_at,
        }
    }

    /// Human-readable averaged results block.
    pub fn format(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{:=^90}", " AVERAGED RESULTS ");
        let _ = writeln!(
            out,
            "{:<30}{:.4}",
            "MEAN AVERAGE PRECISION (MAP):", self.mean_average_precision
        );
        let _ = writeln!(out, "{:<30}{:.4}", "MEAN RECIPROCAL RANK:", self.mean_reciprocal_rank);
        let _ = writeln!(out, "{:<30}{:.4}", "MEAN R-PRECISION:", self.mean_r_precision);
        out.push_str(&format_thresholded("MEAN PRECISION@N:", &self.mean_precision_at));
        out
    }
}

fn format_thresholded(title: &str, values: &[ThresholdPrecision]) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:<30}", title);
    for tp in values {
        let _ = write!(out, "@{:<9}", tp.threshold);
    }
    out.push('\n');
    let _ = write!(out, "{:<30}", "");
    for tp in values {
        let _ = write!(out, "{:<10.4}", tp.precision);
    }
    out.push('\n');
    out
}

/// Description of the ranking metrics, printed after every scoring run.
pub fn metrics_description() -> &'static str {
    "Description of the evaluation metrics:\n\
     !!! THE OFFICIAL METRIC USED FOR THE COMPETITION RANKING IS MEAN AVERAGE PRECISION (MAP) !!!\n\
     R-Precision is Precision at R, where R is the number of relevant line_numbers for the evaluated set.\n\
     Average Precision is the precision@N, estimated only @ each relevant line_number and then averaged over the number of relevant line_numbers.\n\
     Reciprocal Rank is the reciprocal of the rank of the first relevant line_number in the list of predictions sorted by score (descendingly).\n\
     Precision@N is precision estimated for the first N line_numbers in the provided ranked list.\n\
     The MEAN versions of each metric are provided to average over multiple debates (each with separate prediction file)."
}
