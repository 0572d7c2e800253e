// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Scoring and validation engine for a two-task fact-checking competition
//!
//! This crate provides:
//! - Submission format validation (sequential-score, ranked-list and
//!   claim-label grammars)
//! - Gold and prediction file readers with referential-integrity checks
//! - Ranking metrics for check-worthiness (MAP, RR, R-Precision, P@N)
//! - Classification metrics for claim veracity (confusion matrix, Macro-F1,
//!   MAE, Macro-MAE)
//! - Multi-file scoring runs and seeded random baseline producers

pub mod baselines;
pub mod classification;
pub mod datasets;
pub mod diagnostics;
pub mod error;
pub mod format;
pub mod pipeline;
pub mod ranking;
pub mod url_filter;

pub use classification::{ClassificationReport, ConfusionMatrix};
pub use datasets::{
    Checkworthiness, ClaimId, ClaimNumber, CompletenessMode, LineNumber, ScoredLine, Veracity,
};
pub use diagnostics::{CaptureReporter, Diagnostic, LogReporter, Reporter, Severity};
pub use error::{EvalError, Result};
pub use format::{GrammarMode, SubmissionFormat};
pub use pipeline::{RankingRunResults, RunConfig, VeracityRunResults};
pub use ranking::{RankingMetrics, RankingSummary};
