// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Error taxonomy for submission validation and scoring
//!
//! Every fatal condition maps to one variant here; warnings that do not
//! block scoring go through [`crate::diagnostics::Reporter`] instead.

use crate::datasets::Veracity;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EvalError>;

/// Conditions that abort validation or scoring
#[derive(Error, Debug)]
pub enum EvalError {
    /// A submission file violates its task grammar
    #[error("wrong format in submission file {path}")]
    Format { path: String },

    /// The same key appears twice where it must not
    #[error("duplicate {kind}: {key}")]
    DuplicateKey { kind: &'static str, key: String },

    /// Prediction keys do not exactly match the gold keys
    #[error("predictions in {path} do not match the {kind}s of the gold file (missing or extra)")]
    Completeness { kind: &'static str, path: String },

    /// A prediction references a key absent from the gold file
    #[error("no such {kind} in gold file: {key}")]
    Referential { kind: &'static str, key: String },

    /// A per-class metric was requested for a class with no gold instances
    #[error("no gold instances for class {label}")]
    DegenerateClass { label: Veracity },

    /// A field could not be parsed into its typed record
    #[error("{message}")]
    Parse { message: String },

    /// Gold and prediction path lists differ in length
    #[error("got {gold} gold files but {predictions} prediction files")]
    FileCountMismatch { gold: usize, predictions: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
