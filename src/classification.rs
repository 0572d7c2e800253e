// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Classification metrics for the claim-veracity task
//!
//! Implements the confusion-matrix-derived metrics:
//! - Accuracy, per-label Precision/Recall, Macro-F1, Macro-Recall
//! - Mean Absolute Error over the ordinal label scale (the official metric)
//! - Macro-averaged MAE
//!
//! Recall-style metrics divide by per-label gold counts, so a gold class with
//! zero instances makes them undefined; those computations return
//! [`EvalError::DegenerateClass`] instead of skipping the class.

use crate::datasets::{Veracity, VeracityLabels};
use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

fn index(label: Veracity) -> usize {
    // report order: true, false, half-true
    Veracity::ALL
        .iter()
        .position(|l| *l == label)
        .unwrap_or_default()
}

/// 3x3 confusion matrix, rows are gold labels and columns predicted ones
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    counts: [[usize; 3]; 3],
}

impl ConfusionMatrix {
    /// Builds the matrix from matching gold and prediction mappings.
    ///
    /// Key equality is enforced by the prediction reader; claims present in
    /// the predictions but not in gold do not occur here.
    pub fn from_labels(gold: &VeracityLabels, predictions: &VeracityLabels) -> Self {
        let mut matrix = Self::default();
        for (claim, predicted) in predictions {
            if let Some(actual) = gold.get(claim) {
                matrix.counts[index(*actual)][index(*predicted)] += 1;
            }
        }
        matrix
    }

    /// Builds the matrix from raw cell counts, rows and columns both in
    /// [`Veracity::ALL`] order.
    pub fn from_counts(counts: [[usize; 3]; 3]) -> Self {
        Self { counts }
    }

    pub fn get(&self, gold: Veracity, predicted: Veracity) -> usize {
        self.counts[index(gold)][index(predicted)]
    }

    /// Number of scored claims, the sum of all cells
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Gold instances of `label` (row sum)
    pub fn gold_count(&self, label: Veracity) -> usize {
        self.counts[index(label)].iter().sum()
    }

    /// Predicted instances of `label` (column sum)
    pub fn predicted_count(&self, label: Veracity) -> usize {
        self.counts.iter().map(|row| row[index(label)]).sum()
    }

    /// Fraction of claims on the diagonal; 0.0 for an empty matrix
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let correct: usize = Veracity::ALL.iter().map(|&l| self.get(l, l)).sum();
        correct as f64 / total as f64
    }

    /// Precision for one label; 0.0 when the label is never predicted
    pub fn precision(&self, label: Veracity) -> f64 {
        let predicted = self.predicted_count(label);
        if predicted == 0 {
            return 0.0;
        }
        self.get(label, label) as f64 / predicted as f64
    }

    /// Recall for one label; a label with no gold instances is fatal
    pub fn recall(&self, label: Veracity) -> Result<f64> {
        let gold = self.gold_count(label);
        if gold == 0 {
            return Err(EvalError::DegenerateClass { label });
        }
        Ok(self.get(label, label) as f64 / gold as f64)
    }

    /// Harmonic mean of precision and recall; 0.0 when both are 0
    pub fn f1(&self, label: Veracity) -> Result<f64> {
        let precision = self.precision(label);
        let recall = self.recall(label)?;
        if precision + recall == 0.0 {
            return Ok(0.0);
        }
        Ok(2.0 * precision * recall / (precision + recall))
    }

    /// Unweighted mean of the per-label F1 scores
    pub fn macro_f1(&self) -> Result<f64> {
        let mut sum = 0.0;
        for &label in &Veracity::ALL {
            sum += self.f1(label)?;
        }
        Ok(sum / Veracity::ALL.len() as f64)
    }

    /// Unweighted mean of the per-label recalls
    pub fn macro_recall(&self) -> Result<f64> {
        let mut sum = 0.0;
        for &label in &Veracity::ALL {
            sum += self.recall(label)?;
        }
        Ok(sum / Veracity::ALL.len() as f64)
    }

    /// Mean ordinal distance between gold and predicted labels, the official
    /// competition metric. A correct call costs 0, any confusion involving
    /// half-true costs 1, a false-true confusion costs 2.
    pub fn mean_absolute_error(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let mut distance_sum = 0.0;
        for &gold in &Veracity::ALL {
            for &predicted in &Veracity::ALL {
                distance_sum += (self.get(gold, predicted) * gold.distance(predicted) as usize) as f64;
            }
        }
        distance_sum / total as f64
    }

    /// MAE computed per gold label and averaged unweighted over labels
    pub fn macro_mae(&self) -> Result<f64> {
        let mut sum = 0.0;
        for &gold in &Veracity::ALL {
            let gold_count = self.gold_count(gold);
            if gold_count == 0 {
                return Err(EvalError::DegenerateClass { label: gold });
            }
            let mut distance_sum = 0.0;
            for &predicted in &Veracity::ALL {
                distance_sum +=
                    (self.get(gold, predicted) * gold.distance(predicted) as usize) as f64;
            }
            sum += distance_sum / gold_count as f64;
        }
        Ok(sum / Veracity::ALL.len() as f64)
    }
}

/// Full metric set for one claim-veracity evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub confusion_matrix: ConfusionMatrix,
    pub mean_absolute_error: f64,
    pub macro_mae: f64,
    pub accuracy: f64,
    pub macro_f1: f64,
    pub macro_recall: f64,
    pub total_claims: usize,
}

impl ClassificationReport {
    /// Computes every metric over matching gold and prediction mappings.
    pub fn compute(gold: &VeracityLabels, predictions: &VeracityLabels) -> Result<Self> {
        let cm = ConfusionMatrix::from_labels(gold, predictions);
        Ok(Self {
            mean_absolute_error: cm.mean_absolute_error(),
            macro_mae: cm.macro_mae()?,
            accuracy: cm.accuracy(),
            macro_f1: cm.macro_f1()?,
            macro_recall: cm.macro_recall()?,
            total_claims: cm.total(),
            confusion_matrix: cm,
        })
    }

    /// Human-readable results block.
    pub fn format(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{:=^90}", " RESULTS ");
        let _ = writeln!(
            out,
            "{:<30}{:.4}     (lower is better)",
            "MEAN ABSOLUTE ERROR (MAE):", self.mean_absolute_error
        );
        let _ = writeln!(
            out,
            "{:<30}{:.4}     (lower is better)",
            "MACRO-AVERAGE MAE:", self.macro_mae
        );
        let _ = writeln!(
            out,
            "{:<30}{:.4}     (higher is better)",
            "ACCURACY:", self.accuracy
        );
        let _ = writeln!(
            out,
            "{:<30}{:.4}     (higher is better)",
            "MACRO-AVERAGE F1:", self.macro_f1
        );
        let _ = writeln!(
            out,
            "{:<30}{:.4}     (higher is better)",
            "MACRO-AVERAGE RECALL:", self.macro_recall
        );

        let _ = writeln!(out, "{:<30}", "CONFUSION MATRIX:");
        let _ = write!(out, "{:10}", "");
        for label in Veracity::ALL {
            let _ = write!(out, "{:>15}", label.as_str());
        }
        out.push('\n');
        for gold in Veracity::ALL {
            let _ = write!(out, "{:<10}", gold.as_str());
            for predicted in Veracity::ALL {
                let _ = write!(out, "{:>15}", self.confusion_matrix.get(gold, predicted));
            }
            out.push('\n');
        }
        out
    }
}

/// Description of the classification metrics, printed after every scoring run.
pub fn metrics_description() -> &'static str {
    "Description of the evaluation metrics:\n\
     !!! THE OFFICIAL METRIC USED FOR THE COMPETITION RANKING IS MEAN ABSOLUTE ERROR !!!\n\
     Mean Absolute Error (MAE) computes the mean \"distance\" between the predicted and gold labels.\n\
     For correct predictions the distance is 0. For mistakes between FALSE and TRUE classes it is 2, and for all other mistakes it is 1.\n\
     Macro-average MAE computes MAE for each of the (gold) classes and takes the average.\n\
     Accuracy computes the percentage of correctly predicted classes.\n\
     Macro-average F1 computes the F1 score for each of the classes and takes their average.\n\
     Macro-average Recall computes Recall for each of the classes and takes its average.\n\
     Confusion Matrix computes the distribution of predicted classes, where rows are true labels and columns are predicted ones."
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasets::{ClaimId, ClaimNumber};

    fn labels(pairs: &[(u16, Veracity)]) -> VeracityLabels {
        pairs
            .iter()
            .map(|&(claim, label)| (ClaimId::new("", ClaimNumber::new(claim).unwrap()), label))
            .collect()
    }

    // rows and columns in true, false, half-true order
    const MIXED: [[usize; 3]; 3] = [[0, 2, 3], [2, 2, 3], [2, 3, 1]];

    #[test]
    fn test_matrix_from_labels_counts_every_claim() {
        let gold = labels(&[
            (1, Veracity::True),
            (2, Veracity::False),
            (3, Veracity::HalfTrue),
            (4, Veracity::True),
        ]);
        let predictions = labels(&[
            (1, Veracity::True),
            (2, Veracity::True),
            (3, Veracity::HalfTrue),
            (4, Veracity::False),
        ]);

        let cm = ConfusionMatrix::from_labels(&gold, &predictions);
        assert_eq!(cm.total(), 4);
        assert_eq!(cm.get(Veracity::True, Veracity::True), 1);
        assert_eq!(cm.get(Veracity::True, Veracity::False), 1);
        assert_eq!(cm.get(Veracity::False, Veracity::True), 1);
        assert_eq!(cm.get(Veracity::HalfTrue, Veracity::HalfTrue), 1);
    }

    #[test]
    fn test_accuracy_pinned() {
        let cm = ConfusionMatrix::from_counts(MIXED);
        assert!((cm.accuracy() - 3.0 / 18.0).abs() < 1e-12);

        let perfect = ConfusionMatrix::from_counts([[4, 0, 0], [0, 2, 0], [0, 0, 7]]);
        assert_eq!(perfect.accuracy(), 1.0);
        assert_eq!(ConfusionMatrix::default().accuracy(), 0.0);
    }

    #[test]
    fn test_per_label_precision_and_recall() {
        let cm = ConfusionMatrix::from_counts(MIXED);

        assert_eq!(cm.precision(Veracity::True), 0.0);
        assert!((cm.precision(Veracity::False) - 2.0 / 7.0).abs() < 1e-12);
        assert!((cm.precision(Veracity::HalfTrue) - 1.0 / 7.0).abs() < 1e-12);

        assert_eq!(cm.recall(Veracity::True).unwrap(), 0.0);
        assert!((cm.recall(Veracity::False).unwrap() - 2.0 / 7.0).abs() < 1e-12);
        assert!((cm.recall(Veracity::HalfTrue).unwrap() - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_macro_f1_pinned() {
        let cm = ConfusionMatrix::from_counts(MIXED);
        // F1(true) = 0, F1(false) = 2/7, F1(half-true) = 2/13
        let expected = (0.0 + 2.0 / 7.0 + 2.0 / 13.0) / 3.0;
        assert!((cm.macro_f1().unwrap() - expected).abs() < 1e-12);

        // every prediction off the diagonal
        let wrong = ConfusionMatrix::from_counts([[0, 1, 0], [1, 0, 0], [1, 0, 0]]);
        assert_eq!(wrong.macro_f1().unwrap(), 0.0);
    }

    #[test]
    fn test_macro_recall_pinned() {
        let cm = ConfusionMatrix::from_counts([[0, 3, 4], [2, 2, 3], [2, 3, 1]]);
        let expected = (0.0 + 2.0 / 7.0 + 1.0 / 6.0) / 3.0;
        assert!((cm.macro_recall().unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_gold_class_is_fatal() {
        // no gold half-true claims
        let cm = ConfusionMatrix::from_counts([[3, 1, 0], [0, 2, 1], [0, 0, 0]]);

        assert!(matches!(
            cm.recall(Veracity::HalfTrue),
            Err(EvalError::DegenerateClass {
                label: Veracity::HalfTrue
            })
        ));
        assert!(cm.macro_f1().is_err());
        assert!(cm.macro_recall().is_err());
        assert!(cm.macro_mae().is_err());
        // MAE and accuracy stay defined
        assert!(cm.mean_absolute_error() >= 0.0);
    }

    #[test]
    fn test_mean_absolute_error() {
        let perfect = ConfusionMatrix::from_counts([[5, 0, 0], [0, 3, 0], [0, 0, 2]]);
        assert_eq!(perfect.mean_absolute_error(), 0.0);

        // every claim one ordinal step off
        let off_by_one = ConfusionMatrix::from_counts([[0, 0, 2], [0, 0, 2], [2, 2, 0]]);
        assert!((off_by_one.mean_absolute_error() - 1.0).abs() < 1e-12);

        // every claim a false-true confusion
        let off_by_two = ConfusionMatrix::from_counts([[0, 3, 0], [3, 0, 0], [0, 0, 1]]);
        assert!((off_by_two.mean_absolute_error() - 12.0 / 7.0).abs() < 1e-12);

        let mixed = ConfusionMatrix::from_counts(MIXED);
        assert!((mixed.mean_absolute_error() - 19.0 / 18.0).abs() < 1e-12);
    }

    #[test]
    fn test_macro_mae() {
        let perfect = ConfusionMatrix::from_counts([[5, 0, 0], [0, 3, 0], [0, 0, 2]]);
        assert_eq!(perfect.macro_mae().unwrap(), 0.0);

        let mixed = ConfusionMatrix::from_counts(MIXED);
        // per gold label: true 7/5, false 7/7, half-true 5/6
        let expected = (7.0 / 5.0 + 1.0 + 5.0 / 6.0) / 3.0;
        assert!((mixed.macro_mae().unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_report_is_deterministic() {
        let gold = labels(&[
            (1, Veracity::True),
            (2, Veracity::False),
            (3, Veracity::HalfTrue),
        ]);
        let predictions = labels(&[
            (1, Veracity::HalfTrue),
            (2, Veracity::False),
            (3, Veracity::True),
        ]);

        let first = ClassificationReport::compute(&gold, &predictions).unwrap();
        let second = ClassificationReport::compute(&gold, &predictions).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first.mean_absolute_error.to_bits(),
            second.mean_absolute_error.to_bits()
        );
    }

    #[test]
    fn test_report_format() {
        let gold = labels(&[
            (1, Veracity::True),
            (2, Veracity::False),
            (3, Veracity::HalfTrue),
        ]);
        let report = ClassificationReport::compute(&gold, &gold).unwrap();
        let text = report.format();

        assert!(text.contains("MEAN ABSOLUTE ERROR (MAE):"));
        assert!(text.contains("CONFUSION MATRIX:"));
        assert!(text.contains("half-true"));
        assert_eq!(report.accuracy, 1.0);
        assert_eq!(report.mean_absolute_error, 0.0);
    }
}
