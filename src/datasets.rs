// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Typed records and file readers for debate transcripts and submissions
//!
//! Gold files are tab-separated transcript annotations (4 columns for the
//! ranking task, 6 for the veracity task). Submissions are the two-column
//! files produced by participants. The readers build the in-memory mappings
//! the scorers consume and enforce referential integrity against gold keys.

use crate::diagnostics::Reporter;
use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

/// Identifiers in both tasks are bounded by the submission grammar
const MAX_ID: u16 = 9999;

/// Identifies one utterance within a debate transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineNumber(u16);

impl LineNumber {
    pub fn new(value: u16) -> Result<Self> {
        if value == 0 || value > MAX_ID {
            return Err(EvalError::Parse {
                message: format!("line number {} out of range 1..={}", value, MAX_ID),
            });
        }
        Ok(Self(value))
    }

    pub fn get(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for LineNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LineNumber {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self> {
        let value: u16 = s.trim().parse().map_err(|_| EvalError::Parse {
            message: format!("invalid line number {:?}", s),
        })?;
        Self::new(value)
    }
}

/// Identifies a fact-checked claim within one transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClaimNumber(u16);

impl ClaimNumber {
    pub fn new(value: u16) -> Result<Self> {
        if value == 0 || value > MAX_ID {
            return Err(EvalError::Parse {
                message: format!("claim number {} out of range 1..={}", value, MAX_ID),
            });
        }
        Ok(Self(value))
    }

    pub fn get(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for ClaimNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ClaimNumber {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self> {
        let value: u16 = s.trim().parse().map_err(|_| EvalError::Parse {
            message: format!("invalid claim number {:?}", s),
        })?;
        Self::new(value)
    }
}

/// Claim identity within a scoring run
///
/// Raw claim numbers are only unique within one transcript; multi-file runs
/// namespace them with a per-file tag before pooling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClaimId {
    pub namespace: String,
    pub number: ClaimNumber,
}

impl ClaimId {
    pub fn new(namespace: impl Into<String>, number: ClaimNumber) -> Self {
        Self {
            namespace: namespace.into(),
            number,
        }
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.number)
        } else {
            write!(f, "{}:{}", self.namespace, self.number)
        }
    }
}

/// Binary check-worthiness judgment attached to every transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Checkworthiness {
    /// The utterance merits fact-checking
    Worthy,
    /// The utterance does not
    NotWorthy,
}

impl Checkworthiness {
    /// Gold files encode the judgment as 1 or 0
    pub fn from_binary(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Checkworthiness::Worthy),
            0 => Ok(Checkworthiness::NotWorthy),
            other => Err(EvalError::Parse {
                message: format!("check-worthiness label must be 0 or 1, got {}", other),
            }),
        }
    }

    pub fn is_worthy(&self) -> bool {
        matches!(self, Checkworthiness::Worthy)
    }
}

impl FromStr for Checkworthiness {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self> {
        let value: u8 = s.trim().parse().map_err(|_| EvalError::Parse {
            message: format!("invalid check-worthiness label {:?}", s),
        })?;
        Self::from_binary(value)
    }
}

/// Truthfulness class for a fact-checked claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Veracity {
    True,
    False,
    HalfTrue,
}

impl Veracity {
    /// All classes, in report order
    pub const ALL: [Veracity; 3] = [Veracity::True, Veracity::False, Veracity::HalfTrue];

    /// Canonical lower-case form
    pub fn as_str(&self) -> &'static str {
        match self {
            Veracity::True => "true",
            Veracity::False => "false",
            Veracity::HalfTrue => "half-true",
        }
    }

    /// Position on the ordinal truthfulness scale
    pub fn ordinal(&self) -> u8 {
        match self {
            Veracity::False => 0,
            Veracity::HalfTrue => 1,
            Veracity::True => 2,
        }
    }

    /// Absolute ordinal distance: a false-true confusion costs 2, any
    /// confusion involving half-true costs 1
    pub fn distance(&self, other: Veracity) -> u8 {
        self.ordinal().abs_diff(other.ordinal())
    }
}

impl fmt::Display for Veracity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Veracity {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "true" => Ok(Veracity::True),
            "false" => Ok(Veracity::False),
            "half-true" => Ok(Veracity::HalfTrue),
            other => Err(EvalError::Parse {
                message: format!("unknown veracity label {:?}", other),
            }),
        }
    }
}

/// One submission row for the ranking task
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredLine {
    pub line: LineNumber,
    pub score: f64,
}

/// How strictly the ranking prediction reader enforces gold coverage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletenessMode {
    /// Prediction keys must equal gold keys exactly
    Strict,
    /// Missing gold lines only warn; present lines are scored
    Lenient,
}

/// Gold mapping for the ranking task
pub type RankingGold = HashMap<LineNumber, Checkworthiness>;

/// Gold or prediction mapping for the veracity task
pub type VeracityLabels = HashMap<ClaimId, Veracity>;

/// Reads a 4-column transcript annotation file: line number, speaker, text,
/// binary check-worthiness label.
pub fn load_ranking_gold(path: &Path) -> Result<RankingGold> {
    tracing::info!("Reading gold annotations from {}", path.display());

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut gold = RankingGold::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let fields: Vec<&str> = line.trim().split('\t').collect();
        if fields.len() != 4 {
            return Err(EvalError::Parse {
                message: format!(
                    "{}:{}: expected 4 tab-separated fields, found {}",
                    path.display(),
                    idx + 1,
                    fields.len()
                ),
            });
        }
        let number: LineNumber = fields[0].parse()?;
        let label: Checkworthiness = fields[3].parse()?;
        gold.insert(number, label);
    }

    Ok(gold)
}

/// Reads a two-column `line_number\tscore` submission, in file order.
///
/// Every line number must exist in `gold`. Under [`CompletenessMode::Strict`]
/// the submission must also cover every gold line; under
/// [`CompletenessMode::Lenient`] missing lines only produce a warning.
pub fn load_ranking_predictions(
    path: &Path,
    gold: &RankingGold,
    completeness: CompletenessMode,
    reporter: &mut dyn Reporter,
) -> Result<Vec<ScoredLine>> {
    tracing::info!("Reading predicted ranking from {}", path.display());

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut scored = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let fields: Vec<&str> = line.trim().split('\t').collect();
        if fields.len() != 2 {
            return Err(EvalError::Parse {
                message: format!(
                    "{}:{}: expected line number and score, found {} fields",
                    path.display(),
                    idx + 1,
                    fields.len()
                ),
            });
        }
        let number: LineNumber = fields[0].parse()?;
        let score: f64 = fields[1].trim().parse().map_err(|_| EvalError::Parse {
            message: format!("{}:{}: invalid score {:?}", path.display(), idx + 1, fields[1]),
        })?;

        if !gold.contains_key(&number) {
            return Err(EvalError::Referential {
                kind: "line number",
                key: number.to_string(),
            });
        }
        scored.push(ScoredLine { line: number, score });
    }

    let covered: HashSet<LineNumber> = scored.iter().map(|s| s.line).collect();
    let missing = gold.keys().filter(|k| !covered.contains(k)).count();
    if missing > 0 {
        match completeness {
            CompletenessMode::Strict => {
                return Err(EvalError::Completeness {
                    kind: "line number",
                    path: path.display().to_string(),
                });
            }
            CompletenessMode::Lenient => {
                reporter.warning(format!(
                    "{} line numbers from the gold file are missing in {}",
                    missing,
                    path.display()
                ));
            }
        }
    }

    Ok(scored)
}

/// Reads a 6-column annotated transcript: line number, speaker, text, claim
/// number (or the literal "N/A"), normalized claim, veracity label. Rows
/// without a claim are skipped.
///
/// `namespace` tags every claim key; multi-file runs pass a distinct tag per
/// file so pooled keys stay unique.
pub fn load_veracity_gold(path: &Path, namespace: &str) -> Result<VeracityLabels> {
    tracing::info!("Reading gold claim labels from {}", path.display());

    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut gold = VeracityLabels::new();

    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() < 6 {
            return Err(EvalError::Parse {
                message: format!(
                    "{}:{}: expected 6 tab-separated fields, found {}",
                    path.display(),
                    idx + 1,
                    record.len()
                ),
            });
        }
        let claim_field = record.get(3).unwrap_or("");
        if claim_field == "N/A" {
            continue;
        }
        let number: ClaimNumber = claim_field.parse()?;
        let label: Veracity = record.get(5).unwrap_or("").parse()?;
        gold.insert(ClaimId::new(namespace, number), label);
    }

    Ok(gold)
}

/// Reads a two-column `claim_number\tlabel` submission, namespaced the same
/// way as its gold file.
///
/// Every claim must exist in `gold`, repeated claims must agree on their
/// label, and the submission must cover every gold claim.
pub fn load_veracity_predictions(
    path: &Path,
    gold: &VeracityLabels,
    namespace: &str,
) -> Result<VeracityLabels> {
    tracing::info!("Reading predicted claim labels from {}", path.display());

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut predictions = VeracityLabels::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let fields: Vec<&str> = line.trim().split('\t').collect();
        if fields.len() != 2 {
            return Err(EvalError::Parse {
                message: format!(
                    "{}:{}: expected claim number and label, found {} fields",
                    path.display(),
                    idx + 1,
                    fields.len()
                ),
            });
        }
        let number: ClaimNumber = fields[0].parse()?;
        let label: Veracity = fields[1].parse()?;
        let id = ClaimId::new(namespace, number);

        if !gold.contains_key(&id) {
            return Err(EvalError::Referential {
                kind: "claim number",
                key: id.to_string(),
            });
        }
        if let Some(previous) = predictions.insert(id.clone(), label) {
            if previous != label {
                return Err(EvalError::DuplicateKey {
                    kind: "claim number with conflicting labels",
                    key: id.to_string(),
                });
            }
        }
    }

    if gold.keys().any(|k| !predictions.contains_key(k)) {
        return Err(EvalError::Completeness {
            kind: "claim number",
            path: path.display().to_string(),
        });
    }

    Ok(predictions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CaptureReporter;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_line_number_bounds() {
        assert!(LineNumber::new(0).is_err());
        assert!(LineNumber::new(10000).is_err());
        assert_eq!(LineNumber::new(1).unwrap().get(), 1);
        assert_eq!(LineNumber::new(9999).unwrap().get(), 9999);
        assert_eq!("42".parse::<LineNumber>().unwrap().get(), 42);
        assert!("abc".parse::<LineNumber>().is_err());
        assert!("-3".parse::<LineNumber>().is_err());
    }

    #[test]
    fn test_veracity_parsing_is_case_insensitive() {
        assert_eq!("TRUE".parse::<Veracity>().unwrap(), Veracity::True);
        assert_eq!("True".parse::<Veracity>().unwrap(), Veracity::True);
        assert_eq!("half-true".parse::<Veracity>().unwrap(), Veracity::HalfTrue);
        assert_eq!("HALF-TRUE".parse::<Veracity>().unwrap(), Veracity::HalfTrue);
        assert!("mostly-true".parse::<Veracity>().is_err());
        assert_eq!(Veracity::HalfTrue.to_string(), "half-true");
    }

    #[test]
    fn test_veracity_ordinal_distance() {
        assert_eq!(Veracity::True.distance(Veracity::False), 2);
        assert_eq!(Veracity::False.distance(Veracity::True), 2);
        assert_eq!(Veracity::HalfTrue.distance(Veracity::True), 1);
        assert_eq!(Veracity::HalfTrue.distance(Veracity::False), 1);
        assert_eq!(Veracity::True.distance(Veracity::True), 0);
    }

    #[test]
    fn test_checkworthiness_labels() {
        assert!(Checkworthiness::from_binary(1).unwrap().is_worthy());
        assert!(!Checkworthiness::from_binary(0).unwrap().is_worthy());
        assert!(Checkworthiness::from_binary(2).is_err());
        assert!("1".parse::<Checkworthiness>().unwrap().is_worthy());
    }

    #[test]
    fn test_load_ranking_gold() {
        let gold_file = write_temp("1\tTRUMP\tSo nice.\t0\n2\tCLINTON\tNumbers, facts.\t1\n");
        let gold = load_ranking_gold(gold_file.path()).unwrap();

        assert_eq!(gold.len(), 2);
        assert!(!gold[&LineNumber::new(1).unwrap()].is_worthy());
        assert!(gold[&LineNumber::new(2).unwrap()].is_worthy());
    }

    #[test]
    fn test_load_ranking_gold_rejects_short_rows() {
        let gold_file = write_temp("1\tTRUMP\t0\n");
        let err = load_ranking_gold(gold_file.path()).unwrap_err();
        assert!(matches!(err, EvalError::Parse { .. }));
    }

    #[test]
    fn test_load_ranking_predictions_strict() {
        let gold_file = write_temp("1\ta\tb\t0\n2\ta\tb\t1\n3\ta\tb\t0\n");
        let gold = load_ranking_gold(gold_file.path()).unwrap();
        let pred_file = write_temp("1\t0.3\n2\t0.9\n3\t1e-4\n");

        let mut reporter = CaptureReporter::new();
        let scored = load_ranking_predictions(
            pred_file.path(),
            &gold,
            CompletenessMode::Strict,
            &mut reporter,
        )
        .unwrap();

        assert_eq!(scored.len(), 3);
        assert_eq!(scored[1].score, 0.9);
        assert_eq!(scored[2].score, 1e-4);
        assert!(reporter.events.is_empty());
    }

    #[test]
    fn test_load_ranking_predictions_unknown_line_is_fatal() {
        let gold_file = write_temp("1\ta\tb\t0\n");
        let gold = load_ranking_gold(gold_file.path()).unwrap();
        let pred_file = write_temp("1\t0.3\n7\t0.9\n");

        let mut reporter = CaptureReporter::new();
        let err = load_ranking_predictions(
            pred_file.path(),
            &gold,
            CompletenessMode::Strict,
            &mut reporter,
        )
        .unwrap_err();

        assert!(matches!(err, EvalError::Referential { .. }));
    }

    #[test]
    fn test_load_ranking_predictions_completeness_modes() {
        let gold_file = write_temp("1\ta\tb\t0\n2\ta\tb\t1\n3\ta\tb\t0\n");
        let gold = load_ranking_gold(gold_file.path()).unwrap();
        let pred_file = write_temp("1\t0.3\n3\t0.1\n");

        let mut reporter = CaptureReporter::new();
        let err = load_ranking_predictions(
            pred_file.path(),
            &gold,
            CompletenessMode::Strict,
            &mut reporter,
        )
        .unwrap_err();
        assert!(matches!(err, EvalError::Completeness { .. }));

        let mut reporter = CaptureReporter::new();
        let scored = load_ranking_predictions(
            pred_file.path(),
            &gold,
            CompletenessMode::Lenient,
            &mut reporter,
        )
        .unwrap();
        assert_eq!(scored.len(), 2);
        assert_eq!(reporter.warnings().count(), 1);
    }

    #[test]
    fn test_load_veracity_gold_skips_unclaimed_rows() {
        let gold_file = write_temp(
            "1\tTRUMP\tSo nice.\tN/A\tN/A\tN/A\n\
             2\tCLINTON\tHe owes money.\t1\tTrump owes money\tTRUE\n\
             3\tCLINTON\tMore of it.\t2\tMore claims\thalf-true\n",
        );
        let gold = load_veracity_gold(gold_file.path(), "").unwrap();

        assert_eq!(gold.len(), 2);
        let first = ClaimId::new("", ClaimNumber::new(1).unwrap());
        assert_eq!(gold[&first], Veracity::True);
    }

    #[test]
    fn test_load_veracity_gold_applies_namespace() {
        let gold_file = write_temp("1\ts\tt\t1\tn\tTRUE\n2\ts\tt\t2\tn\tFALSE\n");
        let gold = load_veracity_gold(gold_file.path(), "file-0").unwrap();

        assert_eq!(gold.len(), 2);
        assert!(gold.keys().all(|id| id.namespace == "file-0"));
    }

    #[test]
    fn test_load_veracity_predictions_roundtrip() {
        let gold_file = write_temp("1\ts\tt\t1\tn\tTRUE\n2\ts\tt\t2\tn\tFALSE\n");
        let gold = load_veracity_gold(gold_file.path(), "file-0").unwrap();
        let pred_file = write_temp("1\tHALF-TRUE\n2\ttrue\n");

        let predictions =
            load_veracity_predictions(pred_file.path(), &gold, "file-0").unwrap();

        assert_eq!(predictions.len(), 2);
        let first = ClaimId::new("file-0", ClaimNumber::new(1).unwrap());
        assert_eq!(predictions[&first], Veracity::HalfTrue);
    }

    #[test]
    fn test_load_veracity_predictions_incomplete_is_fatal() {
        let gold_file = write_temp("1\ts\tt\t1\tn\tTRUE\n2\ts\tt\t2\tn\tFALSE\n");
        let gold = load_veracity_gold(gold_file.path(), "").unwrap();
        let pred_file = write_temp("1\tTRUE\n");

        let err = load_veracity_predictions(pred_file.path(), &gold, "").unwrap_err();
        assert!(matches!(err, EvalError::Completeness { .. }));
    }

    #[test]
    fn test_load_veracity_predictions_unknown_claim_is_fatal() {
        let gold_file = write_temp("1\ts\tt\t1\tn\tTRUE\n");
        let gold = load_veracity_gold(gold_file.path(), "").unwrap();
        let pred_file = write_temp("1\tTRUE\n9\tFALSE\n");

        let err = load_veracity_predictions(pred_file.path(), &gold, "").unwrap_err();
        assert!(matches!(err, EvalError::Referential { .. }));
    }

    #[test]
    fn test_load_veracity_predictions_conflicting_duplicate() {
        let gold_file = write_temp("1\ts\tt\t1\tn\tTRUE\n");
        let gold = load_veracity_gold(gold_file.path(), "").unwrap();

        let agreeing = write_temp("1\tTRUE\n1\ttrue\n");
        assert!(load_veracity_predictions(agreeing.path(), &gold, "").is_ok());

        let conflicting = write_temp("1\tTRUE\n1\tFALSE\n");
        let err = load_veracity_predictions(conflicting.path(), &gold, "").unwrap_err();
        assert!(matches!(err, EvalError::DuplicateKey { .. }));
    }
}
