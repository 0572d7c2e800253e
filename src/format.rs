// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Submission format checking
//!
//! Validates participant files against the competition grammars before any
//! scoring happens:
//! - ranking submissions: `<line_number>\t<score>` per line
//! - ranked-list submissions: one line number per line, ordered by rank
//! - veracity submissions: `<claim_number>\t<label>` per line
//!
//! Checks stop at the first grammar violation. Suspicious but legal shapes
//! (an ascending ranked list, fewer than three distinct labels) only warn.

use crate::diagnostics::Reporter;
use crate::error::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

static SCORED_LINE: Lazy<Regex> = Lazy::new(|| {
    // line number 1..9999, tab, decimal or bare integer score
    Regex::new(r"^[1-9][0-9]{0,3}\t([-+]?[0-9]*\.[0-9]+|[0-9]+)$")
        .expect("invalid scored-line pattern")
});

static BARE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[1-9][0-9]{0,3}$").expect("invalid bare-line pattern"));

static CLAIM_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[1-9][0-9]{0,3}\t(TRUE|FALSE|HALF-TRUE)$")
        .expect("invalid claim-line pattern")
});

/// Which of the two accepted ranking submission shapes to enforce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrammarMode {
    /// `line_number\tscore` rows with line numbers exactly 1..N in order
    Sequential,
    /// Bare line numbers ordered by predicted rank
    Ranked,
}

/// Grammar selector for [`check_submission_file`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionFormat {
    Ranking(GrammarMode),
    Veracity,
}

/// Checks a ranking submission against the selected grammar.
///
/// Returns `false` after reporting the first violation as an error.
pub fn check_ranking_submission(
    text: &str,
    mode: GrammarMode,
    reporter: &mut dyn Reporter,
) -> bool {
    match mode {
        GrammarMode::Sequential => check_sequential(text, reporter),
        GrammarMode::Ranked => check_ranked(text, reporter),
    }
}

fn check_sequential(text: &str, reporter: &mut dyn Reporter) -> bool {
    for (idx, line) in text.trim().split('\n').enumerate() {
        let line = line.trim();
        if !SCORED_LINE.is_match(line) {
            reporter.error(format!("Wrong format in line {}: {}", idx + 1, line));
            return false;
        }
        let number = match line.split('\t').next().unwrap_or("").parse::<usize>() {
            Ok(value) => value,
            Err(_) => {
                reporter.error(format!("Wrong format in line {}: {}", idx + 1, line));
                return false;
            }
        };
        if number != idx + 1 {
            reporter.error(format!(
                "Line numbers should be sequential: expected {} in line {}, found {}",
                idx + 1,
                idx + 1,
                number
            ));
            return false;
        }
    }
    true
}

fn check_ranked(text: &str, reporter: &mut dyn Reporter) -> bool {
    let mut numbers: Vec<u16> = Vec::new();
    for (idx, line) in text.trim().split('\n').enumerate() {
        let line = line.trim();
        if !BARE_LINE.is_match(line) {
            reporter.error(format!("Wrong format in line {}: {}", idx + 1, line));
            return false;
        }
        match line.parse::<u16>() {
            Ok(value) => numbers.push(value),
            Err(_) => {
                reporter.error(format!("Wrong format in line {}: {}", idx + 1, line));
                return false;
            }
        }
    }

    let distinct: HashSet<u16> = numbers.iter().copied().collect();
    if distinct.len() != numbers.len() {
        reporter.error("Duplicate line numbers in the submission".to_string());
        return false;
    }

    let mut sorted = numbers.clone();
    sorted.sort_unstable();
    if sorted == numbers {
        reporter.warning(
            "Line numbers are sorted in ascending order, but a ranked list ordered by score is expected".to_string(),
        );
    }
    if let (Some(&first), Some(&last)) = (sorted.first(), sorted.last()) {
        let gaps = (last - first + 1) as usize - sorted.len();
        if gaps > 0 {
            reporter.warning(format!(
                "{} line numbers between {} and {} are missing from the submission",
                gaps, first, last
            ));
        }
    }

    true
}

/// Checks a veracity submission.
///
/// Labels are matched case-insensitively. Repeating a claim is legal as long
/// as the labels agree; claim numbers must cover 1..max without gaps.
pub fn check_veracity_submission(text: &str, reporter: &mut dyn Reporter) -> bool {
    let mut claim_labels: HashMap<u16, String> = HashMap::new();

    for (idx, line) in text.trim().split('\n').enumerate() {
        let line = line.trim();
        if !CLAIM_LINE.is_match(line) {
            reporter.error(format!("Wrong format in line {}: {}", idx + 1, line));
            return false;
        }
        let mut fields = line.split('\t');
        let claim = match fields.next().unwrap_or("").parse::<u16>() {
            Ok(value) => value,
            Err(_) => {
                reporter.error(format!("Wrong format in line {}: {}", idx + 1, line));
                return false;
            }
        };
        let label = fields.next().unwrap_or("").to_lowercase();

        if let Some(previous) = claim_labels.get(&claim) {
            if *previous != label {
                reporter.error(format!(
                    "Claim {} appears more than once with conflicting labels",
                    claim
                ));
                return false;
            }
        }
        claim_labels.insert(claim, label);
    }

    let mut claims: Vec<u16> = claim_labels.keys().copied().collect();
    claims.sort_unstable();
    let dense = claims.iter().enumerate().all(|(i, c)| *c as usize == i + 1);
    if !dense {
        reporter.error("Claim numbers must cover 1..max without gaps".to_string());
        return false;
    }

    let distinct: HashSet<&String> = claim_labels.values().collect();
    if distinct.len() < 3 {
        reporter.warning("Predictions use fewer than three distinct labels".to_string());
    }

    true
}

/// Reads a submission file and checks it against `format`.
///
/// Returns `Ok(false)` for files that read fine but violate the grammar;
/// I/O failures are errors.
pub fn check_submission_file(
    path: &Path,
    format: SubmissionFormat,
    reporter: &mut dyn Reporter,
) -> Result<bool> {
    tracing::info!("Checking format of {}", path.display());
    let text = fs::read_to_string(path)?;

    let ok = match format {
        SubmissionFormat::Ranking(mode) => check_ranking_submission(&text, mode, reporter),
        SubmissionFormat::Veracity => check_veracity_submission(&text, reporter),
    };
    if ok {
        tracing::info!("Format of {} is correct", path.display());
    }
    Ok(ok)
}
