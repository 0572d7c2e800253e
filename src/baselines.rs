// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Random baseline submission producers
//!
//! Generates grammar-conforming submission files straight from a gold file:
//! - check-worthiness: one uniform random score per transcript line
//! - veracity: one uniform random label per claim
//!
//! Identical seeds reproduce identical files.

use crate::datasets::{load_ranking_gold, load_veracity_gold, Veracity};
use crate::error::Result;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fmt::Write as _;
use std::path::Path;

/// Writes a `line_number\tscore` submission covering every gold line, in
/// line-number order, with scores drawn uniformly from [0, 1).
pub fn write_random_ranking(gold_path: &Path, output_path: &Path, seed: u64) -> Result<()> {
    let gold = load_ranking_gold(gold_path)?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut lines: Vec<_> = gold.keys().copied().collect();
    lines.sort_unstable();

    let mut out = String::new();
    for line in lines {
        let score: f64 = rng.gen();
        let _ = writeln!(out, "{}\t{}", line, score);
    }
    std::fs::write(output_path, out)?;

    tracing::info!(
        "Random ranking baseline for {} written to {}",
        gold_path.display(),
        output_path.display()
    );
    Ok(())
}

/// Writes a `claim_number\tLABEL` submission covering every gold claim, in
/// claim-number order, with labels drawn uniformly from the 3-label set.
pub fn write_random_veracity(gold_path: &Path, output_path: &Path, seed: u64) -> Result<()> {
    let gold = load_veracity_gold(gold_path, "")?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut claims: Vec<_> = gold.keys().map(|id| id.number).collect();
    claims.sort_unstable();

    let mut out = String::new();
    for claim in claims {
        let label = Veracity::ALL
            .choose(&mut rng)
            .copied()
            .unwrap_or(Veracity::HalfTrue);
        let _ = writeln!(out, "{}\t{}", claim, label.as_str().to_uppercase());
    }
    std::fs::write(output_path, out)?;

    tracing::info!(
        "Random veracity baseline for {} written to {}",
        gold_path.display(),
        output_path.display()
    );
    Ok(())
}
