//! Score-record persistence.
//!
//! One file per (sequence, budget) combination inside a per-model scores
//! directory. The existence of the file is the single source of truth for
//! "this combination is done": the orchestrator checks it before doing
//! anything else, which is what makes interrupted runs resumable. Writes go
//! through a temp file and a rename, so a crashed writer can never leave a
//! half-record behind.

use crate::fs::write_atomic;
use crate::model::Budget;
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Sentinel stored when a combination produced no evaluable inputs.
/// Distinct from `0`, which always means "evaluated and failed everywhere".
const NO_DATA: &str = "NA";

pub fn score_file_name(seq_id: &str, budget: Budget) -> String {
    format!("{}_timeout_{}.score", seq_id, budget.label())
}

pub fn score_path(scores_dir: &Path, seq_id: &str, budget: Budget) -> PathBuf {
    scores_dir.join(score_file_name(seq_id, budget))
}

pub fn record_exists(scores_dir: &Path, seq_id: &str, budget: Budget) -> bool {
    score_path(scores_dir, seq_id, budget).exists()
}

pub fn write_record(path: &Path, score: Option<f64>) -> anyhow::Result<()> {
    let line = match score {
        Some(score) => format!("{}\n", score),
        None => format!("{}\n", NO_DATA),
    };
    write_atomic(path, &line).with_context(|| format!("failed to persist score record {}", path.display()))
}

/// Read a record back. `Ok(None)` is an explicit "no data" record;
/// unparseable contents are an error so reports can warn and skip.
pub fn read_record(path: &Path) -> anyhow::Result<Option<f64>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read score record {}", path.display()))?;
    let text = text.trim();
    if text == NO_DATA {
        return Ok(None);
    }
    let score: f64 = text
        .parse()
        .with_context(|| format!("malformed score record {}: {:?}", path.display(), text))?;
    Ok(Some(score))
}
