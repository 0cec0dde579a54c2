//! Batch orchestration over the (model × sequence × budget) grid.
//!
//! Strictly sequential: one candidate process at a time, one input at a
//! time. Combinations are independent, and a persisted score record is the
//! only progress marker, so an interrupted run resumes by simply running
//! again.

use crate::catalog::Catalog;
use crate::engine::evaluator;
use crate::exec::ProgramRunner;
use crate::fs::ensure_dir;
use crate::model::Budget;
use crate::{oeis, storage, verdict};
use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::warn;

/// One candidate-program directory paired with the directory its score
/// records go to. Typically one per (tier, model).
#[derive(Debug, Clone)]
pub struct EvalSet {
    pub programs_dir: PathBuf,
    pub scores_dir: PathBuf,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GridSummary {
    /// Combinations evaluated by actually running the candidate.
    pub evaluated: usize,
    /// Combinations skipped because their score record already existed.
    pub skipped_existing: usize,
    /// Combinations scored 0 by the cheating gate, no process spawned.
    pub cheated: usize,
    /// Combinations skipped because no catalogue sequence matched.
    pub unmatched: usize,
}

pub struct Orchestrator {
    pub runner: ProgramRunner,
    pub budgets: Vec<Budget>,
    /// OEIS metadata cache, consulted for per-sequence offsets.
    pub cache_dir: PathBuf,
}

impl Orchestrator {
    pub async fn run_all(&self, catalog: &Catalog, sets: &[EvalSet]) -> anyhow::Result<GridSummary> {
        let mut summary = GridSummary::default();
        for set in sets {
            self.run_set(catalog, set, &mut summary).await?;
        }
        Ok(summary)
    }

    async fn run_set(
        &self,
        catalog: &Catalog,
        set: &EvalSet,
        summary: &mut GridSummary,
    ) -> anyhow::Result<()> {
        ensure_dir(&set.scores_dir)?;
        let programs = discover_programs(&set.programs_dir)?;

        for (seq_id, program) in &programs {
            for &budget in &self.budgets {
                // The skip check comes first: an existing record is the one
                // and only "already done" signal.
                if storage::record_exists(&set.scores_dir, seq_id, budget) {
                    eprintln!(
                        "  {}: score for '{}' with timeout {} already exists, skipping",
                        set.programs_dir.display(),
                        seq_id,
                        budget
                    );
                    summary.skipped_existing += 1;
                    continue;
                }

                let Some(sequence) = catalog.get(seq_id) else {
                    warn!(
                        seq_id = %seq_id,
                        programs_dir = %set.programs_dir.display(),
                        "no catalogue sequence for candidate program, skipping"
                    );
                    summary.unmatched += 1;
                    continue;
                };

                let offset = oeis::cached_offset(&self.cache_dir, seq_id);
                let record_path = storage::score_path(&set.scores_dir, seq_id, budget);

                if verdict::is_cheated(&set.programs_dir, seq_id) {
                    eprintln!(
                        "  {}: cheating verdict for '{}', score forced to 0 at timeout {}",
                        set.programs_dir.display(),
                        seq_id,
                        budget
                    );
                    storage::write_record(&record_path, Some(0.0))?;
                    summary.cheated += 1;
                    continue;
                }

                eprintln!("  Evaluating '{}' with timeout {}s...", program.display(), budget);
                let tally =
                    evaluator::evaluate(&self.runner, sequence, program, offset, budget.duration())
                        .await;
                match tally.score() {
                    Some(score) => {
                        eprintln!("    Correct: {}/{}", tally.correct, tally.total);
                        eprintln!("    Accuracy: {:.2}% for timeout {}s", score, budget);
                    }
                    None => eprintln!("    No evaluable inputs for '{}'", seq_id),
                }
                storage::write_record(&record_path, tally.score())?;
                summary.evaluated += 1;
            }
        }
        Ok(())
    }
}

/// Candidate programs in a set: `<seq_id>.py` files, in sorted order so
/// logs and resumption points are reproducible across runs.
fn discover_programs(dir: &Path) -> anyhow::Result<Vec<(String, PathBuf)>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to list candidate programs in {}", dir.display()))?;
    let mut programs = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("py") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            programs.push((stem.to_string(), path.clone()));
        }
    }
    programs.sort();
    Ok(programs)
}
