use super::super::args::{tiers, EvalArgs};
use crate::exit_codes::{CONFIG_ERROR, SUCCESS};
use seqbench_core::catalog::Catalog;
use seqbench_core::engine::{EvalSet, Orchestrator};
use seqbench_core::exec::ProgramRunner;
use seqbench_core::layout;
use seqbench_core::model::Budget;

pub(crate) async fn run(args: EvalArgs) -> anyhow::Result<i32> {
    let catalog = match Catalog::load(&args.catalogue) {
        Ok(catalog) => catalog,
        Err(e) => {
            // Without ground truth there is nothing to grade against.
            eprintln!("error: {e}");
            return Ok(CONFIG_ERROR);
        }
    };
    eprintln!("Loaded {} sequences from {}", catalog.len(), args.catalogue.display());

    let mut sets = Vec::new();
    for tier in tiers(&args.tiers) {
        for model in &args.models {
            let programs_dir = layout::codes_dir(&args.root, tier, model);
            if !programs_dir.is_dir() {
                eprintln!("  No candidate programs at {}, skipping", programs_dir.display());
                continue;
            }
            sets.push(EvalSet {
                programs_dir,
                scores_dir: layout::scores_dir(&args.root, tier, model),
            });
        }
    }

    let orchestrator = Orchestrator {
        runner: ProgramRunner::new(&args.interpreter),
        budgets: args.timeouts.iter().copied().map(Budget::from_secs).collect(),
        cache_dir: args.cache_dir.clone(),
    };
    let summary = orchestrator.run_all(&catalog, &sets).await?;

    eprintln!(
        "Summary: {} evaluated, {} already scored, {} cheating, {} unmatched",
        summary.evaluated, summary.skipped_existing, summary.cheated, summary.unmatched
    );
    Ok(SUCCESS)
}
