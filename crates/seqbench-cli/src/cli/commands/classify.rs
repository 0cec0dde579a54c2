use super::super::args::{tiers, ClassifyArgs};
use crate::exit_codes::SUCCESS;
use seqbench_core::judge::{JudgeConfig, JudgeService};
use seqbench_core::layout;
use seqbench_core::providers::llm::OpenAiClient;
use std::sync::Arc;
use std::time::Duration;

pub(crate) async fn run(args: ClassifyArgs) -> anyhow::Result<i32> {
    // Deterministic judging: temperature 0.
    let client = OpenAiClient::new(args.judge_model.clone(), args.api_key.clone())
        .with_temperature(0.0);
    let judge = JudgeService::new(
        Arc::new(client),
        JudgeConfig {
            retries: args.retries,
            retry_delay: Duration::from_secs_f64(args.retry_delay),
        },
    );

    let mut classified = 0usize;
    let mut skipped = 0usize;
    let mut failed = 0usize;
    for tier in tiers(&args.tiers) {
        for model in &args.models {
            let codes_dir = layout::codes_dir(&args.root, tier, model);
            if !codes_dir.is_dir() {
                eprintln!("  No candidate programs at {}, skipping", codes_dir.display());
                continue;
            }
            let summary = judge.classify_dir(&codes_dir).await?;
            classified += summary.classified;
            skipped += summary.skipped_existing;
            failed += summary.failed;
        }
    }

    eprintln!(
        "Summary: {} classified, {} already classified, {} failed",
        classified, skipped, failed
    );
    Ok(SUCCESS)
}
