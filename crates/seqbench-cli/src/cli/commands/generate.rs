use super::super::args::{tiers, GenerateArgs};
use crate::exit_codes::SUCCESS;
use anyhow::Context;
use seqbench_core::extract::ResponseArtifact;
use seqbench_core::fs::{ensure_dir, write_atomic};
use seqbench_core::layout;
use seqbench_core::providers::llm::{LlmClient, OpenAiClient};
use tracing::warn;

pub(crate) async fn run(args: GenerateArgs) -> anyhow::Result<i32> {
    for tier in tiers(&args.tiers) {
        let prompts_dir = layout::prompts_dir(&args.root, tier);
        let mut prompts: Vec<_> = std::fs::read_dir(&prompts_dir)
            .with_context(|| format!("failed to list prompts in {}", prompts_dir.display()))?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("txt"))
            .collect();
        prompts.sort();

        for model in &args.models {
            let client = OpenAiClient::new(model.clone(), args.api_key.clone());
            let responses_dir = layout::responses_dir(&args.root, tier, model);
            ensure_dir(&responses_dir)?;

            for prompt_path in &prompts {
                let Some(stem) = prompt_path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                let response_path = responses_dir.join(format!("{}.json", stem));
                if response_path.exists() {
                    eprintln!("  Cached response for {} with {}", stem, model);
                    continue;
                }

                let prompt = std::fs::read_to_string(prompt_path)
                    .with_context(|| format!("failed to read prompt {}", prompt_path.display()))?;
                let prompt = prompt.trim();

                match client.complete(prompt).await {
                    Ok(resp) => {
                        let artifact = ResponseArtifact {
                            prompt: prompt.to_string(),
                            response: resp.text,
                        };
                        write_atomic(
                            &response_path,
                            &serde_json::to_string_pretty(&artifact)?,
                        )?;
                        eprintln!("  Generated response for {} with {}", stem, model);
                    }
                    Err(e) => {
                        // One bad call must not sink the sweep; the missing
                        // artifact makes the next run retry it.
                        warn!(sequence = stem, model = %model, error = %e, "generation failed");
                    }
                }
            }
        }
    }
    Ok(SUCCESS)
}
