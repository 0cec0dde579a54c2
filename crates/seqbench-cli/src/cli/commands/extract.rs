use super::super::args::{tiers, ExtractArgs};
use crate::exit_codes::SUCCESS;
use anyhow::Context;
use seqbench_core::extract::{extract_code, ResponseArtifact};
use seqbench_core::fs::ensure_dir;
use seqbench_core::layout;
use tracing::warn;

pub(crate) fn run(args: ExtractArgs) -> anyhow::Result<i32> {
    let mut extracted = 0usize;
    for tier in tiers(&args.tiers) {
        for model in &args.models {
            let responses_dir = layout::responses_dir(&args.root, tier, model);
            let codes_dir = layout::codes_dir(&args.root, tier, model);
            ensure_dir(&codes_dir)?;

            let mut responses: Vec<_> = std::fs::read_dir(&responses_dir)
                .with_context(|| {
                    format!("failed to list responses in {}", responses_dir.display())
                })?
                .filter_map(|e| e.ok().map(|e| e.path()))
                .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
                .collect();
            responses.sort();

            for response_path in responses {
                let Some(stem) = response_path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                let text = std::fs::read_to_string(&response_path).with_context(|| {
                    format!("failed to read response {}", response_path.display())
                })?;
                let artifact: ResponseArtifact = match serde_json::from_str(&text) {
                    Ok(v) => v,
                    Err(e) => {
                        warn!(artifact = %response_path.display(), error = %e, "invalid response artifact, skipping");
                        continue;
                    }
                };
                let code = extract_code(&artifact.response);

                let code_path = codes_dir.join(format!("{}.py", stem));
                std::fs::write(&code_path, code)
                    .with_context(|| format!("failed to write program {}", code_path.display()))?;
                extracted += 1;
            }
        }
    }
    eprintln!("Extracted {} candidate programs", extracted);
    Ok(SUCCESS)
}
