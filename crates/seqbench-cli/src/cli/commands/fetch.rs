use super::super::args::FetchArgs;
use crate::exit_codes::SUCCESS;
use seqbench_core::fs::ensure_dir;
use seqbench_core::layout::{self, Tier};
use seqbench_core::oeis::{render_prompt, OeisClient};
use anyhow::Context;

pub(crate) async fn run(args: FetchArgs) -> anyhow::Result<i32> {
    let client = OeisClient::new(&args.cache_dir);
    for tier in Tier::ALL {
        ensure_dir(&layout::prompts_dir(&args.root, tier))?;
    }

    let mut easies = 0usize;
    let mut hards = 0usize;
    for number in 1..args.max_number {
        let info = client.fetch(number).await?;
        let tier = if info.has_keyword(Tier::Hard.keyword()) && hards < args.per_tier {
            hards += 1;
            Tier::Hard
        } else if info.has_keyword(Tier::Easy.keyword()) && easies < args.per_tier {
            easies += 1;
            Tier::Easy
        } else {
            continue;
        };

        eprintln!("  {} -> {}", info.id, tier);
        let path = layout::prompts_dir(&args.root, tier).join(format!("{}.txt", info.id));
        std::fs::write(&path, render_prompt(&info))
            .with_context(|| format!("failed to write prompt {}", path.display()))?;

        if hards >= args.per_tier && easies >= args.per_tier {
            break;
        }
    }

    eprintln!("Collected {} easy and {} hard sequences", easies, hards);
    Ok(SUCCESS)
}
