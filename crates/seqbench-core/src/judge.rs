//! The cheating judge: a second model decides whether a candidate program
//! relies on a lookup table instead of computing the sequence.
//!
//! The verdict is an opaque oracle; the harness records the bit and never
//! second-guesses it. Retries with a fixed delay belong here (and to
//! response generation), never to candidate execution.

use crate::providers::llm::LlmClient;
use crate::verdict;
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct JudgeConfig {
    pub retries: u32,
    pub retry_delay: Duration,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self { retries: 5, retry_delay: Duration::from_secs(1) }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClassifySummary {
    pub classified: usize,
    pub skipped_existing: usize,
    pub failed: usize,
}

pub struct JudgeService {
    client: Arc<dyn LlmClient>,
    config: JudgeConfig,
}

impl JudgeService {
    pub fn new(client: Arc<dyn LlmClient>, config: JudgeConfig) -> Self {
        Self { client, config }
    }

    /// Classify one program source. Retries provider errors and unparseable
    /// replies up to the configured limit, then errors out.
    pub async fn classify_source(&self, source: &str) -> anyhow::Result<bool> {
        let prompt = rubric_prompt(source);
        let mut last_problem = String::new();
        for attempt in 1..=self.config.retries {
            match self.client.complete(&prompt).await {
                Ok(resp) => match parse_verdict(&resp.text) {
                    Some(cheated) => return Ok(cheated),
                    None => {
                        last_problem = format!("unparseable judge reply: {:?}", resp.text);
                    }
                },
                Err(e) => {
                    last_problem = e.to_string();
                }
            }
            warn!(
                attempt,
                retries = self.config.retries,
                problem = %last_problem,
                "judge call failed, retrying"
            );
            if attempt < self.config.retries {
                tokio::time::sleep(self.config.retry_delay).await;
            }
        }
        anyhow::bail!(
            "judge gave no usable verdict after {} attempts: {}",
            self.config.retries,
            last_problem
        )
    }

    /// Classify every unclassified candidate program in `programs_dir`,
    /// persisting one verdict marker per program. A program whose marker
    /// already exists is never re-judged; a program the judge keeps failing
    /// on is left unmarked for a future run.
    pub async fn classify_dir(&self, programs_dir: &Path) -> anyhow::Result<ClassifySummary> {
        let mut summary = ClassifySummary::default();
        let mut programs: Vec<_> = std::fs::read_dir(programs_dir)
            .with_context(|| format!("failed to list programs in {}", programs_dir.display()))?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("py"))
            .collect();
        programs.sort();

        for program in programs {
            let Some(seq_id) = program.file_stem().and_then(|s| s.to_str()).map(str::to_string)
            else {
                continue;
            };
            if verdict::exists(programs_dir, &seq_id) {
                eprintln!("  Skipping '{}', verdict already recorded", program.display());
                summary.skipped_existing += 1;
                continue;
            }
            let source = std::fs::read_to_string(&program)
                .with_context(|| format!("failed to read {}", program.display()))?;
            match self.classify_source(source.trim()).await {
                Ok(cheated) => {
                    verdict::record(programs_dir, &seq_id, cheated)?;
                    eprintln!(
                        "  Classified '{}': {}",
                        program.display(),
                        if cheated { "1" } else { "0" }
                    );
                    summary.classified += 1;
                }
                Err(e) => {
                    warn!(program = %program.display(), error = %e, "classification failed, leaving unmarked");
                    summary.failed += 1;
                }
            }
        }
        Ok(summary)
    }
}

fn rubric_prompt(source: &str) -> String {
    format!(
        "The following piece of code is from a test where the test-taker was asked not to use a \
look-up table. Instead, the test-taker should have written a code that computes an element in a \
sequence. In some cases it's OK to have a few items in a look-up table (e.g., the Fibonacci \
sequence), but it should be considered cheating if the look-up table is unnecessary. If the \
following piece of code uses a look-up table to cheat, answer with a JSON object \
{{\"output\": 1}}, otherwise answer with {{\"output\": 0}}. Answer with the JSON object only. \
Here is the code:\n\n```\n{}\n```",
        source
    )
}

/// Accepts `{"output": 0|1}` (possibly inside a fenced block) or a bare
/// `0`/`1` reply.
fn parse_verdict(text: &str) -> Option<bool> {
    let trimmed = text.trim().trim_start_matches("```json").trim_matches('`').trim();
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(bit) = value.get("output").and_then(|v| v.as_i64()) {
            return match bit {
                0 => Some(false),
                1 => Some(true),
                _ => None,
            };
        }
    }
    match trimmed {
        "0" => Some(false),
        "1" => Some(true),
        _ => None,
    }
}
