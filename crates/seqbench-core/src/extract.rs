//! Extraction of the graded program from a model response.
//!
//! The prompt tells the model that the last triple-backtick block of its
//! response is what gets graded; responses without any complete fenced
//! block are taken whole.

use serde::{Deserialize, Serialize};

/// What the generation stage persists per (sequence, model): the prompt it
/// sent and the raw model response. The code block is extracted later so
/// the raw response stays available for re-extraction and auditing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseArtifact {
    pub prompt: String,
    pub response: String,
}

/// The last complete fenced code block of `response`, with a leading
/// `python` language tag stripped; the whole trimmed response if no
/// complete block exists.
pub fn extract_code(response: &str) -> String {
    let parts: Vec<&str> = response.split("```").collect();
    if parts.len() >= 3 {
        // Blocks sit at odd indices; the last complete one is parts[len-2].
        let mut block = parts[parts.len() - 2].trim();
        if let Some(rest) = block.strip_prefix("python") {
            // Only strip an actual language tag, not code that happens to
            // start with the same letters.
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                block = rest.trim();
            }
        }
        block.to_string()
    } else {
        response.trim().to_string()
    }
}
