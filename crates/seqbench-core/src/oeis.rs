//! OEIS metadata: fetching, on-disk caching, offset lookup, and the prompt
//! given to candidate models.
//!
//! Cache files hold the raw OEIS search response body (a JSON array of
//! sequence entries) under `<cache_dir>/<id>.json`, so re-running any stage
//! never re-fetches. The offset lookup reads the same cache and degrades to
//! 0 with a warning when the entry is missing or malformed; grading can
//! proceed without it, just with unshifted inputs.

use crate::fs::{ensure_dir, write_atomic};
use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::warn;

const SEARCH_URL: &str = "https://oeis.org/search";

/// Parsed view of one OEIS entry, the subset the pipeline needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceInfo {
    pub id: String,
    pub name: String,
    pub data: Vec<i64>,
    pub comments: String,
    pub offsets: Vec<i64>,
    pub keywords: Vec<String>,
}

impl SequenceInfo {
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }
}

/// `A`-prefixed, zero-padded accession id: `accession(45)` is `A000045`.
pub fn accession(number: u32) -> String {
    format!("A{:06}", number)
}

pub struct OeisClient {
    client: reqwest::Client,
    cache_dir: PathBuf,
}

impl OeisClient {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self { client: reqwest::Client::new(), cache_dir: cache_dir.into() }
    }

    /// Fetch the entry for sequence `number`, serving from the cache when
    /// possible and caching the raw body otherwise.
    pub async fn fetch(&self, number: u32) -> anyhow::Result<SequenceInfo> {
        let id = accession(number);
        let cache_path = self.cache_dir.join(format!("{}.json", id));

        let body = if cache_path.exists() {
            std::fs::read_to_string(&cache_path)
                .with_context(|| format!("failed to read cache entry {}", cache_path.display()))?
        } else {
            ensure_dir(&self.cache_dir)?;
            let query = format!("id:{}", id);
            let resp = self
                .client
                .get(SEARCH_URL)
                .query(&[("fmt", "json"), ("q", query.as_str())])
                .send()
                .await
                .with_context(|| format!("OEIS request for {} failed", id))?;
            if !resp.status().is_success() {
                anyhow::bail!("OEIS search for {} returned status {}", id, resp.status());
            }
            let body = resp.text().await?;
            write_atomic(&cache_path, &body)?;
            body
        };

        let raw: serde_json::Value = serde_json::from_str(&body)
            .with_context(|| format!("invalid JSON in OEIS entry for {}", id))?;
        parse_entry(&id, &raw)
    }
}

fn parse_entry(id: &str, raw: &serde_json::Value) -> anyhow::Result<SequenceInfo> {
    let entry = raw
        .get(0)
        .ok_or_else(|| anyhow::anyhow!("OEIS entry for {} has no results", id))?;

    let name = entry.get("name").and_then(|v| v.as_str()).unwrap_or_default().to_string();
    let data = int_list(entry.get("data").and_then(|v| v.as_str()).unwrap_or_default());
    let comments = entry
        .get("comment")
        .and_then(|v| v.as_array())
        .map(|lines| {
            lines
                .iter()
                .filter_map(|l| l.as_str())
                .collect::<Vec<_>>()
                .join("\n\n")
        })
        .unwrap_or_default();
    let offsets = int_list(entry.get("offset").and_then(|v| v.as_str()).unwrap_or_default());
    let keywords = entry
        .get("keyword")
        .and_then(|v| v.as_str())
        .map(|s| s.split(',').map(|k| k.trim().to_string()).filter(|k| !k.is_empty()).collect())
        .unwrap_or_default();

    Ok(SequenceInfo {
        id: id.to_string(),
        name,
        data,
        comments,
        offsets,
        keywords,
    })
}

fn int_list(s: &str) -> Vec<i64> {
    s.split(',').filter_map(|x| x.trim().parse().ok()).collect()
}

/// Offset of `seq_id` according to the cache, defaulting to 0 whenever the
/// entry is missing or unreadable. Never fails: a missing offset only means
/// the inputs start at 0.
pub fn cached_offset(cache_dir: &Path, seq_id: &str) -> i64 {
    let path = cache_dir.join(format!("{}.json", seq_id));
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(_) => {
            warn!(seq_id, "no cache entry for sequence, defaulting offset to 0");
            return 0;
        }
    };
    let parsed: Result<serde_json::Value, _> = serde_json::from_str(&text);
    let offset = parsed.ok().as_ref().and_then(|raw| {
        raw.get(0)?
            .get("offset")?
            .as_str()?
            .split(',')
            .next()?
            .trim()
            .parse()
            .ok()
    });
    match offset {
        Some(offset) => offset,
        None => {
            warn!(seq_id, "no valid offset in cache entry, defaulting to 0");
            0
        }
    }
}

/// The instruction given to candidate models for one sequence.
pub fn render_prompt(info: &SequenceInfo) -> String {
    format!(
        "Write a python code that takes a number n as input from stdin, outputs a single element \
of a sequence as a string to stdout. Just output the n-th element in the sequence, not the whole \
sequence or anything other than the single sequence element. You will be graded by my running \
your code and comparing the results with a look-up table. If you use a look-up table for your \
code, you will not only fail the test. Hardcoding values that can be computed without hardcoding \
is considered to be using a look-up table. Use only the standard python library. No packages \
will be installed with pip or conda. Output your final code at the end of your response inside \
triple backticks like:\n```\n#your code goes here\n```\nThe last part of your response that is \
inside triple backticks will be used as your response for the purposes of the test. The code \
will be stopped after a short period of time, so make it efficient if needed.\n\nHere is some \
information on the sequence:\n```\nName: {}\nComments: {}\n```",
        info.name, info.comments
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTRY: &str = r#"[{
        "number": 45,
        "name": "Fibonacci numbers",
        "data": "0,1,1,2,3,5,8,13",
        "comment": ["First comment.", "Second comment."],
        "offset": "0,4",
        "keyword": "core,easy,nonn"
    }]"#;

    #[test]
    fn accession_pads_to_six_digits() {
        assert_eq!(accession(45), "A000045");
        assert_eq!(accession(123456), "A123456");
    }

    #[test]
    fn parses_a_full_entry() {
        let raw: serde_json::Value = serde_json::from_str(ENTRY).unwrap();
        let info = parse_entry("A000045", &raw).unwrap();
        assert_eq!(info.name, "Fibonacci numbers");
        assert_eq!(info.data[..4], [0, 1, 1, 2]);
        assert_eq!(info.comments, "First comment.\n\nSecond comment.");
        assert_eq!(info.offsets, [0, 4]);
        assert!(info.has_keyword("easy"));
        assert!(!info.has_keyword("hard"));
    }

    #[test]
    fn cached_offset_reads_first_component() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("A000045.json"), ENTRY).unwrap();
        assert_eq!(cached_offset(dir.path(), "A000045"), 0);

        std::fs::write(
            dir.path().join("A000027.json"),
            r#"[{"offset": "1,2"}]"#,
        )
        .unwrap();
        assert_eq!(cached_offset(dir.path(), "A000027"), 1);
    }

    #[test]
    fn cached_offset_defaults_to_zero() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(cached_offset(dir.path(), "A000001"), 0);

        std::fs::write(dir.path().join("A000002.json"), "not json").unwrap();
        assert_eq!(cached_offset(dir.path(), "A000002"), 0);

        std::fs::write(dir.path().join("A000003.json"), r#"[{"name": "x"}]"#).unwrap();
        assert_eq!(cached_offset(dir.path(), "A000003"), 0);
    }

    #[test]
    fn negative_offsets_parse() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("A000004.json"), r#"[{"offset": "-1,1"}]"#).unwrap();
        assert_eq!(cached_offset(dir.path(), "A000004"), -1);
    }

    #[test]
    fn prompt_mentions_the_sequence_name() {
        let raw: serde_json::Value = serde_json::from_str(ENTRY).unwrap();
        let info = parse_entry("A000045", &raw).unwrap();
        let prompt = render_prompt(&info);
        assert!(prompt.contains("Name: Fibonacci numbers"));
        assert!(prompt.contains("triple backticks"));
    }
}
