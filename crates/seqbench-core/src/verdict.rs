//! Cheating-verdict markers.
//!
//! One `<id>.cheated` file beside each candidate program, containing `1` or
//! `0`, written by the classifier and read by the orchestrator. An absent
//! marker means "not classified yet", which evaluation treats as not
//! cheating.

use crate::fs::write_atomic;
use std::path::{Path, PathBuf};

pub fn marker_path(programs_dir: &Path, seq_id: &str) -> PathBuf {
    programs_dir.join(format!("{}.cheated", seq_id))
}

pub fn exists(programs_dir: &Path, seq_id: &str) -> bool {
    marker_path(programs_dir, seq_id).exists()
}

/// True only for a marker whose content is exactly `1` (modulo whitespace).
pub fn is_cheated(programs_dir: &Path, seq_id: &str) -> bool {
    let path = marker_path(programs_dir, seq_id);
    match std::fs::read_to_string(&path) {
        Ok(contents) => contents.trim() == "1",
        Err(_) => false,
    }
}

pub fn record(programs_dir: &Path, seq_id: &str, cheated: bool) -> anyhow::Result<()> {
    let path = marker_path(programs_dir, seq_id);
    write_atomic(&path, if cheated { "1" } else { "0" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_marker_means_not_cheating() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_cheated(dir.path(), "A000001"));
        assert!(!exists(dir.path(), "A000001"));
    }

    #[test]
    fn recorded_verdicts_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        record(dir.path(), "A000001", true).unwrap();
        record(dir.path(), "A000002", false).unwrap();
        assert!(is_cheated(dir.path(), "A000001"));
        assert!(!is_cheated(dir.path(), "A000002"));
        assert!(exists(dir.path(), "A000002"));
    }

    #[test]
    fn whitespace_around_the_bit_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(marker_path(dir.path(), "A000003"), "1\n").unwrap();
        assert!(is_cheated(dir.path(), "A000003"));
    }

    #[test]
    fn anything_but_one_is_not_cheating() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(marker_path(dir.path(), "A000004"), "yes\n").unwrap();
        assert!(!is_cheated(dir.path(), "A000004"));
    }
}
