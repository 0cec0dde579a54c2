use std::time::Duration;

/// One catalogued integer sequence: its OEIS accession id and the known
/// terms in order. Terms are kept as the exact text tokens from the
/// catalogue; grading compares program output against them verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub id: String,
    pub terms: Vec<String>,
}

impl Sequence {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Wall-clock budget for a single execution of a candidate program.
///
/// The label is what score-file names are keyed on, so it must be stable:
/// whole-second budgets print without a fraction (`1`, not `1.0`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Budget {
    secs: f64,
}

impl Budget {
    pub fn from_secs(secs: f64) -> Self {
        Self { secs }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.secs)
    }

    pub fn label(&self) -> String {
        if self.secs.fract() == 0.0 {
            format!("{}", self.secs as u64)
        } else {
            format!("{}", self.secs)
        }
    }
}

impl std::fmt::Display for Budget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The budgets the benchmark runs at by default.
pub fn default_budgets() -> Vec<Budget> {
    [0.5, 1.0, 2.0, 4.0].into_iter().map(Budget::from_secs).collect()
}

/// Per-(program, budget) outcome of the accuracy evaluator.
///
/// `total` counts every attempted input, including timeouts and runtime
/// errors; `correct` counts exact textual matches only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub correct: usize,
    pub total: usize,
}

impl Tally {
    /// Percentage score in [0, 100], or `None` when nothing could be
    /// evaluated. A 0 here always means "evaluated and got everything
    /// wrong", never "had nothing to evaluate".
    pub fn score(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some(self.correct as f64 / self.total as f64 * 100.0)
    }
}
