//! Accuracy evaluation of one candidate program against one sequence.

use crate::exec::{ProgramRunner, RunOutcome};
use crate::model::{Sequence, Tally};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Run `program` against every known term of `sequence`, one input at a
/// time, and tally exact textual matches.
///
/// The input for the term at position `index` is `index + offset`. Timeouts
/// and runtime errors count toward the total but never toward correct, and
/// never stop the sweep: every term is attempted exactly once, so a
/// program that is intermittently right still gets full diagnostics.
pub async fn evaluate(
    runner: &ProgramRunner,
    sequence: &Sequence,
    program: &Path,
    offset: i64,
    budget: Duration,
) -> Tally {
    let mut tally = Tally::default();
    for (index, expected) in sequence.terms.iter().enumerate() {
        let input = index as i64 + offset;
        tally.total += 1;
        match runner.run(program, input, budget).await {
            RunOutcome::Output(output) => {
                if output == *expected {
                    tally.correct += 1;
                } else {
                    debug!(
                        program = %program.display(),
                        input,
                        expected = %expected,
                        got = %output,
                        "mismatch"
                    );
                }
            }
            RunOutcome::Timeout | RunOutcome::RuntimeError => {}
        }
    }
    tally
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Sequence;

    fn sh() -> ProgramRunner {
        ProgramRunner::new("sh")
    }

    fn sequence(terms: &[&str]) -> Sequence {
        Sequence {
            id: "A000001".to_string(),
            terms: terms.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn script(dir: &tempfile::TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("candidate.sh");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[tokio::test]
    async fn constant_zero_program_matches_only_zero_terms() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(&dir, "read n\necho 0\n");
        let seq = sequence(&["0", "1", "1", "1", "2"]);
        let tally = evaluate(&sh(), &seq, &program, 0, Duration::from_secs_f64(0.5)).await;
        assert_eq!(tally, Tally { correct: 1, total: 5 });
        assert_eq!(tally.score(), Some(20.0));
    }

    #[tokio::test]
    async fn identity_program_sees_offset_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(&dir, "read n\necho \"$n\"\n");
        // With offset 3 the inputs are 3..7, so echoing the input matches
        // a catalogue that lists the integers from 3.
        let seq = sequence(&["3", "4", "5", "6", "7"]);
        let tally = evaluate(&sh(), &seq, &program, 3, Duration::from_secs(4)).await;
        assert_eq!(tally, Tally { correct: 5, total: 5 });
        assert_eq!(tally.score(), Some(100.0));
    }

    #[tokio::test]
    async fn sleeping_program_times_out_on_every_term() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(&dir, "sleep 10\necho 0\n");
        let seq = sequence(&["0", "1", "1", "1", "2"]);
        let tally = evaluate(&sh(), &seq, &program, 0, Duration::from_millis(200)).await;
        assert_eq!(tally, Tally { correct: 0, total: 5 });
        assert_eq!(tally.score(), Some(0.0));
    }

    #[tokio::test]
    async fn textual_equality_is_strict() {
        let dir = tempfile::tempdir().unwrap();
        // "5.0" against expected "5" must not match; numeric coercion is
        // exactly what the grader refuses to do.
        let program = script(&dir, "read n\necho 5.0\n");
        let seq = sequence(&["5"]);
        let tally = evaluate(&sh(), &seq, &program, 0, Duration::from_secs(4)).await;
        assert_eq!(tally, Tally { correct: 0, total: 1 });
    }

    #[tokio::test]
    async fn surrounding_whitespace_is_stripped_before_comparison() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(&dir, "read n\necho \" 5 \"\n");
        let seq = sequence(&["5"]);
        let tally = evaluate(&sh(), &seq, &program, 0, Duration::from_secs(4)).await;
        assert_eq!(tally, Tally { correct: 1, total: 1 });
    }

    #[tokio::test]
    async fn inputs_are_enumerated_in_order_from_the_offset() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("inputs.log");
        let program = script(
            &dir,
            &format!("read n\necho \"$n\" >> {}\necho 0\n", log.display()),
        );
        let seq = sequence(&["x", "y", "z"]);
        let tally = evaluate(&sh(), &seq, &program, 2, Duration::from_secs(4)).await;
        assert_eq!(tally.total, 3);
        assert_eq!(std::fs::read_to_string(&log).unwrap(), "2\n3\n4\n");
    }

    #[tokio::test]
    async fn empty_sequence_yields_no_score() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(&dir, "read n\necho 0\n");
        let seq = sequence(&[]);
        let tally = evaluate(&sh(), &seq, &program, 0, Duration::from_secs(1)).await;
        assert_eq!(tally, Tally::default());
        assert_eq!(tally.score(), None);
    }
}
