//! Execution of untrusted candidate programs.
//!
//! Every candidate runs in its own child process with piped stdio and a hard
//! wall-clock deadline. The child is killed and reaped before `run` returns
//! on the timeout path; `kill_on_drop` covers every other exit path, so no
//! candidate process can outlive its call.

use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tracing::{debug, warn};

/// Result of one execution of a candidate program for one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The program terminated quietly; captured stdout with surrounding
    /// whitespace stripped. Compared verbatim against the expected term.
    Output(String),
    /// The deadline elapsed. The child has been killed and reaped.
    Timeout,
    /// The program failed to start, or terminated with anything on stderr.
    /// Stdout is discarded in that case.
    RuntimeError,
}

/// Runs candidate programs through an interpreter (`python3 <program>` by
/// default). The interpreter is configurable so tests can use `sh`.
#[derive(Debug, Clone)]
pub struct ProgramRunner {
    interpreter: OsString,
}

impl ProgramRunner {
    pub fn new(interpreter: impl Into<OsString>) -> Self {
        Self { interpreter: interpreter.into() }
    }

    pub fn python3() -> Self {
        Self::new("python3")
    }

    /// Execute `program` once, feeding the decimal text of `input` on stdin.
    ///
    /// Timeouts and candidate failures are outcomes, not errors: a broken
    /// candidate must never abort the batch.
    pub async fn run(&self, program: &Path, input: i64, budget: Duration) -> RunOutcome {
        let mut cmd = Command::new(&self.interpreter);
        cmd.arg(program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // Own process group so the timeout kill reaches the candidate's
        // descendants, not just the interpreter.
        #[cfg(unix)]
        cmd.process_group(0);
        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(program = %program.display(), error = %e, "failed to spawn candidate program");
                return RunOutcome::RuntimeError;
            }
        };

        if let Some(mut stdin) = child.stdin.take() {
            // A candidate may exit without reading its input; a broken pipe
            // here is its own runtime error to produce, not ours.
            let _ = stdin.write_all(input.to_string().as_bytes()).await;
            let _ = stdin.shutdown().await;
        }

        // Drain the pipes concurrently with the wait: a chatty candidate
        // must not deadlock on a full pipe buffer.
        let stdout_task = tokio::spawn(drain(child.stdout.take()));
        let stderr_task = tokio::spawn(drain(child.stderr.take()));

        let status = match tokio::time::timeout(budget, child.wait()).await {
            Err(_elapsed) => {
                kill_process_group(&child);
                let _ = child.start_kill();
                // Reap before returning so the pid is gone, not a zombie.
                let _ = child.wait().await;
                stdout_task.abort();
                stderr_task.abort();
                return RunOutcome::Timeout;
            }
            Ok(Err(e)) => {
                warn!(program = %program.display(), error = %e, "failed waiting on candidate program");
                return RunOutcome::RuntimeError;
            }
            Ok(Ok(status)) => status,
        };

        let stdout = stdout_task.await.unwrap_or_default();
        let stderr = stderr_task.await.unwrap_or_default();

        if !stderr.is_empty() {
            debug!(
                program = %program.display(),
                input,
                stderr = %String::from_utf8_lossy(&stderr).trim(),
                "candidate program wrote to stderr"
            );
            return RunOutcome::RuntimeError;
        }

        debug!(program = %program.display(), input, exit = ?status.code(), "candidate program finished");
        RunOutcome::Output(String::from_utf8_lossy(&stdout).trim().to_string())
    }
}

#[cfg(unix)]
fn kill_process_group(child: &tokio::process::Child) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;
    if let Some(pid) = child.id() {
        let _ = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL);
    }
}

#[cfg(not(unix))]
fn kill_process_group(_child: &tokio::process::Child) {}

async fn drain<R: AsyncRead + Unpin>(pipe: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf).await;
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn sh() -> ProgramRunner {
        ProgramRunner::new("sh")
    }

    fn script(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[tokio::test]
    async fn captures_stripped_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(&dir, "echo.sh", "read n\necho \" $n \"\n");
        let out = sh().run(&program, 7, Duration::from_secs(4)).await;
        assert_eq!(out, RunOutcome::Output("7".to_string()));
    }

    #[tokio::test]
    async fn stderr_means_runtime_error_even_with_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(&dir, "noisy.sh", "read n\necho 42\necho boom >&2\n");
        let out = sh().run(&program, 0, Duration::from_secs(4)).await;
        assert_eq!(out, RunOutcome::RuntimeError);
    }

    #[tokio::test]
    async fn nonzero_exit_with_quiet_stderr_still_yields_output() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(&dir, "exit1.sh", "read n\necho 5\nexit 1\n");
        let out = sh().run(&program, 0, Duration::from_secs(4)).await;
        assert_eq!(out, RunOutcome::Output("5".to_string()));
    }

    #[tokio::test]
    async fn deadline_kills_the_child() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(&dir, "slow.sh", "sleep 10\necho done\n");
        let started = Instant::now();
        let out = sh().run(&program, 0, Duration::from_millis(300)).await;
        assert_eq!(out, RunOutcome::Timeout);
        assert!(
            started.elapsed() < Duration::from_secs(5),
            "timeout path must not wait for the candidate to finish"
        );
    }

    #[tokio::test]
    async fn missing_program_is_a_runtime_error() {
        let out = sh()
            .run(Path::new("/nonexistent/candidate.sh"), 0, Duration::from_secs(1))
            .await;
        assert_eq!(out, RunOutcome::RuntimeError);
    }

    #[tokio::test]
    async fn missing_interpreter_is_a_runtime_error() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(&dir, "p.sh", "echo 1\n");
        let out = ProgramRunner::new("definitely-not-an-interpreter")
            .run(&program, 0, Duration::from_secs(1))
            .await;
        assert_eq!(out, RunOutcome::RuntimeError);
    }

    #[tokio::test]
    async fn candidate_that_ignores_stdin_still_runs() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(&dir, "deaf.sh", "echo 9\n");
        let out = sh().run(&program, 123, Duration::from_secs(4)).await;
        assert_eq!(out, RunOutcome::Output("9".to_string()));
    }
}
