//! Process-backed code runner — pipes student source into an interpreter.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};
use tutorbot_config::RunnerConfig;
use tutorbot_core::error::Error;
use tutorbot_core::runner::CodeRunner;
use tutorbot_core::student::RunResult;

/// Runs source through an interpreter command line, feeding it on stdin.
pub struct ProcessRunner {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl ProcessRunner {
    /// `command` is split on whitespace: `"python3 -"` → `python3` with arg `-`.
    pub fn new(command: &str, timeout: Duration) -> Option<Self> {
        let mut parts = command.split_whitespace().map(String::from);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
            timeout,
        })
    }

    /// The configured interpreter for a language id.
    pub fn for_language(config: &RunnerConfig, language_id: &str) -> Option<Self> {
        let command = config.interpreters.get(language_id)?;
        Self::new(command, Duration::from_secs(config.timeout_secs))
    }
}

#[async_trait]
impl CodeRunner for ProcessRunner {
    fn name(&self) -> &str {
        &self.program
    }

    async fn run(&self, source: &str) -> Result<RunResult, Error> {
        debug!(program = %self.program, args = ?self.args, "Running student code");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::Runner(format!("failed to start '{}': {e}", self.program)))?;

        // The write shares the timeout: an interpreter that never drains stdin
        // blocks it once the pipe buffer fills.
        let stdin = child.stdin.take();
        let feed_and_wait = async move {
            if let Some(mut stdin) = stdin {
                stdin
                    .write_all(source.as_bytes())
                    .await
                    .map_err(|e| Error::Runner(format!("failed to write source: {e}")))?;
            }
            child
                .wait_with_output()
                .await
                .map_err(|e| Error::Runner(e.to_string()))
        };

        let output = match tokio::time::timeout(self.timeout, feed_and_wait).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(program = %self.program, timeout_secs = self.timeout.as_secs(), "Student code timed out");
                return Ok(RunResult::completed(
                    "",
                    "",
                    format!("Timed out after {}s", self.timeout.as_secs()),
                ));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let error = if output.status.success() {
            String::new()
        } else {
            let code = output.status.code().unwrap_or(-1);
            warn!(program = %self.program, exit_code = code, "Student code failed");
            format!("Process exited with code {code}")
        };

        Ok(RunResult::completed(stdout, stderr, error))
    }
}
