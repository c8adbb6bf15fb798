//! Cluster CLI execution.
//!
//! - `mod.rs`: one-shot command execution with timeout and result normalization
//! - `context`: read-only current-context introspection

use serde::Serialize;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

mod context;

pub use context::{fetch_cluster_info, ClusterInfo};

/// Normalized outcome of one cluster CLI call, shaped for the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CommandResult {
    Success { output: String },
    Error { output: String },
    Cancelled { message: String },
}

impl CommandResult {
    /// Result returned when the operator declines a command.
    pub fn declined() -> Self {
        Self::Cancelled {
            message: "User declined the command".into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            serde_json::json!({ "status": "error", "output": e.to_string() })
        })
    }
}

/// Runs cluster CLI commands with a per-call timeout.
#[derive(Debug, Clone)]
pub struct KubectlExecutor {
    program: String,
    timeout: Duration,
}

impl KubectlExecutor {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run `command` and normalize the outcome. Never fails.
    ///
    /// A leading `kubectl` token is dropped so both `kubectl get pods` and
    /// `get pods` work.
    pub async fn execute(&self, command: &str) -> CommandResult {
        let args = command_args(command);
        tracing::debug!(program = %self.program, ?args, "running cluster command");
        match run_captured(&self.program, &args, self.timeout).await {
            Ok(output) if output.success => CommandResult::Success {
                output: output.stdout,
            },
            Ok(output) => {
                let diagnostic = if output.stderr.trim().is_empty() {
                    format!("{} exited with {}", self.program, output.exit_label())
                } else {
                    output.stderr
                };
                CommandResult::Error { output: diagnostic }
            }
            Err(message) => {
                tracing::warn!(program = %self.program, %message, "cluster command failed");
                CommandResult::Error { output: message }
            }
        }
    }
}

/// Tokenize a command line, dropping one leading `kubectl`.
pub(crate) fn command_args(command: &str) -> Vec<String> {
    let mut tokens = command.split_whitespace().peekable();
    if tokens.peek() == Some(&"kubectl") {
        tokens.next();
    }
    tokens.map(str::to_string).collect()
}

/// Captured output of a finished child process.
pub(crate) struct CapturedOutput {
    pub(crate) success: bool,
    pub(crate) code: Option<i32>,
    pub(crate) stdout: String,
    pub(crate) stderr: String,
}

impl CapturedOutput {
    fn exit_label(&self) -> String {
        match self.code {
            Some(code) => format!("exit code {code}"),
            None => "a signal".to_string(),
        }
    }
}

/// Spawn `program` and wait up to `limit` for it to finish.
///
/// Spawn and timeout failures come back as a human-readable message.
pub(crate) async fn run_captured(
    program: &str,
    args: &[String],
    limit: Duration,
) -> Result<CapturedOutput, String> {
    let mut cmd = Command::new(program);
    // Timeouts drop the future; the child must not outlive it.
    cmd.kill_on_drop(true);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let child = cmd.spawn().map_err(|e| format!("{program}: {e}"))?;
    let output = match timeout(limit, child.wait_with_output()).await {
        Ok(result) => result.map_err(|e| format!("{program}: {e}"))?,
        Err(_) => {
            return Err(format!(
                "{program} timed out after {}",
                format_duration(limit)
            ))
        }
    };

    Ok(CapturedOutput {
        success: output.status.success(),
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Human-oriented duration formatting used in timeout messages.
pub(crate) fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();
    if secs == 0 {
        return format!("{millis}ms");
    }
    if millis == 0 {
        if secs % 60 == 0 {
            return format!("{}m", secs / 60);
        }
        return format!("{secs}s");
    }
    format!("{secs}.{millis:03}s")
}
