use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::AgentError;

/// One prompt sent to a language model on behalf of an agent.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// Name of the calling agent (e.g. `CollectorAgent`, `Researcher_1`).
    pub agent_name: String,
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub timeout: Duration,
}

/// Text completion backend shared by every agent. Mockable for testing.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    async fn complete(&self, request: &LlmRequest) -> Result<String, AgentError>;
}

/// Backend that shells out to the `claude` CLI.
#[derive(Debug, Clone, Default)]
pub struct ClaudeCliBackend {
    program: Option<String>,
}

impl ClaudeCliBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different executable than `claude` on PATH.
    pub fn with_program(program: &str) -> Self {
        Self {
            program: Some(program.to_string()),
        }
    }

    fn program(&self) -> &str {
        self.program.as_deref().unwrap_or("claude")
    }
}

#[async_trait]
impl LlmBackend for ClaudeCliBackend {
    async fn complete(&self, request: &LlmRequest) -> Result<String, AgentError> {
        invoke_claude(self.program(), request).await
    }
}

/// Invoke the `claude` CLI with a system prompt and user prompt.
/// Returns the raw stdout text.
pub async fn invoke_claude(program: &str, request: &LlmRequest) -> Result<String, AgentError> {
    debug!(agent = %request.agent_name, model = %request.model, "Invoking claude CLI");

    let result = tokio::time::timeout(request.timeout, async {
        Command::new(program)
            .args([
                "-p",
                &request.user_prompt,
                "--system-prompt",
                &request.system_prompt,
                "--model",
                &request.model,
                "--output-format",
                "text",
            ])
            .kill_on_drop(true)
            .output()
            .await
    })
    .await
    .map_err(|_| AgentError::Timeout(request.timeout.as_secs()))?
    .map_err(|e| AgentError::Cli(format!("Failed to spawn {program}: {e}")))?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        warn!(agent = %request.agent_name, status = %result.status, stderr = %stderr, "Claude CLI failed");
        return Err(classify_failure(&result.status.to_string(), &stderr));
    }

    let stdout = String::from_utf8_lossy(&result.stdout).to_string();
    if stdout.trim().is_empty() {
        return Err(AgentError::Cli("Claude returned empty response".to_string()));
    }

    Ok(stdout)
}

/// Map a failed CLI run to an error, separating capacity problems from the rest.
pub fn classify_failure(status: &str, stderr: &str) -> AgentError {
    let lower = stderr.to_lowercase();
    let overloaded = ["overloaded", "529", "503", "unavailable", "high demand"]
        .iter()
        .any(|marker| lower.contains(marker));

    if overloaded {
        AgentError::Overloaded(stderr.trim().to_string())
    } else {
        AgentError::Cli(format!("claude exited {status}: {}", stderr.trim()))
    }
}

/// Check if the `claude` CLI is available on the system.
pub async fn check_cli_available() -> bool {
    match Command::new("claude").arg("--version").output().await {
        Ok(output) => output.status.success(),
        Err(_) => false,
    }
}
