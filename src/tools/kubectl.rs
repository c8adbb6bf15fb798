//! `run_kubectl`: risk-gated cluster command execution.

use async_trait::async_trait;
use serde::Deserialize;

use super::{parse_args, Tool};
use crate::confirm::ConfirmationGate;
use crate::error::ToolError;
use crate::kubectl::{CommandResult, KubectlExecutor};
use crate::risk;
use crate::types::ToolDefinition;

/// Runs cluster commands, asking the operator first when they are destructive.
pub struct RunKubectlTool {
    executor: KubectlExecutor,
    gate: ConfirmationGate,
}

impl RunKubectlTool {
    pub fn new(executor: KubectlExecutor, gate: ConfirmationGate) -> Self {
        Self { executor, gate }
    }
}

#[derive(Deserialize)]
struct Args {
    command: String,
}

#[async_trait]
impl Tool for RunKubectlTool {
    fn name(&self) -> &'static str {
        "run_kubectl"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            self.name(),
            "Execute a kubectl command against the current Kubernetes cluster. Destructive operations (delete, drain, cordon, taint, replace) are shown to the user and require explicit approval.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "command": {
                        "type": "string",
                        "description": "The kubectl command to execute (e.g. 'kubectl get pods -n default')"
                    }
                },
                "required": ["command"]
            }),
        )
    }

    async fn execute(&self, arguments: &str) -> Result<serde_json::Value, ToolError> {
        let args: Args = parse_args(arguments)?;
        let destructive = risk::classify(&args.command);

        if destructive {
            let approved = self.gate.request(&args.command, destructive).await?;
            if !approved {
                tracing::info!(command = %args.command, "destructive command declined");
                return Ok(CommandResult::declined().to_json());
            }
        }

        Ok(self.executor.execute(&args.command).await.to_json())
    }
}
