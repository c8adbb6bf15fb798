//! `get_cluster_context`: current context, cluster and namespace.

use async_trait::async_trait;
use std::time::Duration;

use super::Tool;
use crate::error::ToolError;
use crate::kubectl::fetch_cluster_info;
use crate::types::ToolDefinition;

pub struct GetClusterContextTool {
    program: String,
    per_call: Duration,
}

impl GetClusterContextTool {
    pub fn new(program: impl Into<String>, per_call: Duration) -> Self {
        Self {
            program: program.into(),
            per_call,
        }
    }
}

#[async_trait]
impl Tool for GetClusterContextTool {
    fn name(&self) -> &'static str {
        "get_cluster_context"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            self.name(),
            "Retrieve current Kubernetes cluster context information including cluster name, namespace, and context name.",
            serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        )
    }

    async fn execute(&self, _arguments: &str) -> Result<serde_json::Value, ToolError> {
        let info = fetch_cluster_info(&self.program, self.per_call).await;
        serde_json::to_value(info).map_err(|e| ToolError::ExecutionFailed(e.to_string()))
    }
}
