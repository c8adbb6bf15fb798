//! Agent-callable tools.
//!
//! Tools are async trait objects the model can invoke during a turn. Each
//! tool provides its own OpenAI function definition and returns a JSON value
//! that is relayed back to the model and into the event stream.

pub mod cluster;
pub mod docs;
pub mod kubectl;

use crate::config::Config;
use crate::confirm::ConfirmationGate;
use crate::docs::DocsClient;
use crate::error::ToolError;
use crate::kubectl::KubectlExecutor;
use crate::types::ToolDefinition;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Tool trait
// ---------------------------------------------------------------------------

/// A tool that can be invoked by the model.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name matching what the model will call.
    fn name(&self) -> &'static str;

    /// OpenAI-format tool definition for inclusion in API requests.
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with the given JSON arguments string.
    async fn execute(&self, arguments: &str) -> Result<serde_json::Value, ToolError>;
}

/// Parse a tool's JSON argument object.
pub(crate) fn parse_args<T: DeserializeOwned>(arguments: &str) -> Result<T, ToolError> {
    let raw = if arguments.trim().is_empty() {
        "{}"
    } else {
        arguments
    };
    serde_json::from_str(raw).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

// ---------------------------------------------------------------------------
// Tool registry
// ---------------------------------------------------------------------------

/// Registry of available tools.
///
/// The session sends all registered tool definitions to the API, and
/// dispatches tool calls through this registry.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool.
    pub fn register(&mut self, tool: impl Tool + 'static) {
        self.tools.push(Box::new(tool));
    }

    /// Get tool definitions for the API request.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    /// Registered tool names, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Find a tool by name and execute it.
    pub async fn execute(
        &self,
        name: &str,
        arguments: &str,
    ) -> Result<serde_json::Value, ToolError> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| ToolError::ExecutionFailed(format!("unknown tool: {name}")))?;
        tool.execute(arguments).await
    }

    /// True if no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The fixed assistant tool set: docs lookup, kubectl execution and
/// context introspection.
pub fn kubemate_tools(config: &Config, gate: ConfirmationGate) -> ToolRegistry {
    let docs = Arc::new(DocsClient::new(&config.docs));
    let executor = KubectlExecutor::new(
        config.kubectl.program.clone(),
        Duration::from_secs(config.kubectl.timeout_secs.max(1)),
    );

    let mut registry = ToolRegistry::new();
    registry.register(docs::SearchDocsTool::new(Arc::clone(&docs)));
    registry.register(docs::FetchDocPageTool::new(docs));
    registry.register(kubectl::RunKubectlTool::new(executor, gate));
    registry.register(cluster::GetClusterContextTool::new(
        config.kubectl.program.clone(),
        Duration::from_secs(config.kubectl.context_timeout_secs.max(1)),
    ));
    registry
}
