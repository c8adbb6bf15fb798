//! Documentation tools: `search_k8s_docs` and `fetch_k8s_doc_page`.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use super::{parse_args, Tool};
use crate::docs::DocsClient;
use crate::error::ToolError;
use crate::types::ToolDefinition;

/// Keyword search over kubernetes.io documentation.
pub struct SearchDocsTool {
    client: Arc<DocsClient>,
}

impl SearchDocsTool {
    pub fn new(client: Arc<DocsClient>) -> Self {
        Self { client }
    }
}

#[derive(Deserialize)]
struct SearchArgs {
    query: String,
}

#[async_trait]
impl Tool for SearchDocsTool {
    fn name(&self) -> &'static str {
        "search_k8s_docs"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            self.name(),
            "Search kubernetes.io documentation by keyword. Returns titles, URLs and optional snippets.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query keywords"
                    }
                },
                "required": ["query"]
            }),
        )
    }

    async fn execute(&self, arguments: &str) -> Result<serde_json::Value, ToolError> {
        let args: SearchArgs = parse_args(arguments)?;
        let results = self.client.search(&args.query).await;
        serde_json::to_value(results).map_err(|e| ToolError::ExecutionFailed(e.to_string()))
    }
}

/// Fetches one documentation page as Markdown.
pub struct FetchDocPageTool {
    client: Arc<DocsClient>,
}

impl FetchDocPageTool {
    pub fn new(client: Arc<DocsClient>) -> Self {
        Self { client }
    }
}

#[derive(Deserialize)]
struct FetchArgs {
    url: String,
}

#[async_trait]
impl Tool for FetchDocPageTool {
    fn name(&self) -> &'static str {
        "fetch_k8s_doc_page"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            self.name(),
            "Fetch a Kubernetes documentation page by URL and convert it to Markdown.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "url": {
                        "type": "string",
                        "description": "Full URL of the kubernetes.io page to fetch"
                    }
                },
                "required": ["url"]
            }),
        )
    }

    async fn execute(&self, arguments: &str) -> Result<serde_json::Value, ToolError> {
        let args: FetchArgs = parse_args(arguments)?;
        let url = args.url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ToolError::InvalidArguments(format!(
                "expected an absolute http(s) URL, got `{url}`"
            )));
        }
        let page = self.client.fetch_page(url).await?;
        Ok(serde_json::Value::String(page.to_markdown()))
    }
}
