//! Agent backend built on the chat-completions tool loop.
//!
//! Each [`ChatSession`] keeps its own message history. A turn sends the
//! history plus tool definitions to the model, executes requested tools
//! (publishing start/complete events around each call), feeds the results
//! back, and finishes when the model answers without tool calls.

use super::events::{EventHub, SessionEvent, Subscription};
use super::{AgentBackend, AgentSession, SessionConfig};
use crate::api::ModelClient;
use crate::config::Config;
use crate::error::SessionError;
use crate::tools::ToolRegistry;
use crate::types::{ChatRequest, Message};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Model settings shared by every session of one backend.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub model: String,
    pub temperature: Option<f64>,
    pub max_iterations: usize,
    /// Set when the configured endpoint needs a key and none was resolved.
    pub missing_api_key: bool,
}

impl ChatSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.api.model.clone(),
            temperature: config.agent.temperature,
            max_iterations: config.agent.max_iterations.max(1),
            missing_api_key: config.api.api_key.trim().is_empty()
                && config.api.base_url.contains("api.openai.com"),
        }
    }
}

/// Backend that opens [`ChatSession`]s over a shared model client.
pub struct ChatBackend {
    client: Arc<dyn ModelClient>,
    settings: ChatSettings,
    stopped: AtomicBool,
}

impl ChatBackend {
    pub fn new(client: Arc<dyn ModelClient>, settings: ChatSettings) -> Self {
        Self {
            client,
            settings,
            stopped: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl AgentBackend for ChatBackend {
    async fn create(&self, config: SessionConfig) -> Result<Arc<dyn AgentSession>, SessionError> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(SessionError::Disposed);
        }
        if self.settings.missing_api_key {
            return Err(SessionError::Init(
                "no API key configured (set OPENAI_API_KEY or KUBEMATE_API_KEY)".into(),
            ));
        }
        tracing::info!(
            model = %self.settings.model,
            tools = ?config.tools.names(),
            "creating chat session"
        );
        Ok(Arc::new(ChatSession {
            client: Arc::clone(&self.client),
            settings: self.settings.clone(),
            tools: config.tools,
            hub: EventHub::new(),
            history: Mutex::new(vec![Message::system(config.system_prompt)]),
            busy: AtomicBool::new(false),
            destroyed: AtomicBool::new(false),
        }))
    }

    async fn stop(&self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            tracing::info!("chat backend stopped");
        }
    }
}

/// One conversation with the model.
pub struct ChatSession {
    client: Arc<dyn ModelClient>,
    settings: ChatSettings,
    tools: Arc<ToolRegistry>,
    hub: EventHub,
    history: Mutex<Vec<Message>>,
    busy: AtomicBool,
    destroyed: AtomicBool,
}

/// Clears the busy flag when a send finishes or is dropped.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ChatSession {
    /// Run one turn on a copy of the history; the copy is committed only
    /// when the turn completes.
    async fn run_turn(&self, prompt: &str) -> Result<(), SessionError> {
        let mut history = self.history.lock().await;
        let mut messages = history.clone();
        messages.push(Message::user(prompt));

        for iteration in 1..=self.settings.max_iterations {
            if self.destroyed.load(Ordering::SeqCst) {
                return Err(SessionError::Disposed);
            }
            let request = ChatRequest {
                model: self.settings.model.clone(),
                messages: messages.clone(),
                tools: (!self.tools.is_empty()).then(|| self.tools.definitions()),
                temperature: self.settings.temperature,
            };
            tracing::debug!(iteration, messages = request.messages.len(), "model request");
            let response = self.client.chat(&request).await?;
            let assistant = response
                .choices
                .into_iter()
                .next()
                .map(|choice| choice.message)
                .ok_or_else(|| SessionError::Turn("model returned no choices".into()))?;

            let calls = assistant.requested_tool_calls().to_vec();
            let text = assistant
                .content
                .clone()
                .filter(|content| !content.trim().is_empty());
            messages.push(assistant);

            if calls.is_empty() {
                self.hub.publish(SessionEvent::AssistantMessage {
                    content: text.unwrap_or_default(),
                });
                *history = messages;
                return Ok(());
            }

            if let Some(content) = text {
                self.hub.publish(SessionEvent::AssistantMessage { content });
            }
            for call in calls {
                let arguments = serde_json::from_str(&call.function.arguments)
                    .unwrap_or_else(|_| serde_json::Value::String(call.function.arguments.clone()));
                self.hub.publish(SessionEvent::ToolExecutionStart {
                    tool_call_id: call.id.clone(),
                    tool_name: call.function.name.clone(),
                    arguments,
                });

                let result = match self
                    .tools
                    .execute(&call.function.name, &call.function.arguments)
                    .await
                {
                    Ok(value) => value,
                    Err(err) => {
                        tracing::warn!(tool = %call.function.name, error = %err, "tool failed");
                        serde_json::json!({ "status": "error", "output": err.to_string() })
                    }
                };

                let content = match &result {
                    serde_json::Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                self.hub.publish(SessionEvent::ToolExecutionComplete {
                    tool_call_id: call.id.clone(),
                    tool_name: call.function.name.clone(),
                    result,
                });
                messages.push(Message::tool_result(call.id, content));
            }
        }

        Err(SessionError::Turn(format!(
            "agent stopped after {} tool rounds without a final answer",
            self.settings.max_iterations
        )))
    }
}

#[async_trait]
impl AgentSession for ChatSession {
    fn subscribe(&self) -> Subscription {
        self.hub.subscribe()
    }

    async fn send(&self, prompt: &str, timeout: Duration) -> Result<(), SessionError> {
        if self.destroyed.load(Ordering::SeqCst) {
            return Err(SessionError::Disposed);
        }
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SessionError::Busy);
        }
        let _busy = BusyGuard(&self.busy);

        match tokio::time::timeout(timeout, self.run_turn(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(SessionError::Timeout(timeout)),
        }
    }

    async fn destroy(&self) -> Result<(), SessionError> {
        if self.destroyed.swap(true, Ordering::SeqCst) {
            return Err(SessionError::Disposed);
        }
        tracing::info!("chat session destroyed");
        Ok(())
    }
}
