//! Agent conversation layer.
//!
//! The orchestrator talks to the agent through two traits:
//! [`AgentBackend`] creates sessions and owns the transport, and
//! [`AgentSession`] runs one streaming conversation. Sessions publish their
//! progress as [`SessionEvent`]s on a per-turn [`Subscription`].
//!
//! - `events`: event model and subscription hub
//! - `chat`: backend built on the model API tool loop
//! - `manager`: session lifecycle and reconnect

use crate::error::SessionError;
use crate::tools::ToolRegistry;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

mod chat;
mod events;
mod manager;

pub use chat::{ChatBackend, ChatSettings};
pub use events::{EventHub, SessionEvent, Subscription};
pub use manager::SessionManager;

/// Everything a backend needs to open a conversation.
#[derive(Clone)]
pub struct SessionConfig {
    /// Fixed system prompt (persona plus operating rules).
    pub system_prompt: String,
    /// Tools the agent may call.
    pub tools: Arc<ToolRegistry>,
}

/// Creates conversations and owns the underlying transport.
#[async_trait]
pub trait AgentBackend: Send + Sync {
    /// Open a new conversation.
    async fn create(&self, config: SessionConfig) -> Result<Arc<dyn AgentSession>, SessionError>;

    /// Shut the transport down. Later `create` calls fail.
    async fn stop(&self);
}

/// One live conversation.
#[async_trait]
pub trait AgentSession: Send + Sync {
    /// Subscribe to streamed events. Dropping the handle unsubscribes.
    fn subscribe(&self) -> Subscription;

    /// Submit one user turn and wait up to `timeout` for the agent to finish.
    ///
    /// Only one send may be outstanding; a concurrent call fails with
    /// [`SessionError::Busy`].
    async fn send(&self, prompt: &str, timeout: Duration) -> Result<(), SessionError>;

    /// Tear the conversation down. A second call fails with
    /// [`SessionError::Disposed`].
    async fn destroy(&self) -> Result<(), SessionError>;
}
