//! Session event stream.
//!
//! A session publishes [`SessionEvent`]s through an [`EventHub`]; consumers
//! hold a [`Subscription`] for the duration of one turn. Dropping the
//! subscription unsubscribes it.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::sync::mpsc;

/// One streamed event from an agent session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    #[serde(rename = "assistant.message")]
    AssistantMessage { content: String },
    #[serde(rename = "tool.execution_start")]
    ToolExecutionStart {
        tool_call_id: String,
        tool_name: String,
        arguments: serde_json::Value,
    },
    #[serde(rename = "tool.execution_complete")]
    ToolExecutionComplete {
        tool_call_id: String,
        tool_name: String,
        result: serde_json::Value,
    },
}

impl SessionEvent {
    /// Dotted wire name of this event kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AssistantMessage { .. } => "assistant.message",
            Self::ToolExecutionStart { .. } => "tool.execution_start",
            Self::ToolExecutionComplete { .. } => "tool.execution_complete",
        }
    }
}

#[derive(Default)]
struct HubState {
    next_id: u64,
    subscribers: Vec<(u64, mpsc::UnboundedSender<SessionEvent>)>,
}

/// Fan-out point for session events.
#[derive(Clone, Default)]
pub struct EventHub {
    state: Arc<Mutex<HubState>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber.
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = lock(&self.state);
        state.next_id = state.next_id.wrapping_add(1);
        let id = state.next_id;
        state.subscribers.push((id, tx));
        Subscription {
            id,
            rx,
            hub: Arc::downgrade(&self.state),
        }
    }

    /// Deliver `event` to every live subscriber.
    pub fn publish(&self, event: SessionEvent) {
        let mut state = lock(&self.state);
        tracing::debug!(kind = event.kind(), subscribers = state.subscribers.len(), "session event");
        state
            .subscribers
            .retain(|(_, tx)| tx.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.state).subscribers.len()
    }
}

/// Receiving side of one subscription. Unsubscribes on drop.
pub struct Subscription {
    id: u64,
    rx: mpsc::UnboundedReceiver<SessionEvent>,
    hub: Weak<Mutex<HubState>>,
}

impl Subscription {
    /// Next event, or `None` once the hub is gone.
    pub async fn recv(&mut self) -> Option<SessionEvent> {
        self.rx.recv().await
    }

    /// Next already-delivered event, without waiting.
    pub fn try_recv(&mut self) -> Option<SessionEvent> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(state) = self.hub.upgrade() {
            lock(&state).subscribers.retain(|(id, _)| *id != self.id);
        }
    }
}

fn lock(state: &Mutex<HubState>) -> MutexGuard<'_, HubState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(text: &str) -> SessionEvent {
        SessionEvent::AssistantMessage {
            content: text.to_string(),
        }
    }

    #[test]
    fn events_use_dotted_type_tags() {
        let start = SessionEvent::ToolExecutionStart {
            tool_call_id: "call_1".into(),
            tool_name: "run_kubectl".into(),
            arguments: serde_json::json!({"command": "get pods"}),
        };
        let value = serde_json::to_value(&start).unwrap();
        assert_eq!(value["type"], "tool.execution_start");
        assert_eq!(value["tool_call_id"], "call_1");

        let parsed: SessionEvent =
            serde_json::from_str(r#"{"type":"assistant.message","content":"hi"}"#).unwrap();
        assert_eq!(parsed, message("hi"));
        assert_eq!(parsed.kind(), "assistant.message");
    }

    #[tokio::test]
    async fn subscribers_receive_in_publish_order() {
        let hub = EventHub::new();
        let mut sub = hub.subscribe();
        hub.publish(message("one"));
        hub.publish(message("two"));
        assert_eq!(sub.recv().await, Some(message("one")));
        assert_eq!(sub.try_recv(), Some(message("two")));
        assert_eq!(sub.try_recv(), None);
    }

    #[test]
    fn drop_unsubscribes() {
        let hub = EventHub::new();
        let first = hub.subscribe();
        let second = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 2);
        drop(first);
        assert_eq!(hub.subscriber_count(), 1);
        drop(second);
        assert_eq!(hub.subscriber_count(), 0);
        hub.publish(message("nobody listening"));
    }

    #[tokio::test]
    async fn subscription_ends_when_hub_is_dropped() {
        let hub = EventHub::new();
        let mut sub = hub.subscribe();
        drop(hub);
        assert_eq!(sub.recv().await, None);
    }
}
