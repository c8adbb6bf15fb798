//! Conversation timeline: the ordered view model rendered by the frontend.
//!
//! Entries are append-only. The single permitted mutation is a tool entry
//! moving from running to complete, located through the tool call id it was
//! started with, or settled as interrupted when its turn ends without a result.

use crate::agent::SessionEvent;
use std::collections::HashMap;

/// Speaker of a chat entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStatus {
    Running,
    Complete,
}

/// One row of the timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineEntry {
    Chat {
        role: ChatRole,
        content: String,
    },
    Tool {
        tool_name: String,
        status: ToolStatus,
        output: Option<String>,
    },
}

/// What one reducer step did, so the frontend can render incrementally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineChange {
    Appended(usize),
    Updated(usize),
    Ignored,
}

#[derive(Debug, Default)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
    /// Running tool entries keyed by tool call id.
    running: HashMap<String, usize>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&TimelineEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of tool entries still waiting for completion.
    pub fn running_count(&self) -> usize {
        self.running.len()
    }

    /// Append a chat line (user input, assistant text or a status notice).
    pub fn push_chat(&mut self, role: ChatRole, content: impl Into<String>) -> TimelineChange {
        self.append(TimelineEntry::Chat {
            role,
            content: content.into(),
        })
    }

    /// Fold one session event into the timeline.
    pub fn apply(&mut self, event: &SessionEvent) -> TimelineChange {
        match event {
            SessionEvent::AssistantMessage { content } => {
                self.push_chat(ChatRole::Assistant, content.clone())
            }
            SessionEvent::ToolExecutionStart {
                tool_call_id,
                tool_name,
                ..
            } => {
                if self.running.contains_key(tool_call_id) {
                    tracing::debug!(%tool_call_id, "duplicate tool start ignored");
                    return TimelineChange::Ignored;
                }
                let change = self.append(TimelineEntry::Tool {
                    tool_name: tool_name.clone(),
                    status: ToolStatus::Running,
                    output: None,
                });
                if let TimelineChange::Appended(index) = change {
                    self.running.insert(tool_call_id.clone(), index);
                }
                change
            }
            SessionEvent::ToolExecutionComplete {
                tool_call_id,
                result,
                ..
            } => {
                let Some(index) = self.running.remove(tool_call_id) else {
                    tracing::debug!(%tool_call_id, "completion without running entry dropped");
                    return TimelineChange::Ignored;
                };
                match self.entries.get_mut(index) {
                    Some(TimelineEntry::Tool { status, output, .. }) => {
                        *status = ToolStatus::Complete;
                        *output = Some(format_tool_result(result));
                        TimelineChange::Updated(index)
                    }
                    _ => TimelineChange::Ignored,
                }
            }
        }
    }

    /// Complete every tool entry still running, in timeline order, with
    /// `note` as its output. Called when a turn ends before those tools
    /// reported back; their completions can no longer arrive.
    pub fn settle_running(&mut self, note: &str) -> Vec<TimelineChange> {
        let mut indices: Vec<usize> = self.running.drain().map(|(_, index)| index).collect();
        indices.sort_unstable();
        indices
            .into_iter()
            .filter_map(|index| match self.entries.get_mut(index) {
                Some(TimelineEntry::Tool { status, output, .. }) => {
                    *status = ToolStatus::Complete;
                    *output = Some(note.to_string());
                    Some(TimelineChange::Updated(index))
                }
                _ => None,
            })
            .collect()
    }

    fn append(&mut self, entry: TimelineEntry) -> TimelineChange {
        self.entries.push(entry);
        TimelineChange::Appended(self.entries.len() - 1)
    }
}

/// Tool output as shown to the operator: strings verbatim, anything else
/// pretty-printed JSON.
pub fn format_tool_result(result: &serde_json::Value) -> String {
    match result {
        serde_json::Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn start(id: &str, name: &str) -> SessionEvent {
        SessionEvent::ToolExecutionStart {
            tool_call_id: id.into(),
            tool_name: name.into(),
            arguments: json!({}),
        }
    }

    fn complete(id: &str, name: &str, result: serde_json::Value) -> SessionEvent {
        SessionEvent::ToolExecutionComplete {
            tool_call_id: id.into(),
            tool_name: name.into(),
            result,
        }
    }

    #[test]
    fn assistant_messages_append_chat_entries() {
        let mut timeline = Timeline::new();
        timeline.push_chat(ChatRole::User, "list pods");
        let change = timeline.apply(&SessionEvent::AssistantMessage {
            content: "Here they are".into(),
        });
        assert_eq!(change, TimelineChange::Appended(1));
        assert_eq!(
            timeline.get(1),
            Some(&TimelineEntry::Chat {
                role: ChatRole::Assistant,
                content: "Here they are".into()
            })
        );
    }

    #[test]
    fn completion_updates_the_started_entry_in_place() {
        let mut timeline = Timeline::new();
        assert_eq!(
            timeline.apply(&start("c1", "run_kubectl")),
            TimelineChange::Appended(0)
        );
        assert_eq!(timeline.running_count(), 1);
        assert_eq!(
            timeline.apply(&complete("c1", "run_kubectl", json!("pod-a\n"))),
            TimelineChange::Updated(0)
        );
        assert_eq!(timeline.len(), 1);
        assert_eq!(
            timeline.get(0),
            Some(&TimelineEntry::Tool {
                tool_name: "run_kubectl".into(),
                status: ToolStatus::Complete,
                output: Some("pod-a\n".into()),
            })
        );
        assert_eq!(timeline.running_count(), 0);
    }

    #[test]
    fn interleaved_tools_complete_their_own_entries() {
        let mut timeline = Timeline::new();
        timeline.apply(&start("a", "run_kubectl"));
        timeline.apply(&start("b", "search_k8s_docs"));
        assert_eq!(
            timeline.apply(&complete("a", "run_kubectl", json!("first"))),
            TimelineChange::Updated(0)
        );
        assert_eq!(
            timeline.apply(&complete("b", "search_k8s_docs", json!("second"))),
            TimelineChange::Updated(1)
        );
    }

    #[test]
    fn stray_and_duplicate_completions_are_dropped() {
        let mut timeline = Timeline::new();
        assert_eq!(
            timeline.apply(&complete("ghost", "run_kubectl", json!("x"))),
            TimelineChange::Ignored
        );
        assert!(timeline.is_empty());

        timeline.apply(&start("c1", "run_kubectl"));
        timeline.apply(&complete("c1", "run_kubectl", json!("done")));
        assert_eq!(
            timeline.apply(&complete("c1", "run_kubectl", json!("again"))),
            TimelineChange::Ignored
        );
        assert_eq!(timeline.len(), 1);
        match timeline.get(0) {
            Some(TimelineEntry::Tool { output, .. }) => assert_eq!(output.as_deref(), Some("done")),
            other => panic!("unexpected entry: {other:?}"),
        }
    }

    #[test]
    fn duplicate_start_for_running_call_is_ignored() {
        let mut timeline = Timeline::new();
        timeline.apply(&start("c1", "run_kubectl"));
        assert_eq!(
            timeline.apply(&start("c1", "run_kubectl")),
            TimelineChange::Ignored
        );
        assert_eq!(timeline.len(), 1);
    }

    #[test]
    fn settling_completes_running_entries_only() {
        let mut timeline = Timeline::new();
        timeline.apply(&start("a", "run_kubectl"));
        timeline.apply(&start("b", "fetch_k8s_doc_page"));
        timeline.apply(&complete("a", "run_kubectl", json!("ok")));
        timeline.apply(&start("c", "run_kubectl"));

        assert_eq!(
            timeline.settle_running("interrupted"),
            vec![TimelineChange::Updated(1), TimelineChange::Updated(2)]
        );
        assert_eq!(timeline.running_count(), 0);
        match timeline.get(0) {
            Some(TimelineEntry::Tool { output, .. }) => assert_eq!(output.as_deref(), Some("ok")),
            other => panic!("unexpected entry: {other:?}"),
        }
        assert_eq!(
            timeline.get(2),
            Some(&TimelineEntry::Tool {
                tool_name: "run_kubectl".into(),
                status: ToolStatus::Complete,
                output: Some("interrupted".into()),
            })
        );
        // A late completion for a settled call has nowhere to land.
        assert_eq!(
            timeline.apply(&complete("b", "fetch_k8s_doc_page", json!("late"))),
            TimelineChange::Ignored
        );
        assert!(timeline.settle_running("interrupted").is_empty());
    }

    #[test]
    fn structured_results_are_pretty_printed() {
        let value = json!({"status": "cancelled", "message": "User declined the command"});
        let text = format_tool_result(&value);
        assert!(text.contains('\n'));
        assert!(text.contains("\"status\": \"cancelled\""));
        assert_eq!(format_tool_result(&json!("raw")), "raw");
    }
}
