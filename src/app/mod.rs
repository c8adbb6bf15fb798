//! Top-level controller.
//!
//! [`Orchestrator`] wires operator input to the session manager, folds the
//! per-turn event stream into the [`Timeline`], routes confirmation prompts
//! to the [`Frontend`], and decides between reconnecting and reporting a
//! failed turn inline.

use crate::agent::{AgentSession, SessionManager};
use crate::confirm::{ConfirmationGate, ConfirmationPrompt};
use crate::error::SessionError;
use crate::kubectl::ClusterInfo;
use crate::timeline::{ChatRole, Timeline, TimelineChange};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

pub const RECONNECTING_NOTICE: &str = "Connection to the agent was lost. Reconnecting...";
pub const RECONNECTED_NOTICE: &str = "Reconnected to the agent. Please send your message again.";
/// Output shown on tool entries whose turn ended before they finished.
pub const TOOL_INTERRUPTED: &str = "Interrupted: the turn ended before this tool finished.";
pub const RECONNECT_FAILED_NOTICE: &str =
    "Could not reconnect to the agent. Please restart the app.";

/// Operator-facing surface driven by the orchestrator.
#[async_trait]
pub trait Frontend: Send {
    /// Show the cluster the assistant is talking to.
    fn header(&mut self, info: &ClusterInfo);

    /// Render the entry touched by one timeline change.
    fn render(&mut self, timeline: &Timeline, change: TimelineChange);

    /// Toggle the in-flight indicator.
    fn set_busy(&mut self, busy: bool);

    /// Ask the operator to approve a command.
    async fn confirm(&mut self, prompt: &ConfirmationPrompt) -> bool;

    /// Called when a pending confirmation was withdrawn before an answer.
    fn confirmation_expired(&mut self) {}

    /// Next input line. `None` ends the session.
    async fn read_input(&mut self) -> Option<String>;
}

pub struct Orchestrator<F: Frontend> {
    manager: SessionManager,
    gate: ConfirmationGate,
    timeline: Timeline,
    frontend: F,
    turn_timeout: Duration,
}

impl<F: Frontend> Orchestrator<F> {
    pub fn new(
        manager: SessionManager,
        gate: ConfirmationGate,
        frontend: F,
        turn_timeout: Duration,
    ) -> Self {
        Self {
            manager,
            gate,
            timeline: Timeline::new(),
            frontend,
            turn_timeout,
        }
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    pub fn manager(&self) -> &SessionManager {
        &self.manager
    }

    /// Show the header and open the initial session.
    ///
    /// A creation failure is reported once in the timeline; the next submit
    /// retries through the reconnect path.
    pub async fn start(&mut self, cluster: &ClusterInfo) {
        self.frontend.header(cluster);
        if let Err(err) = self.manager.start().await {
            tracing::error!(error = %err, "initial session creation failed");
            self.notice(format!(
                "Failed to initialize agent session: {err}. Make sure the model API is reachable and an API key is configured."
            ));
        }
    }

    /// Read and submit input until the frontend closes or the operator quits.
    pub async fn run(&mut self) {
        while let Some(line) = self.frontend.read_input().await {
            let input = line.trim();
            if input.is_empty() {
                continue;
            }
            if matches!(input, "exit" | "quit") {
                break;
            }
            self.submit(input).await;
        }
    }

    /// Run one user turn end to end.
    pub async fn submit(&mut self, input: &str) {
        self.push_chat(ChatRole::User, input);

        let Some(session) = self.manager.session() else {
            self.recover().await;
            return;
        };

        match self.run_turn(session, input).await {
            Ok(()) => {}
            Err(err) if err.is_recoverable() => {
                tracing::warn!(error = %err, "session failure; reconnecting");
                self.recover().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "turn failed");
                self.push_chat(ChatRole::Assistant, format!("Error: {err}"));
            }
        }
    }

    /// Tear down the session and backend. Safe to call more than once.
    pub async fn shutdown(&mut self) {
        self.manager.destroy().await;
    }

    async fn run_turn(
        &mut self,
        session: Arc<dyn AgentSession>,
        input: &str,
    ) -> Result<(), SessionError> {
        let mut subscription = session.subscribe();
        let mut prompts = self.gate.watch();
        self.frontend.set_busy(true);

        let send = session.send(input, self.turn_timeout);
        tokio::pin!(send);
        let outcome = 'turn: loop {
            tokio::select! {
                result = &mut send => break 'turn result,
                Some(event) = subscription.recv() => {
                    let change = self.timeline.apply(&event);
                    self.emit(change);
                }
                Ok(()) = prompts.changed() => {
                    let pending = prompts.borrow_and_update().clone();
                    let Some(prompt) = pending else {
                        continue;
                    };
                    tokio::select! {
                        approved = self.frontend.confirm(&prompt) => self.gate.respond(approved),
                        result = &mut send => {
                            self.frontend.confirmation_expired();
                            break 'turn result;
                        }
                        _ = prompt_withdrawn(&mut prompts) => self.frontend.confirmation_expired(),
                    }
                }
            }
        };

        while let Some(event) = subscription.try_recv() {
            let change = self.timeline.apply(&event);
            self.emit(change);
        }
        drop(subscription);
        if outcome.is_err() {
            for change in self.timeline.settle_running(TOOL_INTERRUPTED) {
                self.emit(change);
            }
        }
        self.frontend.set_busy(false);
        outcome
    }

    async fn recover(&mut self) {
        self.notice(RECONNECTING_NOTICE);
        if self.manager.reconnect().await {
            self.notice(RECONNECTED_NOTICE);
        } else {
            self.notice(RECONNECT_FAILED_NOTICE);
        }
    }

    fn notice(&mut self, text: impl Into<String>) {
        self.push_chat(ChatRole::Assistant, text);
    }

    fn push_chat(&mut self, role: ChatRole, text: impl Into<String>) {
        let change = self.timeline.push_chat(role, text);
        self.emit(change);
    }

    fn emit(&mut self, change: TimelineChange) {
        if change != TimelineChange::Ignored {
            self.frontend.render(&self.timeline, change);
        }
    }
}

/// Resolves once the pending prompt has been cleared by someone else.
async fn prompt_withdrawn(prompts: &mut watch::Receiver<Option<ConfirmationPrompt>>) {
    loop {
        if prompts.borrow_and_update().is_none() {
            return;
        }
        if prompts.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
