//! Session lifecycle: create, replace on reconnect, destroy.

use super::{AgentBackend, AgentSession, SessionConfig};
use crate::error::SessionError;
use std::sync::Arc;

/// Owns the single live conversation handle.
pub struct SessionManager {
    backend: Arc<dyn AgentBackend>,
    config: SessionConfig,
    session: Option<Arc<dyn AgentSession>>,
    shut_down: bool,
}

impl SessionManager {
    pub fn new(backend: Arc<dyn AgentBackend>, config: SessionConfig) -> Self {
        Self {
            backend,
            config,
            session: None,
            shut_down: false,
        }
    }

    /// Create and install the initial session.
    pub async fn start(&mut self) -> Result<(), SessionError> {
        let session = self.backend.create(self.config.clone()).await?;
        self.install(session).await;
        Ok(())
    }

    /// Open a fresh conversation. Failure is logged and reported as `None`.
    pub async fn create_session(&self) -> Option<Arc<dyn AgentSession>> {
        match self.backend.create(self.config.clone()).await {
            Ok(session) => Some(session),
            Err(err) => {
                tracing::error!(error = %err, "failed to create agent session");
                None
            }
        }
    }

    /// Handle to the active session, if any.
    pub fn session(&self) -> Option<Arc<dyn AgentSession>> {
        self.session.clone()
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Replace the active session with a new one. Returns false when
    /// creation failed; the previous handle is kept in that case.
    pub async fn reconnect(&mut self) -> bool {
        tracing::info!("reconnecting agent session");
        match self.create_session().await {
            Some(session) => {
                self.install(session).await;
                true
            }
            None => false,
        }
    }

    /// Destroy the active session and stop the backend. Safe to call twice.
    pub async fn destroy(&mut self) {
        if let Some(session) = self.session.take() {
            discard(session).await;
        }
        if !self.shut_down {
            self.shut_down = true;
            self.backend.stop().await;
        }
    }

    async fn install(&mut self, session: Arc<dyn AgentSession>) {
        if let Some(previous) = self.session.replace(session) {
            discard(previous).await;
        }
    }
}

/// Best-effort teardown of a session being abandoned.
async fn discard(session: Arc<dyn AgentSession>) {
    match session.destroy().await {
        Ok(()) | Err(SessionError::Disposed) => {}
        Err(err) => tracing::debug!(error = %err, "ignoring session teardown failure"),
    }
}
