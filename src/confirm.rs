//! Confirmation gate between tool handlers and the human operator.
//!
//! A tool handler calls [`ConfirmationGate::request`] and suspends; the
//! frontend observes the pending prompt through [`ConfirmationGate::watch`]
//! and resolves it with [`ConfirmationGate::respond`]. Only one request may
//! be pending at a time.

use crate::error::ToolError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::{oneshot, watch};

/// What the operator is being asked to approve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationPrompt {
    pub command: String,
    pub destructive: bool,
}

struct PendingSlot {
    id: u64,
    response: oneshot::Sender<bool>,
}

struct GateInner {
    slot: Mutex<Option<PendingSlot>>,
    prompt_tx: watch::Sender<Option<ConfirmationPrompt>>,
    next_id: AtomicU64,
    timeout: Option<Duration>,
}

/// Cloneable handle to the process-wide confirmation slot.
#[derive(Clone)]
pub struct ConfirmationGate {
    inner: Arc<GateInner>,
}

impl ConfirmationGate {
    /// Create a gate. `timeout` of `None` waits indefinitely for an answer.
    pub fn new(timeout: Option<Duration>) -> Self {
        let (prompt_tx, _) = watch::channel(None);
        Self {
            inner: Arc::new(GateInner {
                slot: Mutex::new(None),
                prompt_tx,
                next_id: AtomicU64::new(1),
                timeout,
            }),
        }
    }

    /// Ask the operator to approve `command` and wait for the answer.
    ///
    /// Resolves to `false` when the request times out. Fails immediately if
    /// another confirmation is already pending.
    pub async fn request(&self, command: &str, destructive: bool) -> Result<bool, ToolError> {
        let (response_tx, response_rx) = oneshot::channel();
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        {
            let mut slot = self.lock_slot();
            if slot.is_some() {
                return Err(ToolError::ExecutionFailed(
                    "a confirmation is already pending".into(),
                ));
            }
            *slot = Some(PendingSlot {
                id,
                response: response_tx,
            });
            self.inner.prompt_tx.send_replace(Some(ConfirmationPrompt {
                command: command.to_string(),
                destructive,
            }));
        }
        tracing::debug!(command, destructive, "confirmation requested");

        // Clears the slot if this future is dropped or times out before an answer.
        let _guard = SlotGuard { gate: self, id };

        let answer = match self.inner.timeout {
            Some(limit) => match tokio::time::timeout(limit, response_rx).await {
                Ok(answer) => answer,
                Err(_) => {
                    tracing::warn!(
                        command,
                        timeout_secs = limit.as_secs(),
                        "confirmation timed out; denying"
                    );
                    return Ok(false);
                }
            },
            None => response_rx.await,
        };
        answer.map_err(|_| {
            ToolError::ExecutionFailed("confirmation was cancelled before resolution".into())
        })
    }

    /// Resolve the pending request. Does nothing when no request is pending.
    pub fn respond(&self, approved: bool) {
        let pending = {
            let mut slot = self.lock_slot();
            let pending = slot.take();
            if pending.is_some() {
                self.inner.prompt_tx.send_replace(None);
            }
            pending
        };
        match pending {
            Some(pending) => {
                tracing::info!(approved, "confirmation resolved");
                let _ = pending.response.send(approved);
            }
            None => tracing::debug!("confirmation response with nothing pending"),
        }
    }

    /// Snapshot of the currently pending prompt, if any.
    pub fn pending(&self) -> Option<ConfirmationPrompt> {
        self.inner.prompt_tx.borrow().clone()
    }

    /// Receiver that observes the pending prompt as it appears and clears.
    pub fn watch(&self) -> watch::Receiver<Option<ConfirmationPrompt>> {
        self.inner.prompt_tx.subscribe()
    }

    fn lock_slot(&self) -> MutexGuard<'_, Option<PendingSlot>> {
        self.inner
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn clear_if_current(&self, id: u64) {
        let mut slot = self.lock_slot();
        if slot.as_ref().is_some_and(|pending| pending.id == id) {
            *slot = None;
            self.inner.prompt_tx.send_replace(None);
        }
    }
}

impl Default for ConfirmationGate {
    fn default() -> Self {
        Self::new(None)
    }
}

struct SlotGuard<'a> {
    gate: &'a ConfirmationGate,
    id: u64,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.gate.clear_if_current(self.id);
    }
}
