//! Per-session handles
//!
//! A session ties exactly one cancellation token to one in-flight load. The
//! token is never reused; a new load always gets a fresh one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::outcome::{LoadOutcome, SessionEvent, SessionId, SessionState};
use crate::{Error, Result};

const RUNNING: u8 = 0;
const CANCEL_REQUESTED: u8 = 1;
const SETTLED: u8 = 2;

/// One-way latch deciding whether a session was cancelled or settled first
///
/// Exactly one of [`request_cancel`](Self::request_cancel) and
/// [`settle`](Self::settle) wins; the loser observes the winner's decision.
#[derive(Debug, Clone, Default)]
pub(crate) struct SessionLatch {
    phase: Arc<AtomicU8>,
}

impl SessionLatch {
    /// `true` if the session was still running and is now marked cancelled
    pub(crate) fn request_cancel(&self) -> bool {
        self.phase
            .compare_exchange(RUNNING, CANCEL_REQUESTED, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Close the latch; `true` if no cancel was requested before this call
    pub(crate) fn settle(&self) -> bool {
        self.phase.swap(SETTLED, Ordering::SeqCst) == RUNNING
    }

    fn is_settled(&self) -> bool {
        self.phase.load(Ordering::SeqCst) == SETTLED
    }
}

/// Requests cancellation of one session
///
/// Cheap to clone and safe to call from any task. Only the first call on a
/// still-running session has an effect. A session whose cancel returned `true`
/// never reports `Completed`, even when its records were already parsed.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    session_id: SessionId,
    token: CancellationToken,
    events: broadcast::Sender<SessionEvent>,
    latch: SessionLatch,
}

impl CancelHandle {
    pub(crate) fn new(
        session_id: SessionId,
        token: CancellationToken,
        events: broadcast::Sender<SessionEvent>,
        latch: SessionLatch,
    ) -> Self {
        Self {
            session_id,
            token,
            events,
            latch,
        }
    }

    /// Ask the session to stop at its next checkpoint
    ///
    /// Returns `true` if this call issued the request, `false` if the session
    /// had already settled or was already asked to stop.
    pub fn cancel(&self) -> bool {
        if !self.latch.request_cancel() {
            if self.latch.is_settled() {
                debug!(
                    "Session {} already finished; cancel ignored",
                    self.session_id
                );
            }
            return false;
        }

        info!("Cancellation requested for session {}", self.session_id);
        self.token.cancel();
        // No subscribers is fine
        let _ = self.events.send(SessionEvent::CancellationRequested {
            session_id: self.session_id,
        });
        true
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }
}

/// The controller's view of the session occupying its slot
#[derive(Debug, Clone)]
pub struct LoadSession {
    id: SessionId,
    source_id: String,
    cancel: CancelHandle,
}

impl LoadSession {
    pub(crate) fn new(id: SessionId, source_id: String, cancel: CancelHandle) -> Self {
        Self {
            id,
            source_id,
            cancel,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Description of the source being read
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn cancel_handle(&self) -> &CancelHandle {
        &self.cancel
    }
}

/// Caller-side handle to a started session
///
/// Dropping the handle does not cancel the session; it keeps running and its
/// outcome is still broadcast to subscribers.
#[derive(Debug)]
pub struct LoadHandle {
    session_id: SessionId,
    cancel: CancelHandle,
    state: watch::Receiver<SessionState>,
    task: JoinHandle<Result<LoadOutcome>>,
}

impl LoadHandle {
    pub(crate) fn new(
        session_id: SessionId,
        cancel: CancelHandle,
        state: watch::Receiver<SessionState>,
        task: JoinHandle<Result<LoadOutcome>>,
    ) -> Self {
        Self {
            session_id,
            cancel,
            state,
            task,
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Shorthand for `cancel_handle().cancel()`
    pub fn cancel(&self) -> bool {
        self.cancel.cancel()
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Wait until the state satisfies `predicate`, returning that state
    pub async fn wait_for_state<F>(&mut self, mut predicate: F) -> SessionState
    where
        F: FnMut(&SessionState) -> bool,
    {
        let reached = match self.state.wait_for(|state| predicate(state)).await {
            Ok(state) => Some(*state),
            Err(_) => None,
        };
        // The session task owns the sender; once it is gone the last
        // published state is final.
        reached.unwrap_or_else(|| *self.state.borrow())
    }

    /// Wait for the session to finish and take its outcome
    pub async fn outcome(self) -> Result<LoadOutcome> {
        let session_id = self.session_id;
        self.task
            .await
            .map_err(|e| Error::session_aborted(format!("session {}: {}", session_id, e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latch_cancel_before_settle() {
        let latch = SessionLatch::default();
        assert!(latch.request_cancel());
        assert!(!latch.request_cancel());
        assert!(!latch.settle());
        assert!(latch.is_settled());
    }

    #[test]
    fn test_latch_settle_before_cancel() {
        let latch = SessionLatch::default();
        let other = latch.clone();
        assert!(latch.settle());
        assert!(!other.request_cancel());
        assert!(other.is_settled());
    }
}
