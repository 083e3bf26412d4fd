//! Load session controller with start/cancel toggle semantics
//!
//! The controller owns a single session slot. Triggering a load while the slot
//! is occupied cancels the occupant instead of starting anything; the caller
//! has to trigger again once the cancellation has been observed.
//!
//! A session leaves the slot only when it reaches a terminal state, and it
//! decides between `Completed` and `Cancelled` while holding the slot lock.
//! Since [`StockLoader::trigger`] cancels under that same lock, a trigger racing
//! with completion either sees the slot empty (the load completed and a new one
//! starts) or cancels the load before it is delivered. Records are never
//! delivered after a cancel has been acknowledged.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, broadcast, watch};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::outcome::{
    CancelStage, CancellationNotice, LoadOutcome, SessionEvent, SessionId, SessionState,
};
use super::pipeline::run_load;
use super::session::{CancelHandle, LoadHandle, LoadSession, SessionLatch};
use crate::Result;
use crate::app::models::TickerFilter;
use crate::app::services::line_source::LineSource;
use crate::app::services::record_parser::RecordParser;
use crate::constants::EVENT_CHANNEL_CAPACITY;

/// What a call to [`StockLoader::trigger`] did
#[derive(Debug)]
pub enum TriggerResponse {
    /// No session was active; a new one was started
    Started(LoadHandle),
    /// A session was active and has been asked to stop; nothing new started
    CancelledActive(SessionId),
}

impl TriggerResponse {
    pub fn is_started(&self) -> bool {
        matches!(self, TriggerResponse::Started(_))
    }

    pub fn into_handle(self) -> Option<LoadHandle> {
        match self {
            TriggerResponse::Started(handle) => Some(handle),
            TriggerResponse::CancelledActive(_) => None,
        }
    }
}

struct LoaderInner {
    parser: RecordParser,
    active: Mutex<Option<LoadSession>>,
    next_id: AtomicU64,
    events: broadcast::Sender<SessionEvent>,
}

/// Caller-context orchestrator for stock price loads
///
/// Holds at most one loading session at a time. Clones share the same slot.
#[derive(Clone)]
pub struct StockLoader {
    inner: Arc<LoaderInner>,
}

impl std::fmt::Debug for StockLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockLoader")
            .field("parser", &self.inner.parser)
            .field("sessions_started", &self.inner.next_id.load(Ordering::SeqCst))
            .finish()
    }
}

impl Default for StockLoader {
    fn default() -> Self {
        Self::new(RecordParser::default())
    }
}

impl StockLoader {
    /// Create a controller whose sessions parse with `parser`
    ///
    /// A filter passed to [`trigger`](Self::trigger) replaces the parser's own.
    pub fn new(parser: RecordParser) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(LoaderInner {
                parser,
                active: Mutex::new(None),
                next_id: AtomicU64::new(0),
                events,
            }),
        }
    }

    /// Start a load, or cancel the one in flight
    ///
    /// `filter` of `None` keeps the parser's configured filter.
    pub async fn trigger(
        &self,
        source: Arc<dyn LineSource>,
        filter: Option<TickerFilter>,
    ) -> TriggerResponse {
        let mut active = self.inner.active.lock().await;

        if let Some(session) = active.as_ref() {
            info!(
                "Load requested while session {} is loading; cancelling it",
                session.id()
            );
            session.cancel_handle().cancel();
            return TriggerResponse::CancelledActive(session.id());
        }

        let session_id = self.inner.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let source_id = source.describe();
        let parser = match filter {
            Some(filter) => self.inner.parser.clone().with_filter(Some(filter)),
            None => self.inner.parser.clone(),
        };

        let token = CancellationToken::new();
        let (state_tx, state_rx) = watch::channel(SessionState::Loading);
        let latch = SessionLatch::default();
        let cancel = CancelHandle::new(
            session_id,
            token.clone(),
            self.inner.events.clone(),
            latch.clone(),
        );

        *active = Some(LoadSession::new(
            session_id,
            source_id.clone(),
            cancel.clone(),
        ));

        info!("Session {} started for {}", session_id, source_id);
        let _ = self.inner.events.send(SessionEvent::Started {
            session_id,
            source: source_id,
        });

        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(run_session(
            inner, session_id, source, parser, token, latch, state_tx,
        ));

        TriggerResponse::Started(LoadHandle::new(session_id, cancel, state_rx, task))
    }

    /// Cancel the active session, if any, returning its id
    pub async fn cancel_active(&self) -> Option<SessionId> {
        let active = self.inner.active.lock().await;
        active.as_ref().map(|session| {
            session.cancel_handle().cancel();
            session.id()
        })
    }

    /// `Loading` while a session occupies the slot, `Idle` otherwise
    pub async fn status(&self) -> SessionState {
        if self.inner.active.lock().await.is_some() {
            SessionState::Loading
        } else {
            SessionState::Idle
        }
    }

    pub async fn active_session(&self) -> Option<LoadSession> {
        self.inner.active.lock().await.clone()
    }

    /// Receive lifecycle events for every session started after this call
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    pub fn parser(&self) -> &RecordParser {
        &self.inner.parser
    }
}

async fn run_session(
    inner: Arc<LoaderInner>,
    session_id: SessionId,
    source: Arc<dyn LineSource>,
    parser: RecordParser,
    token: CancellationToken,
    latch: SessionLatch,
    state_tx: watch::Sender<SessionState>,
) -> Result<LoadOutcome> {
    let result = run_load(source, &parser, &token).await;

    let mut active = inner.active.lock().await;
    let uncancelled = latch.settle();

    let result = match result {
        Ok(LoadOutcome::Completed(parsed)) if !uncancelled => {
            Ok(LoadOutcome::Cancelled(CancellationNotice {
                lines_read: parsed.stats.lines_consumed(),
                stage: CancelStage::BeforeDelivery,
            }))
        }
        other => other,
    };

    if active.as_ref().map(LoadSession::id) == Some(session_id) {
        *active = None;
    }

    let (state, event) = match &result {
        Ok(LoadOutcome::Completed(parsed)) => {
            info!(
                "Session {} completed with {} records",
                session_id,
                parsed.records.len()
            );
            (
                SessionState::Completed,
                SessionEvent::Completed {
                    session_id,
                    records: parsed.records.len(),
                },
            )
        }
        Ok(LoadOutcome::Cancelled(notice)) => {
            info!("Session {}: {}", session_id, notice);
            (
                SessionState::Cancelled,
                SessionEvent::Cancelled {
                    session_id,
                    notice: *notice,
                },
            )
        }
        Err(e) => {
            warn!("Session {} failed: {}", session_id, e);
            (
                SessionState::Failed,
                SessionEvent::Failed {
                    session_id,
                    message: e.to_string(),
                },
            )
        }
    };

    state_tx.send_replace(state);
    let _ = inner.events.send(event);
    drop(active);

    result
}
