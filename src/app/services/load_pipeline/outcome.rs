//! Outcome, state and event types shared by the pipeline and its controller

use serde::Serialize;
use std::fmt;

use crate::app::models::StockPrice;
use crate::app::services::record_parser::{ParseResult, ParseStats};

/// Identifier of one load session, unique per [`StockLoader`](super::StockLoader)
pub type SessionId = u64;

/// Where the pipeline was when it noticed the cancellation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelStage {
    /// Between two line reads (or before the first one)
    Reading,
    /// After the last line was read, before parsing started
    BeforeParse,
    /// Parsing finished but the request arrived before delivery
    BeforeDelivery,
}

impl fmt::Display for CancelStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CancelStage::Reading => "while reading",
            CancelStage::BeforeParse => "before parsing",
            CancelStage::BeforeDelivery => "before delivery",
        };
        f.write_str(label)
    }
}

/// Tells the caller a load ended because it was asked to
///
/// No records accompany a notice; partial data is never delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CancellationNotice {
    /// Raw lines (header included) consumed before the pipeline stopped
    pub lines_read: usize,
    pub stage: CancelStage,
}

impl fmt::Display for CancellationNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "load cancelled {} after {} lines",
            self.stage, self.lines_read
        )
    }
}

/// Terminal result of a load that did not fail
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// Every line was read and parsed
    Completed(ParseResult),
    /// The cancellation token was observed first
    Cancelled(CancellationNotice),
}

impl LoadOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, LoadOutcome::Cancelled(_))
    }

    /// Delivered records, `None` for a cancelled load
    pub fn records(&self) -> Option<&[StockPrice]> {
        match self {
            LoadOutcome::Completed(result) => Some(&result.records),
            LoadOutcome::Cancelled(_) => None,
        }
    }

    pub fn stats(&self) -> Option<&ParseStats> {
        match self {
            LoadOutcome::Completed(result) => Some(&result.stats),
            LoadOutcome::Cancelled(_) => None,
        }
    }

    pub fn into_result(self) -> Option<ParseResult> {
        match self {
            LoadOutcome::Completed(result) => Some(result),
            LoadOutcome::Cancelled(_) => None,
        }
    }

    pub fn notice(&self) -> Option<&CancellationNotice> {
        match self {
            LoadOutcome::Completed(_) => None,
            LoadOutcome::Cancelled(notice) => Some(notice),
        }
    }
}

/// Lifecycle of a load session
///
/// `Idle -> Loading -> {Completed | Cancelled | Failed}`; the last three are
/// terminal and never change again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Loading,
    Completed,
    Cancelled,
    Failed,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Completed | SessionState::Cancelled | SessionState::Failed
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionState::Idle => "idle",
            SessionState::Loading => "loading",
            SessionState::Completed => "completed",
            SessionState::Cancelled => "cancelled",
            SessionState::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Broadcast by [`StockLoader`](super::StockLoader) as sessions move through their lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Started {
        session_id: SessionId,
        source: String,
    },
    CancellationRequested {
        session_id: SessionId,
    },
    Completed {
        session_id: SessionId,
        records: usize,
    },
    Cancelled {
        session_id: SessionId,
        notice: CancellationNotice,
    },
    Failed {
        session_id: SessionId,
        message: String,
    },
}

impl SessionEvent {
    pub fn session_id(&self) -> SessionId {
        match self {
            SessionEvent::Started { session_id, .. }
            | SessionEvent::CancellationRequested { session_id }
            | SessionEvent::Completed { session_id, .. }
            | SessionEvent::Cancelled { session_id, .. }
            | SessionEvent::Failed { session_id, .. } => *session_id,
        }
    }
}
