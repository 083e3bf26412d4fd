//! Test utilities for line source testing
//!
//! Readers with scripted behaviour, shared with the pipeline tests.

use std::collections::VecDeque;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};
use tokio_util::sync::CancellationToken;


/// Emits one line per read call and cancels `token` once `cancel_after`
/// lines have been handed out
pub struct CancellingReader {
    lines: VecDeque<String>,
    emitted: usize,
    cancel_after: Option<usize>,
    token: CancellationToken,
}

impl CancellingReader {
    pub fn new(lines: &[&str], cancel_after: usize, token: CancellationToken) -> Self {
        Self {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            emitted: 0,
            cancel_after: Some(cancel_after),
            token,
        }
    }

    /// Hands out every line and cancels `token` on the read that hits EOF
    pub fn at_eof(lines: &[&str], token: CancellationToken) -> Self {
        Self {
            cancel_after: None,
            ..Self::new(lines, 0, token)
        }
    }
}

impl AsyncRead for CancellingReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if let Some(line) = self.lines.pop_front() {
            buf.put_slice(format!("{}\n", line).as_bytes());
            self.emitted += 1;
            if Some(self.emitted) == self.cancel_after {
                self.token.cancel();
            }
        } else if self.cancel_after.is_none() {
            self.token.cancel();
        }
        Poll::Ready(Ok(()))
    }
}

/// Always fails with the given error kind
pub struct FailingReader {
    pub kind: io::ErrorKind,
}

impl AsyncRead for FailingReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::new(self.kind, "simulated device failure")))
    }
}

/// Header plus `count` well-formed AAPL lines
pub fn price_lines(count: usize) -> Vec<String> {
    let mut lines = vec!["Ticker,TradeDate,Open,High,Low,Close,Volume,Change,ChangePercent".to_string()];
    for i in 0..count {
        lines.push(format!(
            "\"AAPL\",\"1/{}/2020 9:30:00 AM\",0,0,0,0,\"{}\",\"1.23\",\"0.45\"",
            i % 28 + 1,
            1000 + i
        ));
    }
    lines
}
