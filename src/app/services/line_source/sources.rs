//! Concrete line sources
//!
//! A [`LineSource`] knows how to open itself into a buffered async reader. The
//! read loop never cares whether the bytes come from disk, memory or a socket.

use futures::future::{BoxFuture, FutureExt};
use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncRead, BufReader};
use tracing::debug;

use crate::{Error, Result};

/// Buffered reader handed out by [`LineSource::open`]
pub type LineReader = Box<dyn AsyncBufRead + Send + Unpin>;

/// Anything that can be opened into an ordered stream of text lines
pub trait LineSource: Send + Sync + fmt::Debug {
    /// Human-readable identifier used in logs and errors
    fn describe(&self) -> String;

    /// Open the underlying stream
    ///
    /// Failure here is always [`Error::SourceUnavailable`].
    fn open(&self) -> BoxFuture<'_, Result<LineReader>>;
}

// =============================================================================
// File Source
// =============================================================================

/// Price file on the local filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LineSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn open(&self) -> BoxFuture<'_, Result<LineReader>> {
        async move {
            let file = File::open(&self.path)
                .await
                .map_err(|e| Error::source_unavailable(self.describe(), e))?;
            debug!("Opened file source {}", self.path.display());
            Ok(Box::new(BufReader::new(file)) as LineReader)
        }
        .boxed()
    }
}

// =============================================================================
// Memory Source
// =============================================================================

/// Text already held in memory (fixtures, fully downloaded bodies)
///
/// Can be opened any number of times.
#[derive(Clone)]
pub struct MemorySource {
    label: String,
    content: Arc<[u8]>,
}

impl MemorySource {
    pub fn new(label: impl Into<String>, content: impl Into<String>) -> Self {
        Self::from_bytes(label, content.into().into_bytes())
    }

    /// Raw bytes; invalid UTF-8 surfaces as a read failure, not here
    pub fn from_bytes(label: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            label: label.into(),
            content: Arc::from(content),
        }
    }
}

impl fmt::Debug for MemorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySource")
            .field("label", &self.label)
            .field("bytes", &self.content.len())
            .finish()
    }
}

impl LineSource for MemorySource {
    fn describe(&self) -> String {
        format!("memory:{}", self.label)
    }

    fn open(&self) -> BoxFuture<'_, Result<LineReader>> {
        let cursor = Cursor::new(Arc::clone(&self.content));
        async move { Ok(Box::new(cursor) as LineReader) }.boxed()
    }
}

// =============================================================================
// Stream Source
// =============================================================================

type BoxedRead = Box<dyn AsyncRead + Send + Unpin>;

/// An already-open byte stream: socket, pipe, stdin or a response body
///
/// The stream is consumed by the first [`open`](LineSource::open); later
/// attempts report the source as unavailable.
pub struct StreamSource {
    label: String,
    stream: Mutex<Option<BoxedRead>>,
}

impl StreamSource {
    pub fn new<R>(label: impl Into<String>, stream: R) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        Self {
            label: label.into(),
            stream: Mutex::new(Some(Box::new(stream))),
        }
    }

    /// Standard input of the current process
    pub fn stdin() -> Self {
        Self::new("<stdin>", tokio::io::stdin())
    }

    fn take_stream(&self) -> Result<BoxedRead> {
        let mut slot = self
            .stream
            .lock()
            .map_err(|_| Error::source_unavailable_msg(self.describe(), "stream lock poisoned"))?;
        slot.take().ok_or_else(|| {
            Error::source_unavailable_msg(self.describe(), "stream has already been consumed")
        })
    }
}

impl fmt::Debug for StreamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let available = self.stream.lock().map(|s| s.is_some()).unwrap_or(false);
        f.debug_struct("StreamSource")
            .field("label", &self.label)
            .field("available", &available)
            .finish()
    }
}

impl LineSource for StreamSource {
    fn describe(&self) -> String {
        format!("stream:{}", self.label)
    }

    fn open(&self) -> BoxFuture<'_, Result<LineReader>> {
        let taken = self.take_stream();
        async move {
            let stream = taken?;
            Ok(Box::new(BufReader::new(stream)) as LineReader)
        }
        .boxed()
    }
}
