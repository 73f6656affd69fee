//! Mock implementations for testing
//!
//! This module provides mock implementations of the serial link and audio
//! sink traits for use in unit and integration tests.

#![cfg(any(test, feature = "std"))]

use embassy_time::{Duration, Timer};

use crate::{AudioSink, SerialPort};

/// Largest chunk a [`MockSerial`] delivers or records in one call.
pub const MOCK_CHUNK: usize = 128;

/// Mock serial port.
///
/// Each queued chunk is delivered by exactly one `read_timeout`; an empty
/// queue behaves like an idle line and waits out the timeout.
pub struct MockSerial {
    incoming: heapless::Deque<heapless::Vec<u8, MOCK_CHUNK>, 16>,
    written: heapless::Vec<heapless::Vec<u8, MOCK_CHUNK>, 16>,
    reads: usize,
}

impl MockSerial {
    /// Create new mock serial port
    pub fn new() -> Self {
        Self {
            incoming: heapless::Deque::new(),
            written: heapless::Vec::new(),
            reads: 0,
        }
    }

    /// Queue bytes to be returned by the next read.
    ///
    /// Returns `false` if the chunk is too large or the queue is full.
    pub fn push_incoming(&mut self, bytes: &[u8]) -> bool {
        heapless::Vec::from_slice(bytes)
            .ok()
            .is_some_and(|chunk| self.incoming.push_back(chunk).is_ok())
    }

    /// Every write recorded so far, one entry per call.
    pub fn written(&self) -> &[heapless::Vec<u8, MOCK_CHUNK>] {
        &self.written
    }

    /// Number of `read_timeout` calls served.
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Whether all queued input has been consumed.
    pub fn is_drained(&self) -> bool {
        self.incoming.is_empty()
    }
}

impl Default for MockSerial {
    fn default() -> Self {
        Self::new()
    }
}

impl SerialPort for MockSerial {
    type Error = core::convert::Infallible;

    async fn read_timeout(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize, Self::Error> {
        self.reads = self.reads.saturating_add(1);
        match self.incoming.pop_front() {
            Some(chunk) => {
                let n = chunk.len().min(buf.len());
                if let (Some(dst), Some(src)) = (buf.get_mut(..n), chunk.get(..n)) {
                    dst.copy_from_slice(src);
                }
                Ok(n)
            }
            None => {
                Timer::after(timeout).await;
                Ok(0)
            }
        }
    }

    async fn write_timeout(&mut self, data: &[u8], _timeout: Duration) -> Result<usize, Self::Error> {
        let n = data.len().min(MOCK_CHUNK);
        let chunk = heapless::Vec::from_slice(data.get(..n).unwrap_or_default()).unwrap_or_default();
        let _ = self.written.push(chunk);
        Ok(n)
    }
}

/// Bytes a [`MockAudioSink`] retains for inspection.
pub const SINK_CAPTURE: usize = 4096;

/// Error injected by [`MockAudioSink::fail_after`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockSinkError;

/// Mock audio sink.
///
/// Keeps the first [`SINK_CAPTURE`] bytes for inspection and counts
/// everything.
pub struct MockAudioSink {
    captured: heapless::Vec<u8, SINK_CAPTURE>,
    bytes_written: usize,
    writes: usize,
    fail_after: Option<usize>,
}

impl MockAudioSink {
    /// Create new mock sink
    pub fn new() -> Self {
        Self {
            captured: heapless::Vec::new(),
            bytes_written: 0,
            writes: 0,
            fail_after: None,
        }
    }

    /// Make every write after the first `writes` successful ones fail.
    pub fn fail_after(mut self, writes: usize) -> Self {
        self.fail_after = Some(writes);
        self
    }

    /// Captured payload prefix.
    pub fn captured(&self) -> &[u8] {
        &self.captured
    }

    /// Total bytes accepted.
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    /// Number of successful writes.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Default for MockAudioSink {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSink for MockAudioSink {
    type Error = MockSinkError;

    async fn write(&mut self, pcm: &[u8]) -> Result<usize, Self::Error> {
        if self.fail_after.is_some_and(|limit| self.writes >= limit) {
            return Err(MockSinkError);
        }
        let room = SINK_CAPTURE.saturating_sub(self.captured.len());
        let keep = pcm.get(..room.min(pcm.len())).unwrap_or_default();
        let _ = self.captured.extend_from_slice(keep);
        self.bytes_written = self.bytes_written.saturating_add(pcm.len());
        self.writes = self.writes.saturating_add(1);
        Ok(pcm.len())
    }
}
