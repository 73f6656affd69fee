//! Serial link abstraction
//!
//! [`SerialPort`] is a byte link with deadline-bounded reads and writes, the
//! shape a polling intake loop needs: it must never block indefinitely.
//! [`TimeoutSerial`] adapts any `embedded_io_async` stream (e.g. an
//! embassy-stm32 `BufferedUart`) to it.

use embassy_time::{with_timeout, Duration, Instant};
use embedded_io_async::{Read, Write};

/// Serial port trait
pub trait SerialPort {
    /// Error type
    type Error: core::fmt::Debug;

    /// Wait up to `timeout` for data and read what the first delivery
    /// carries into `buf`.
    ///
    /// Returns as soon as any bytes arrive, so back-to-back frames come out
    /// of separate calls. `Ok(0)` means nothing arrived.
    fn read_timeout(
        &mut self,
        buf: &mut [u8],
        timeout: Duration,
    ) -> impl core::future::Future<Output = Result<usize, Self::Error>>;

    /// Write as much of `data` as the link accepts within `timeout`.
    ///
    /// Returns the number of bytes written.
    fn write_timeout(
        &mut self,
        data: &[u8],
        timeout: Duration,
    ) -> impl core::future::Future<Output = Result<usize, Self::Error>>;
}

/// Deadline-bounded [`SerialPort`] over an `embedded_io_async` stream.
pub struct TimeoutSerial<T> {
    inner: T,
}

impl<T> TimeoutSerial<T> {
    /// Wrap a stream.
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Return the wrapped stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read + Write> SerialPort for TimeoutSerial<T> {
    type Error = T::Error;

    async fn read_timeout(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize, T::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        with_timeout(timeout, self.inner.read(buf)).await.unwrap_or(Ok(0))
    }

    async fn write_timeout(&mut self, data: &[u8], timeout: Duration) -> Result<usize, T::Error> {
        let deadline = Instant::now().checked_add(timeout).unwrap_or(Instant::MAX);
        let mut written = 0usize;
        while let Some(rest) = data.get(written..).filter(|rest| !rest.is_empty()) {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match with_timeout(remaining, self.inner.write(rest)).await {
                Ok(Ok(0)) | Err(_) => break,
                Ok(Ok(n)) => written = written.saturating_add(n),
                Ok(Err(e)) => return Err(e),
            }
        }
        if written == data.len() {
            // Push buffered bytes out; a flush that misses the deadline is not an error.
            let remaining = deadline.saturating_duration_since(Instant::now());
            if let Ok(res) = with_timeout(remaining, self.inner.flush()).await {
                res?;
            }
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    /// Stream that yields scripted chunks, then stays silent forever.
    struct Scripted {
        chunks: std::collections::VecDeque<std::vec::Vec<u8>>,
        written: std::vec::Vec<u8>,
    }

    impl embedded_io_async::ErrorType for Scripted {
        type Error = Infallible;
    }

    impl Read for Scripted {
        async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Infallible> {
            match self.chunks.pop_front() {
                Some(chunk) => {
                    let n = chunk.len().min(buf.len());
                    buf[..n].copy_from_slice(&chunk[..n]);
                    Ok(n)
                }
                None => core::future::pending().await,
            }
        }
    }

    impl Write for Scripted {
        async fn write(&mut self, buf: &[u8]) -> Result<usize, Infallible> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }
    }

    fn scripted(chunks: &[&[u8]]) -> TimeoutSerial<Scripted> {
        TimeoutSerial::new(Scripted {
            chunks: chunks.iter().map(|c| c.to_vec()).collect(),
            written: std::vec::Vec::new(),
        })
    }

    #[tokio::test]
    async fn back_to_back_frames_come_out_of_separate_reads() {
        let mut port = scripted(&[&[0xAA, 0x01, 0x02, 0x03, 0x55], &[0xAA, 0x01, 0x05, 0x06, 0x55]]);
        let mut buf = [0u8; 16];

        let n = port.read_timeout(&mut buf, Duration::from_millis(20)).await.unwrap();
        assert_eq!(&buf[..n], &[0xAA, 0x01, 0x02, 0x03, 0x55]);
        let n = port.read_timeout(&mut buf, Duration::from_millis(20)).await.unwrap();
        assert_eq!(&buf[..n], &[0xAA, 0x01, 0x05, 0x06, 0x55]);
        let n = port.read_timeout(&mut buf, Duration::from_millis(5)).await.unwrap();
        assert_eq!(n, 0);
    }

    #[tokio::test]
    async fn read_returns_zero_when_idle() {
        let mut port = scripted(&[]);
        let mut buf = [0u8; 8];
        let n = port.read_timeout(&mut buf, Duration::from_millis(5)).await.unwrap();
        assert_eq!(n, 0);
    }

    #[tokio::test]
    async fn read_is_bounded_by_the_buffer() {
        let mut port = scripted(&[&[1, 2, 3, 4, 5, 6]]);
        let mut buf = [0u8; 4];
        let n = port.read_timeout(&mut buf, Duration::from_millis(20)).await.unwrap();
        assert_eq!(n, 4);
        assert_eq!(buf, [1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn write_forwards_all_bytes() {
        let mut port = scripted(&[]);
        let n = port.write_timeout(&[0xFF; 5], Duration::from_millis(20)).await.unwrap();
        assert_eq!(n, 5);
        assert_eq!(port.into_inner().written, std::vec![0xFF; 5]);
    }
}
