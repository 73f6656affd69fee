//! Serial command intake.
//!
//! Polls the serial link, validates each received burst as a command frame
//! and pushes accepted commands onto the [`CommandQueue`]. Every burst gets
//! an answer: accepted frames are echoed back verbatim, rejected ones get
//! [`NACK_SENTINEL`]. A poll never blocks longer than the read timeout plus
//! the write timeout.
//!
//! The echo is sent even when the queue was full and the command was
//! dropped; the drop shows up in the queue's counter and the log.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{Duration, Timer};
use platform::config::{SERIAL_BUF_SIZE, SERIAL_POLL_TIMEOUT_MS, SERIAL_WRITE_TIMEOUT_MS};
use platform::SerialPort;
use protocol::{validate, Command, FrameError, NACK_SENTINEL};

use crate::dispatch::CommandQueue;

const POLL_TIMEOUT: Duration = Duration::from_millis(SERIAL_POLL_TIMEOUT_MS);
const WRITE_TIMEOUT: Duration = Duration::from_millis(SERIAL_WRITE_TIMEOUT_MS);

/// Result of one intake poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeOutcome {
    /// Nothing arrived within the poll timeout.
    Idle,
    /// A valid frame arrived and was echoed.
    Accepted {
        /// The decoded command.
        command: Command,
        /// Whether it made it onto the queue (`false`: dropped, queue full).
        queued: bool,
    },
    /// The burst was not a valid frame; the NACK sentinel was written.
    Rejected(FrameError),
}

/// Serial intake loop state.
pub struct SerialIntake<'q, S, M: RawMutex, const N: usize> {
    port: S,
    queue: &'q CommandQueue<M, N>,
    buf: [u8; SERIAL_BUF_SIZE],
}

impl<'q, S: SerialPort, M: RawMutex, const N: usize> SerialIntake<'q, S, M, N> {
    /// Intake reading from `port` and feeding `queue`.
    pub fn new(port: S, queue: &'q CommandQueue<M, N>) -> Self {
        Self {
            port,
            queue,
            buf: [0; SERIAL_BUF_SIZE],
        }
    }

    /// Give the serial port back.
    pub fn into_port(self) -> S {
        self.port
    }

    /// Read one burst and answer it.
    ///
    /// At most `SERIAL_BUF_SIZE - 1` bytes are read per poll; the first
    /// delivery within the poll timeout is treated as one frame.
    pub async fn poll_once(&mut self) -> Result<IntakeOutcome, S::Error> {
        let limit = SERIAL_BUF_SIZE.saturating_sub(1);
        let rx = self.buf.get_mut(..limit).unwrap_or_default();
        let n = self.port.read_timeout(rx, POLL_TIMEOUT).await?;
        if n == 0 {
            return Ok(IntakeOutcome::Idle);
        }
        let received = self.buf.get(..n).unwrap_or_default();

        match validate(received) {
            Ok(command) => {
                let queued = self.queue.push(command);
                let written = self.port.write_timeout(received, WRITE_TIMEOUT).await?;
                if written < n {
                    warn!("echo truncated: {} of {} bytes", written, n);
                }
                info!("cmd {}, audio_id {}", command.cmd, command.audio_id);
                Ok(IntakeOutcome::Accepted { command, queued })
            }
            Err(error) => {
                warn!("rejected {}-byte frame: {}", n, error);
                let written = self.port.write_timeout(&NACK_SENTINEL, WRITE_TIMEOUT).await?;
                if written < NACK_SENTINEL.len() {
                    warn!("nack truncated: {} of {} bytes", written, NACK_SENTINEL.len());
                }
                Ok(IntakeOutcome::Rejected(error))
            }
        }
    }

    /// Poll forever.
    ///
    /// A serial error is logged and the loop backs off for one poll period
    /// before trying again.
    pub async fn run(mut self) -> ! {
        info!("serial intake running");
        loop {
            if self.poll_once().await.is_err() {
                error!("serial link error");
                Timer::after(POLL_TIMEOUT).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use platform::mocks::MockSerial;

    type Queue = CommandQueue<NoopRawMutex, 10>;

    #[tokio::test]
    async fn valid_frame_is_queued_and_echoed() {
        let queue = Queue::new();
        let mut serial = MockSerial::new();
        serial.push_incoming(&[0xAA, 0x01, 0x02, 0x03, 0x55]);
        let mut intake = SerialIntake::new(serial, &queue);

        let outcome = intake.poll_once().await.unwrap();
        assert_eq!(
            outcome,
            IntakeOutcome::Accepted { command: Command { cmd: 1, audio_id: 2 }, queued: true }
        );
        assert_eq!(queue.try_pop(), Some(Command { cmd: 1, audio_id: 2 }));
        let serial = intake.into_port();
        assert_eq!(serial.written().len(), 1);
        assert_eq!(serial.written()[0].as_slice(), &[0xAA, 0x01, 0x02, 0x03, 0x55]);
    }

    #[tokio::test]
    async fn bad_checksum_gets_nack_and_nothing_queued() {
        let queue = Queue::new();
        let mut serial = MockSerial::new();
        serial.push_incoming(&[0xAA, 0x01, 0x02, 0x04, 0x55]);
        let mut intake = SerialIntake::new(serial, &queue);

        let outcome = intake.poll_once().await.unwrap();
        assert!(matches!(outcome, IntakeOutcome::Rejected(FrameError::ChecksumMismatch { .. })));
        assert!(queue.is_empty());
        let serial = intake.into_port();
        assert_eq!(serial.written()[0].as_slice(), &[0xFF; 5]);
    }

    #[tokio::test]
    async fn idle_line_writes_nothing() {
        let queue = Queue::new();
        let mut intake = SerialIntake::new(MockSerial::new(), &queue);
        assert_eq!(intake.poll_once().await.unwrap(), IntakeOutcome::Idle);
        assert!(intake.into_port().written().is_empty());
    }

    #[tokio::test]
    async fn full_queue_still_echoes() {
        let queue: CommandQueue<NoopRawMutex, 1> = CommandQueue::new();
        assert!(queue.push(Command { cmd: 0, audio_id: 0 }));
        let mut serial = MockSerial::new();
        serial.push_incoming(&[0xAA, 0x01, 0x02, 0x03, 0x55]);
        let mut intake = SerialIntake::new(serial, &queue);

        let outcome = intake.poll_once().await.unwrap();
        assert_eq!(
            outcome,
            IntakeOutcome::Accepted { command: Command { cmd: 1, audio_id: 2 }, queued: false }
        );
        assert_eq!(queue.dropped(), 1);
        assert_eq!(intake.into_port().written().len(), 1);
    }

    #[tokio::test]
    async fn long_frame_is_accepted() {
        let queue = Queue::new();
        let mut serial = MockSerial::new();
        serial.push_incoming(&[0xAA, 0x05, 0x07, 0x10, 0x20, 0x3C, 0x55]);
        let mut intake = SerialIntake::new(serial, &queue);
        intake.poll_once().await.unwrap();
        assert_eq!(queue.try_pop(), Some(Command { cmd: 5, audio_id: 7 }));
    }
}
