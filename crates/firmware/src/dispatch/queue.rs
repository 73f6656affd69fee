//! Bounded command queue between serial intake and playback.
//!
//! # Architecture
//!
//! One [`CommandQueue`] is built by `main` and handed by reference to the
//! intake task (producer) and the playback task (consumer). It wraps an
//! embassy [`Channel`]; a push never waits, a pop waits until a command
//! arrives (or until a timeout, with [`CommandQueue::pop_timeout`]).
//!
//! # Overflow handling
//!
//! When the queue is full the new command is dropped: it does not evict an
//! older one and the producer is never blocked. Every drop increments a
//! counter readable with [`CommandQueue::dropped`].

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{with_timeout, Duration};
use protocol::Command;

/// Fixed-capacity FIFO of [`Command`]s.
pub struct CommandQueue<M: RawMutex, const N: usize> {
    channel: Channel<M, Command, N>,
    dropped: AtomicU32,
}

impl<M: RawMutex, const N: usize> CommandQueue<M, N> {
    /// An empty queue. Usable in a `static`.
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
            dropped: AtomicU32::new(0),
        }
    }

    /// Enqueue `cmd` without blocking.
    ///
    /// Returns `false` if the queue was full and the command was dropped.
    pub fn push(&self, cmd: Command) -> bool {
        match self.channel.try_send(cmd) {
            Ok(()) => true,
            Err(_) => {
                let dropped = self.dropped.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
                warn!("queue full: dropped audio_id {} ({} total)", cmd.audio_id, dropped);
                false
            }
        }
    }

    /// Wait for the next command.
    pub async fn pop(&self) -> Command {
        self.channel.receive().await
    }

    /// Wait up to `timeout` for the next command.
    pub async fn pop_timeout(&self, timeout: Duration) -> Option<Command> {
        with_timeout(timeout, self.channel.receive()).await.ok()
    }

    /// Take the next command if one is waiting.
    pub fn try_pop(&self) -> Option<Command> {
        self.channel.try_receive().ok()
    }

    /// Number of queued commands.
    pub fn len(&self) -> usize {
        self.channel.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    /// Commands dropped because the queue was full.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Maximum number of queued commands.
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<M: RawMutex, const N: usize> Default for CommandQueue<M, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embassy_time::{Instant, Timer};
    use platform::config::COMMAND_QUEUE_DEPTH;

    fn cmd(audio_id: u8) -> Command {
        Command { cmd: 1, audio_id }
    }

    #[test]
    fn pops_in_push_order() {
        let queue: CommandQueue<NoopRawMutex, 4> = CommandQueue::new();
        assert!(queue.push(cmd(1)));
        assert!(queue.push(cmd(2)));
        assert!(queue.push(cmd(3)));
        assert_eq!(queue.try_pop(), Some(cmd(1)));
        assert_eq!(queue.try_pop(), Some(cmd(2)));
        assert_eq!(queue.try_pop(), Some(cmd(3)));
        assert_eq!(queue.try_pop(), None);
    }

    #[test]
    fn push_past_capacity_drops_newest() {
        let queue: CommandQueue<NoopRawMutex, 2> = CommandQueue::new();
        assert!(queue.push(cmd(1)));
        assert!(queue.push(cmd(2)));
        assert!(!queue.push(cmd(3)));
        assert_eq!(queue.dropped(), 1);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.try_pop(), Some(cmd(1)));
        assert_eq!(queue.try_pop(), Some(cmd(2)));
    }

    #[tokio::test]
    async fn pop_timeout_returns_none_when_idle() {
        let queue: CommandQueue<NoopRawMutex, 2> = CommandQueue::new();
        assert_eq!(queue.pop_timeout(Duration::from_millis(5)).await, None);
    }

    #[tokio::test]
    async fn pop_returns_waiting_command() {
        let queue: CommandQueue<NoopRawMutex, 2> = CommandQueue::new();
        queue.push(cmd(9));
        assert_eq!(queue.pop().await, cmd(9));
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn full_depth_drains_in_push_order() {
        let queue: CommandQueue<NoopRawMutex, COMMAND_QUEUE_DEPTH> = CommandQueue::new();
        for id in 0..COMMAND_QUEUE_DEPTH as u8 {
            assert!(queue.push(cmd(id)));
        }
        assert!(!queue.push(cmd(0xFF)));

        for id in 0..COMMAND_QUEUE_DEPTH as u8 {
            assert_eq!(queue.pop().await, cmd(id));
        }
        assert!(queue.is_empty());
        assert_eq!(queue.dropped(), 1);
    }

    #[tokio::test]
    async fn waiting_pop_wakes_on_push() {
        let queue: CommandQueue<NoopRawMutex, COMMAND_QUEUE_DEPTH> = CommandQueue::new();
        let start = Instant::now();
        let producer = async {
            Timer::after_millis(5).await;
            assert!(queue.push(cmd(42)));
        };

        let (popped, ()) = tokio::join!(queue.pop_timeout(Duration::from_secs(2)), producer);

        assert_eq!(popped, Some(cmd(42)));
        assert!(start.elapsed() < Duration::from_millis(500));
    }
}
