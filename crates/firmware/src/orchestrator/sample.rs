//! Serial path: command → sample file → audio sink.

use embassy_sync::blocking_mutex::raw::RawMutex;
use platform::config::SAMPLE_CHUNK_BYTES;
use platform::{AudioConfig, AudioSink, File, Storage};
use protocol::Command;

use crate::dispatch::CommandQueue;
use crate::wav::{find_data_chunk, ChunkError};

/// Why a sample could not be played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackError<SE, FE, KE> {
    /// The store could not open the sample.
    Storage(SE),
    /// Reading the sample failed.
    File(FE),
    /// The sink rejected a write.
    Sink(KE),
    /// The sink accepted no bytes.
    SinkStalled,
    /// The sample has no `data` chunk.
    NoDataChunk,
    /// The sample ends before its declared length.
    Truncated,
}

impl<SE, FE, KE> PlaybackError<SE, FE, KE> {
    /// Short static description, suitable for log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Storage(_) => "sample not available",
            Self::File(_) => "sample read failed",
            Self::Sink(_) => "audio sink error",
            Self::SinkStalled => "audio sink stalled",
            Self::NoDataChunk => "no data chunk",
            Self::Truncated => "sample truncated",
        }
    }
}

impl<SE, FE, KE> core::fmt::Display for PlaybackError<SE, FE, KE> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<SE, FE, KE> From<ChunkError<FE>> for PlaybackError<SE, FE, KE> {
    fn from(err: ChunkError<FE>) -> Self {
        match err {
            ChunkError::File(e) => Self::File(e),
            ChunkError::Truncated => Self::Truncated,
            ChunkError::NoDataChunk => Self::NoDataChunk,
        }
    }
}

/// [`PlaybackError`] for a given store and sink.
pub type PlayError<S, K> = PlaybackError<
    <S as Storage>::Error,
    <<S as Storage>::File as File>::Error,
    <K as AudioSink>::Error,
>;

/// Plays samples from a store into a sink.
pub struct SamplePlayer<S, K> {
    storage: S,
    sink: K,
    config: AudioConfig,
    buf: [u8; SAMPLE_CHUNK_BYTES],
}

impl<S: Storage, K: AudioSink> SamplePlayer<S, K> {
    /// Player for a sink running the default format (44.1 kHz, 16-bit stereo).
    pub fn new(storage: S, sink: K) -> Self {
        Self::with_config(storage, sink, AudioConfig::default())
    }

    /// Player for a sink running `config`.
    pub fn with_config(storage: S, sink: K, config: AudioConfig) -> Self {
        Self {
            storage,
            sink,
            config,
            buf: [0; SAMPLE_CHUNK_BYTES],
        }
    }

    /// The sink.
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Take the store and sink back.
    pub fn into_parts(self) -> (S, K) {
        (self.storage, self.sink)
    }

    /// Play sample `command.audio_id`, returning the bytes sent to the sink.
    ///
    /// The `data` payload is streamed in [`SAMPLE_CHUNK_BYTES`] blocks. If
    /// the file ends early, what was read is still played and the call
    /// fails with [`PlaybackError::Truncated`]. A sample whose `fmt ` chunk
    /// disagrees with the sink format is played anyway, with a warning.
    pub async fn play(&mut self, command: Command) -> Result<usize, PlayError<S, K>> {
        let mut file = self
            .storage
            .open_sample(command.audio_id)
            .await
            .map_err(PlaybackError::Storage)?;
        let chunk = find_data_chunk(&mut file).await?;

        if let Some(format) = chunk.format.filter(|f| *f != self.config) {
            warn!(
                "sample {} is {} Hz, {} ch, {} bit; sink expects {} Hz",
                command.audio_id,
                format.sample_rate,
                format.channels,
                format.bit_depth,
                self.config.sample_rate
            );
        }

        let total = usize::try_from(chunk.len).unwrap_or(usize::MAX);
        let mut written = 0usize;
        while written < total {
            let want = total.saturating_sub(written).min(self.buf.len());
            let block = self.buf.get_mut(..want).unwrap_or_default();
            let n = file.read_full(block).await.map_err(PlaybackError::File)?;
            write_all(&mut self.sink, block.get(..n).unwrap_or_default()).await?;
            written = written.saturating_add(n);
            if n < want {
                warn!("sample {}: {} of {} bytes", command.audio_id, written, total);
                return Err(PlaybackError::Truncated);
            }
        }
        Ok(written)
    }
}

async fn write_all<K: AudioSink, SE, FE>(
    sink: &mut K,
    mut data: &[u8],
) -> Result<(), PlaybackError<SE, FE, K::Error>> {
    while !data.is_empty() {
        let n = sink.write(data).await.map_err(PlaybackError::Sink)?;
        if n == 0 {
            return Err(PlaybackError::SinkStalled);
        }
        data = data.get(n..).unwrap_or_default();
    }
    Ok(())
}

/// Serial playback loop: take each queued command and play its sample.
///
/// `cmd` is logged and otherwise ignored; every command plays. Failures are
/// logged and the loop moves on to the next command.
pub async fn run_serial_playback<M: RawMutex, const N: usize, S: Storage, K: AudioSink>(
    queue: &CommandQueue<M, N>,
    player: &mut SamplePlayer<S, K>,
) -> ! {
    info!("serial playback running");
    loop {
        let command = queue.pop().await;
        match player.play(command).await {
            Ok(bytes) => info!("played audio_id {} (cmd {}): {} bytes", command.audio_id, command.cmd, bytes),
            Err(e) => error!("audio_id {} (cmd {}): {}", command.audio_id, command.cmd, e.as_str()),
        }
    }
}
