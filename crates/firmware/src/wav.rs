//! RIFF/WAVE chunk scanning.
//!
//! A sample is a RIFF file: a 12-byte `RIFF....WAVE` header followed by
//! chunks of `(tag: 4 bytes)(size: u32 LE)(payload)`. Only the `data`
//! chunk is played. The `fmt ` chunk, when present before it, is decoded so
//! the caller can check the sample against the sink's format. Every other
//! chunk is skipped by its declared size; odd sizes are not padded.

use platform::config::RIFF_HEADER_LEN;
use platform::{AudioConfig, File};

const CHUNK_HEADER_LEN: usize = 8;
const FMT_BODY_LEN: usize = 16;

/// Location of the `data` payload inside a sample file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataChunk {
    /// File offset of the first payload byte.
    pub offset: u64,
    /// Payload length declared by the chunk header.
    pub len: u32,
    /// Format from a preceding `fmt ` chunk, if there was one.
    pub format: Option<AudioConfig>,
}

/// Why a sample could not be located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkError<E> {
    /// The file reported an error.
    File(E),
    /// The file ends inside a chunk header.
    Truncated,
    /// The chunk list ends without a `data` chunk.
    NoDataChunk,
}

impl<E> ChunkError<E> {
    /// Short static description, suitable for log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File(_) => "file error",
            Self::Truncated => "truncated chunk header",
            Self::NoDataChunk => "no data chunk",
        }
    }
}

/// Walk the chunk list from offset 12 until the `data` chunk.
///
/// On success the file cursor sits on the first payload byte.
pub async fn find_data_chunk<F: File>(file: &mut F) -> Result<DataChunk, ChunkError<F::Error>> {
    let size = file.size();
    let mut pos = RIFF_HEADER_LEN;
    let mut format = None;

    loop {
        if pos >= size {
            return Err(ChunkError::NoDataChunk);
        }
        file.seek(pos).await.map_err(ChunkError::File)?;

        let mut header = [0u8; CHUNK_HEADER_LEN];
        let n = file.read_full(&mut header).await.map_err(ChunkError::File)?;
        if n < CHUNK_HEADER_LEN {
            return Err(ChunkError::Truncated);
        }
        let [t0, t1, t2, t3, s0, s1, s2, s3] = header;
        let tag = [t0, t1, t2, t3];
        let len = u32::from_le_bytes([s0, s1, s2, s3]);
        let body = pos.checked_add(CHUNK_HEADER_LEN as u64).ok_or(ChunkError::Truncated)?;

        match &tag {
            b"data" => {
                trace!("data chunk at {} ({} bytes)", body, len);
                return Ok(DataChunk { offset: body, len, format });
            }
            b"fmt " if usize::try_from(len).is_ok_and(|l| l >= FMT_BODY_LEN) => {
                let mut fmt = [0u8; FMT_BODY_LEN];
                if file.read_full(&mut fmt).await.map_err(ChunkError::File)? == FMT_BODY_LEN {
                    format = Some(parse_fmt(fmt));
                }
            }
            _ => {}
        }

        pos = body.checked_add(u64::from(len)).ok_or(ChunkError::NoDataChunk)?;
    }
}

/// Decode the fixed part of a `fmt ` chunk body.
fn parse_fmt(body: [u8; FMT_BODY_LEN]) -> AudioConfig {
    let [_, _, c0, c1, r0, r1, r2, r3, _, _, _, _, _, _, b0, b1] = body;
    AudioConfig {
        sample_rate: u32::from_le_bytes([r0, r1, r2, r3]),
        channels: u8::try_from(u16::from_le_bytes([c0, c1])).unwrap_or(u8::MAX),
        bit_depth: u8::try_from(u16::from_le_bytes([b0, b1])).unwrap_or(u8::MAX),
    }
}
