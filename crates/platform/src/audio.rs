//! Audio output abstraction

/// Fixed-function audio sink (I²S amplifier, DAC, ...).
///
/// The sink is configured once at bring-up; callers only push interleaved
/// PCM bytes in the configured [`AudioConfig`] format.
pub trait AudioSink {
    /// Error type
    type Error: core::fmt::Debug;

    /// Write PCM bytes, waiting until the sink has accepted them.
    ///
    /// Returns the number of bytes accepted.
    fn write(
        &mut self,
        pcm: &[u8],
    ) -> impl core::future::Future<Output = Result<usize, Self::Error>>;
}

/// Audio configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AudioConfig {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels (1 = mono, 2 = stereo)
    pub channels: u8,
    /// Bit depth (16 or 24)
    pub bit_depth: u8,
}

impl AudioConfig {
    /// Size of one interleaved frame in bytes.
    pub fn frame_bytes(&self) -> usize {
        usize::from(self.channels).saturating_mul(usize::from(self.bit_depth / 8))
    }
}

impl Default for AudioConfig {
    /// 44.1 kHz, 16-bit stereo: the format the sample store is authored in.
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            channels: 2,
            bit_depth: 16,
        }
    }
}
