//! SAI1 → MAX98357A I²S amplifier.
//!
//! # Pin assignments
//!
//! | Signal     | MCU pin | SAI function  |
//! |------------|---------|---------------|
//! | BCLK       | PE5     | SAI1_SCK_A    |
//! | LRCLK / WS | PE4     | SAI1_FS_A     |
//! | DIN        | PE6     | SAI1_SD_A     |
//!
//! The amplifier derives its clocks from BCLK, so no MCLK pin is routed.
//! Block A runs as master transmitter: Philips I²S, 16-bit stereo, MSB
//! first, frame sync one bit early, driven by DMA1 from a ring buffer in
//! AXI SRAM.

use embassy_stm32::sai::{self, Sai};
use platform::{AudioConfig, AudioSink};

/// 16-bit words converted per SAI write.
const WORDS_PER_WRITE: usize = 256;

/// Words in the DMA ring buffer.
pub const DMA_BUFFER_WORDS: usize = 2048;

/// SAI configuration for `audio` (Philips I²S, master transmitter).
pub fn sai_config(audio: AudioConfig) -> sai::Config {
    let mut config = sai::Config::default();
    config.mode = sai::Mode::Master;
    config.tx_rx = sai::TxRx::Transmitter;
    config.stereo_mono = if audio.channels == 1 { sai::StereoMono::Mono } else { sai::StereoMono::Stereo };
    config.data_size = sai::DataSize::Data16;
    config.bit_order = sai::BitOrder::MsbFirst;
    config.slot_size = sai::SlotSize::Channel16;
    config.frame_length = 32;
    config.frame_sync_active_level_length = sai::word::U7(16);
    config.frame_sync_offset = sai::FrameSyncOffset::BeforeFirstBit;
    config.frame_sync_polarity = sai::FrameSyncPolarity::ActiveLow;
    config.clock_strobe = sai::ClockStrobe::Falling;
    config.fifo_threshold = sai::FifoThreshold::Quarter;
    config
}

/// [`AudioSink`] over an SAI sub-block.
pub struct SaiSink<'d, T: sai::Instance> {
    sai: Sai<'d, T, u16>,
    started: bool,
    words: [u16; WORDS_PER_WRITE],
}

impl<'d, T: sai::Instance> SaiSink<'d, T> {
    /// Wrap a configured SAI block. Transmission starts on the first write.
    pub fn new(sai: Sai<'d, T, u16>) -> Self {
        Self {
            sai,
            started: false,
            words: [0; WORDS_PER_WRITE],
        }
    }
}

impl<'d, T: sai::Instance> AudioSink for SaiSink<'d, T> {
    type Error = sai::Error;

    async fn write(&mut self, pcm: &[u8]) -> Result<usize, sai::Error> {
        if !self.started {
            self.sai.start();
            self.started = true;
        }
        // Little-endian byte pairs → 16-bit samples. A trailing odd byte is dropped.
        let mut accepted = 0usize;
        for block in pcm.chunks(WORDS_PER_WRITE.saturating_mul(2)) {
            let mut n = 0usize;
            for (word, pair) in self.words.iter_mut().zip(block.chunks_exact(2)) {
                if let [lo, hi] = *pair {
                    *word = u16::from_le_bytes([lo, hi]);
                }
                n = n.saturating_add(1);
            }
            self.sai.write(self.words.get(..n).unwrap_or_default()).await?;
            accepted = accepted.saturating_add(n.saturating_mul(2));
        }
        if accepted < pcm.len() {
            // The odd byte counts as consumed so callers do not stall on it.
            accepted = pcm.len();
        }
        Ok(accepted)
    }
}
