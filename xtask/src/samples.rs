//! Sample directory validation.
//!
//! The firmware links every `<id>.wav` in `SAMPLE_DIR` into its sample
//! store. This runs the firmware's own chunk scanner over each file on the
//! host so a broken sample is caught before it is flashed.

use anyhow::{Context, Result};
use colored::Colorize;
use embassy_futures::block_on;
use firmware::find_data_chunk;
use platform::config::SAMPLE_SLOTS;
use platform::storage_local::LocalFileStorage;
use platform::{AudioConfig, File, Storage};
use std::path::Path;

/// What the scanner found in one sample file.
#[derive(Debug, PartialEq, Eq)]
pub struct SampleInfo {
    pub id: u8,
    /// Bytes between the start of the payload and the end of the file.
    pub available: u64,
    pub data_len: u32,
    pub format: Option<AudioConfig>,
}

pub fn run(dir: &Path) -> Result<()> {
    println!();
    println!("{}", format!("🎵 Checking samples in {}...", dir.display()).cyan().bold());
    println!();

    let samples = scan(dir)?;
    let mut problems = 0usize;
    for sample in &samples {
        match &sample.format {
            Some(format) if *format == AudioConfig::default() => println!(
                "  {} {:>3}.wav  {} data bytes",
                "✓".green(),
                sample.id,
                sample.data_len
            ),
            Some(format) => println!(
                "  {} {:>3}.wav  {} data bytes, {} Hz / {} ch / {} bit (amplifier runs {} Hz / {} ch / {} bit)",
                "⚠".yellow(),
                sample.id,
                sample.data_len,
                format.sample_rate,
                format.channels,
                format.bit_depth,
                AudioConfig::default().sample_rate,
                AudioConfig::default().channels,
                AudioConfig::default().bit_depth,
            ),
            None => println!("  {} {:>3}.wav  {} data bytes, no fmt chunk", "⚠".yellow(), sample.id, sample.data_len),
        }
        if u64::from(sample.data_len) > sample.available {
            eprintln!("{}", format!("    ✗ data chunk runs past end of file ({} bytes left)", sample.available).red());
            problems += 1;
        }
    }
    println!();

    if samples.len() > SAMPLE_SLOTS {
        anyhow::bail!(
            "{} samples found but the firmware store holds {SAMPLE_SLOTS}",
            samples.len()
        );
    }
    if problems > 0 {
        anyhow::bail!("{problems} sample(s) would play truncated");
    }
    println!("{}", format!("✓ {} sample(s) ready to link", samples.len()).green().bold());
    println!();
    Ok(())
}

/// Scan every `<id>.wav` in `dir`, in id order.
///
/// Files that are not named `<0-255>.wav` are skipped with a warning; a
/// sample the chunk scanner rejects is an error.
pub fn scan(dir: &Path) -> Result<Vec<SampleInfo>> {
    let root = dir.to_str().context("Sample directory path is not UTF-8")?;
    let mut storage = LocalFileStorage::new(root);

    let mut ids = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let name = entry?.file_name();
        let name = name.to_string_lossy();
        match name.strip_suffix(".wav").map(str::parse::<u8>) {
            Some(Ok(id)) => ids.push(id),
            Some(Err(_)) => eprintln!("  {} {name}: not a numeric sample id, skipped", "⚠".yellow()),
            None => {}
        }
    }
    ids.sort_unstable();

    ids.into_iter().map(|id| block_on(inspect(&mut storage, id))).collect()
}

async fn inspect(storage: &mut LocalFileStorage, id: u8) -> Result<SampleInfo> {
    let mut file = storage
        .open_sample(id)
        .await
        .map_err(|e| anyhow::anyhow!("{id}.wav: {e}"))?;
    let chunk = find_data_chunk(&mut file)
        .await
        .map_err(|e| anyhow::anyhow!("{id}.wav: {}", e.as_str()))?;
    Ok(SampleInfo {
        id,
        available: file.size().saturating_sub(chunk.offset),
        data_len: chunk.len,
        format: chunk.format,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn wav(payload_len: u32) -> Vec<u8> {
        let mut out = b"RIFF\0\0\0\0WAVE".to_vec();
        out.extend_from_slice(b"data");
        out.extend_from_slice(&payload_len.to_le_bytes());
        out.extend(std::iter::repeat(0u8).take(payload_len as usize));
        out
    }

    #[test]
    fn scans_numeric_samples_in_id_order() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("7.wav"), wav(10)).unwrap();
        std::fs::write(tmp.path().join("2.wav"), wav(4)).unwrap();
        std::fs::write(tmp.path().join("click.wav"), wav(4)).unwrap();
        std::fs::write(tmp.path().join("notes.txt"), b"ignored").unwrap();

        let samples = scan(tmp.path()).unwrap();
        let ids: Vec<u8> = samples.iter().map(|s| s.id).collect();
        assert_eq!(ids, [2, 7]);
        assert_eq!(samples[1].data_len, 10);
        assert_eq!(samples[1].available, 10);
        assert_eq!(samples[1].format, None);
    }

    #[test]
    fn sample_without_data_chunk_is_an_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("1.wav"), b"RIFF\0\0\0\0WAVE").unwrap();
        let err = scan(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("no data chunk"));
    }

    #[test]
    fn overlong_data_chunk_fails_validation() {
        let tmp = TempDir::new().unwrap();
        let mut bytes = wav(4);
        bytes[16..20].copy_from_slice(&400u32.to_le_bytes());
        std::fs::write(tmp.path().join("1.wav"), bytes).unwrap();
        assert!(run(tmp.path()).is_err());
    }
}
