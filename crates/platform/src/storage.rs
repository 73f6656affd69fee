//! Sample store abstraction
//!
//! Samples are addressed by a numeric id: sample `n` lives at `"{n}.wav"`
//! relative to the store root (the hardware build mounts its store so that
//! the root is the flash partition; the desktop build roots it in a
//! directory). The store itself is opaque; only open/read/seek are used.

use core::fmt::Write as _;

/// Longest path [`sample_path`] can produce (`"255.wav"`).
pub const SAMPLE_PATH_MAX: usize = 16;

/// Build the store path of sample `id`.
pub fn sample_path(id: u8) -> heapless::String<SAMPLE_PATH_MAX> {
    let mut path = heapless::String::new();
    // Cannot fail: at most 3 digits + ".wav" fits in SAMPLE_PATH_MAX.
    let _ = write!(path, "{id}.wav");
    path
}

/// Storage trait for file system access
pub trait Storage {
    /// Error type
    type Error: core::fmt::Debug;
    /// File type
    type File: File;

    /// Open file for reading
    fn open_file(
        &mut self,
        path: &str,
    ) -> impl core::future::Future<Output = Result<Self::File, Self::Error>>;

    /// Check if path exists
    fn exists(
        &mut self,
        path: &str,
    ) -> impl core::future::Future<Output = Result<bool, Self::Error>>;

    /// Open the sample with numeric id `id`.
    fn open_sample(
        &mut self,
        id: u8,
    ) -> impl core::future::Future<Output = Result<Self::File, Self::Error>> {
        async move { self.open_file(&sample_path(id)).await }
    }
}

/// File trait for reading files
pub trait File {
    /// Error type
    type Error: core::fmt::Debug;

    /// Read from current position
    fn read(
        &mut self,
        buf: &mut [u8],
    ) -> impl core::future::Future<Output = Result<usize, Self::Error>>;

    /// Seek to absolute position
    fn seek(&mut self, pos: u64) -> impl core::future::Future<Output = Result<u64, Self::Error>>;

    /// Get file size
    fn size(&self) -> u64;

    /// Read until `buf` is full or the file ends.
    ///
    /// Returns the number of bytes read; less than `buf.len()` only at end of file.
    fn read_full(
        &mut self,
        buf: &mut [u8],
    ) -> impl core::future::Future<Output = Result<usize, Self::Error>> {
        async move {
            let mut filled = 0usize;
            while let Some(rest) = buf.get_mut(filled..).filter(|rest| !rest.is_empty()) {
                match self.read(rest).await? {
                    0 => break,
                    n => filled = filled.saturating_add(n),
                }
            }
            Ok(filled)
        }
    }
}
