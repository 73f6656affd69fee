//! Local filesystem sample store for desktop builds.
//!
//! `LocalFileStorage` implements `platform::Storage` using `std::fs`.
//! Used when the `std` feature is enabled (host runs and tests).
//! All paths are resolved relative to the sample directory provided at
//! construction, so sample `n` is `<dir>/n.wav`.

use std::fs;
use std::io::{Read, Seek, SeekFrom};
use std::path::PathBuf;

use crate::storage::{File, Storage};

/// Error type for local filesystem operations.
#[derive(Debug)]
pub struct LocalStorageError(pub std::io::Error);

impl core::fmt::Display for LocalStorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "local storage error: {}", self.0)
    }
}

impl std::error::Error for LocalStorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

/// An open sample file on the local filesystem.
pub struct LocalFile {
    inner: fs::File,
    size: u64,
}

impl File for LocalFile {
    type Error = LocalStorageError;

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        Read::read(&mut self.inner, buf).map_err(LocalStorageError)
    }

    async fn seek(&mut self, pos: u64) -> Result<u64, Self::Error> {
        Seek::seek(&mut self.inner, SeekFrom::Start(pos)).map_err(LocalStorageError)
    }

    fn size(&self) -> u64 {
        self.size
    }
}

/// A `platform::Storage` implementation backed by `std::fs`.
///
/// # Example
/// ```no_run
/// # async fn example() {
/// use platform::storage_local::LocalFileStorage;
/// use platform::Storage;
/// let mut storage = LocalFileStorage::new("/srv/haptic/samples");
/// let sample = storage.open_sample(3).await.unwrap(); // /srv/haptic/samples/3.wav
/// # }
/// ```
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    /// Create a new store rooted at `sample_dir`.
    #[must_use]
    pub fn new(sample_dir: &str) -> Self {
        Self { root: PathBuf::from(sample_dir) }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl Storage for LocalFileStorage {
    type Error = LocalStorageError;
    type File = LocalFile;

    async fn open_file(&mut self, path: &str) -> Result<Self::File, Self::Error> {
        let full = self.resolve(path);
        let file = fs::File::open(&full).map_err(LocalStorageError)?;
        let meta = file.metadata().map_err(LocalStorageError)?;
        Ok(LocalFile { inner: file, size: meta.len() })
    }

    async fn exists(&mut self, path: &str) -> Result<bool, Self::Error> {
        Ok(self.resolve(path).exists())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::storage::{File, Storage};
    use std::fs;
    use tempfile::TempDir;

    fn store(tmp: &TempDir) -> LocalFileStorage {
        LocalFileStorage::new(tmp.path().to_str().unwrap())
    }

    #[tokio::test]
    async fn open_sample_resolves_numeric_id() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("42.wav"), b"RIFF....WAVE").unwrap();
        let mut storage = store(&tmp);
        let mut file = storage.open_sample(42).await.unwrap();
        let mut buf = [0u8; 12];
        assert_eq!(file.read_full(&mut buf).await.unwrap(), 12);
        assert_eq!(&buf, b"RIFF....WAVE");
        assert_eq!(file.size(), 12);
    }

    #[tokio::test]
    async fn open_sample_missing_id_is_error() {
        let tmp = TempDir::new().unwrap();
        let mut storage = store(&tmp);
        let err = storage.open_sample(9).await.err().unwrap();
        assert_eq!(err.0.kind(), std::io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn seek_then_read_full_stops_at_eof() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("1.wav"), b"ABCDEFGH").unwrap();
        let mut storage = store(&tmp);
        let mut file = storage.open_sample(1).await.unwrap();
        file.seek(4).await.unwrap();
        let mut buf = [0u8; 8];
        let n = file.read_full(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"EFGH");
    }

    #[tokio::test]
    async fn exists_reflects_directory_contents() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("5.wav"), b"x").unwrap();
        let mut storage = store(&tmp);
        assert!(storage.exists("5.wav").await.unwrap());
        assert!(!storage.exists("6.wav").await.unwrap());
    }
}
