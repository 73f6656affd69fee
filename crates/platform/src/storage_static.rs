//! Flash-resident sample store.
//!
//! The hardware build links its samples into the image (`include_bytes!`)
//! and serves them through [`StaticStorage`], a fixed table from sample id to
//! byte slice. It is also the in-memory store host tests use.

use crate::storage::{sample_path, File, Storage};

/// Errors from [`StaticStorage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StaticStorageError {
    /// No sample is registered under the requested path.
    NotFound,
}

impl core::fmt::Display for StaticStorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => f.write_str("sample not found"),
        }
    }
}

/// Read cursor over a static sample.
#[derive(Debug, Clone)]
pub struct StaticFile {
    data: &'static [u8],
    pos: usize,
}

impl File for StaticFile {
    type Error = StaticStorageError;

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let rest = self.data.get(self.pos..).unwrap_or_default();
        let n = rest.len().min(buf.len());
        if let (Some(dst), Some(src)) = (buf.get_mut(..n), rest.get(..n)) {
            dst.copy_from_slice(src);
        }
        self.pos = self.pos.saturating_add(n);
        Ok(n)
    }

    async fn seek(&mut self, pos: u64) -> Result<u64, Self::Error> {
        // Seeking past the end is allowed; subsequent reads return 0.
        self.pos = usize::try_from(pos).unwrap_or(usize::MAX);
        Ok(pos)
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Fixed table of up to `N` samples.
pub struct StaticStorage<const N: usize> {
    samples: heapless::Vec<(u8, &'static [u8]), N>,
}

impl<const N: usize> StaticStorage<N> {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self { samples: heapless::Vec::new() }
    }

    /// Register `data` as sample `id`, replacing any previous entry.
    ///
    /// Returns `false` if the table is full.
    pub fn insert(&mut self, id: u8, data: &'static [u8]) -> bool {
        if let Some(slot) = self.samples.iter_mut().find(|(sid, _)| *sid == id) {
            slot.1 = data;
            return true;
        }
        self.samples.push((id, data)).is_ok()
    }

    fn lookup(&self, path: &str) -> Option<&'static [u8]> {
        self.samples
            .iter()
            .find(|(id, _)| sample_path(*id).as_str() == path)
            .map(|(_, data)| *data)
    }
}

impl<const N: usize> Default for StaticStorage<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Storage for StaticStorage<N> {
    type Error = StaticStorageError;
    type File = StaticFile;

    async fn open_file(&mut self, path: &str) -> Result<Self::File, Self::Error> {
        self.lookup(path)
            .map(|data| StaticFile { data, pos: 0 })
            .ok_or(StaticStorageError::NotFound)
    }

    async fn exists(&mut self, path: &str) -> Result<bool, Self::Error> {
        Ok(self.lookup(path).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static CLICK: &[u8] = b"0123456789";

    #[tokio::test]
    async fn open_sample_finds_registered_id() {
        let mut store: StaticStorage<4> = StaticStorage::new();
        assert!(store.insert(3, CLICK));
        let mut file = store.open_sample(3).await.unwrap();
        let mut buf = [0u8; 4];
        file.seek(6).await.unwrap();
        assert_eq!(file.read_full(&mut buf).await.unwrap(), 4);
        assert_eq!(&buf, b"6789");
        assert_eq!(file.read(&mut buf).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let mut store: StaticStorage<4> = StaticStorage::new();
        assert_eq!(store.open_sample(1).await.err(), Some(StaticStorageError::NotFound));
        assert!(!store.exists("1.wav").await.unwrap());
    }

    #[test]
    fn insert_replaces_and_respects_capacity() {
        let mut store: StaticStorage<1> = StaticStorage::new();
        assert!(store.insert(1, CLICK));
        assert!(store.insert(1, b"x"));
        assert!(!store.insert(2, CLICK));
    }
}
