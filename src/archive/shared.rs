//! Thread-safe handle serializing appends to one archive.

use super::builder::{ArchiveBuilder, ArchiveState};
use super::options::EntryOptions;
use crate::common::error::Result;
use bytes::Bytes;
use parking_lot::Mutex;
use std::sync::Arc;

/// Cloneable handle to an [`ArchiveBuilder`] guarded by a mutex.
///
/// Each call takes the lock for its whole duration, so concurrent appends
/// land one after another and never interleave inside the buffer. The order
/// entries end up in is the order the lock was acquired.
#[derive(Debug, Clone, Default)]
pub struct SharedArchive {
    inner: Arc<Mutex<ArchiveBuilder>>,
}

impl SharedArchive {
    pub fn new(builder: ArchiveBuilder) -> Self {
        Self {
            inner: Arc::new(Mutex::new(builder)),
        }
    }

    /// Append an entry; returns the archive length afterwards
    pub fn append(
        &self,
        path: impl AsRef<[u8]>,
        content: impl AsRef<[u8]>,
        options: &EntryOptions,
    ) -> Result<usize> {
        let mut builder = self.inner.lock();
        builder.append(path, content, options).map(<[u8]>::len)
    }

    /// Finalize and copy out the complete archive
    pub fn finalize(&self) -> Result<Bytes> {
        let mut builder = self.inner.lock();
        builder.finalize().map(Bytes::copy_from_slice)
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn written(&self) -> usize {
        self.inner.lock().written()
    }

    pub fn state(&self) -> ArchiveState {
        self.inner.lock().state()
    }

    /// Run `f` with exclusive access to the builder
    pub fn with<R>(&self, f: impl FnOnce(&mut ArchiveBuilder) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Take the builder back once this is the last handle
    pub fn try_into_inner(self) -> std::result::Result<ArchiveBuilder, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::consts::entry_footprint;
    use std::thread;

    #[test]
    fn test_concurrent_appends_are_serialized() {
        let shared = SharedArchive::new(ArchiveBuilder::new());
        let opts = EntryOptions::new().with_mtime(0);

        thread::scope(|s| {
            for t in 0..4 {
                let shared = shared.clone();
                let opts = &opts;
                s.spawn(move || {
                    for i in 0..8 {
                        let content = vec![t as u8; 100 * (i + 1)];
                        shared
                            .append(format!("t{t}/f{i}"), &content, opts)
                            .unwrap();
                    }
                });
            }
        });

        let per_thread: usize = (1..=8).map(|i| entry_footprint(100 * i)).sum();
        let expected = per_thread * 4;
        assert_eq!(shared.written(), expected);
        assert_eq!(shared.with(|b| b.entry_count()), 32);

        let builder = shared.try_into_inner().unwrap();
        assert_eq!(builder.state(), ArchiveState::Writing);
    }

    #[test]
    fn test_finalize_copies_archive() {
        let shared = SharedArchive::default();
        shared
            .append("a", b"abc", &EntryOptions::new().with_mtime(0))
            .unwrap();
        let bytes = shared.finalize().unwrap();
        assert_eq!(bytes.len(), 2048);
        assert_eq!(shared.state(), ArchiveState::Finalized);
        shared.clear();
        assert_eq!(shared.written(), 0);
    }

    #[test]
    fn test_try_into_inner_with_other_handles() {
        let shared = SharedArchive::default();
        let other = shared.clone();
        let shared = shared.try_into_inner().unwrap_err();
        drop(other);
        assert!(shared.try_into_inner().is_ok());
    }
}
