//! In-memory tar archive builder
//!
//! Entries are encoded straight into a block-aligned [`ByteArena`]: a
//! 512-byte header, the content, then zero padding up to the next record.
//! The builder moves through three states:
//!
//! ```text
//! Empty --append--> Writing --append--> Writing
//!   |                  |
//!   +----finalize------+----> Finalized
//!
//! any state --clear--> Empty
//! ```
//!
//! `finalize()` writes the two zero records that terminate a tar stream;
//! after that the archive is frozen until `clear()`.
//!
//! Every check (path, field widths, size limit) runs before the buffer is
//! touched, so an append either lands completely or not at all.
//!
//! # Example
//!
//! ```rust
//! use ustar_builder::{ArchiveBuilder, EntryOptions};
//!
//! let mut tar = ArchiveBuilder::new();
//! let opts = EntryOptions::new().with_mtime(0);
//! tar.append("hello.txt", b"Hello, World!", &opts)?;
//! tar.append("empty.txt", b"", &opts)?;
//!
//! let archive = tar.finalize()?;
//! assert_eq!(archive.len(), 512 * 3 + 1024);
//! # Ok::<(), ustar_builder::Error>(())
//! ```

use super::arena::ByteArena;
use super::config::ArchiveConfig;
use super::consts::*;
use super::header::HeaderBuilder;
use super::options::EntryOptions;
use crate::common::error::{Error, Result};
use bytes::Bytes;
use tracing::{debug, warn};

/// Lifecycle of an archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveState {
    /// Nothing appended since creation or the last clear
    Empty,
    /// At least one entry appended
    Writing,
    /// Terminator written; appends are refused
    Finalized,
}

/// Tar archive builder
///
/// Not safe for concurrent mutation; see
/// [`SharedArchive`](super::SharedArchive) for serialized access from
/// several threads.
#[derive(Debug, Clone)]
pub struct ArchiveBuilder {
    arena: ByteArena,
    config: ArchiveConfig,
    state: ArchiveState,
    /// Entries appended since the last clear
    entry_count: usize,
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveBuilder {
    /// Create an empty builder with 20-record growth blocks and no size limit
    pub fn new() -> Self {
        let config = ArchiveConfig::default();
        Self {
            arena: ByteArena::new(config.block_size()),
            config,
            state: ArchiveState::Empty,
            entry_count: 0,
        }
    }

    /// Create an empty builder with custom settings
    pub fn with_config(config: ArchiveConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            arena: ByteArena::new(config.block_size()),
            config,
            state: ArchiveState::Empty,
            entry_count: 0,
        })
    }

    #[inline]
    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    #[inline]
    pub fn state(&self) -> ArchiveState {
        self.state
    }

    /// Bytes of archive content so far
    #[inline]
    pub fn written(&self) -> usize {
        self.arena.written()
    }

    /// Bytes reserved by the backing buffer
    #[inline]
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    #[inline]
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    /// The archive so far, `[0, written)`
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.arena.as_slice()
    }

    /// Append a regular file entry.
    ///
    /// Returns the archive content written so far.
    ///
    /// # Errors
    ///
    /// * [`Error::Finalized`] if the archive was finalized
    /// * [`Error::InvalidInput`] / [`Error::PathTooLong`] for an unusable path
    /// * [`Error::FieldOverflow`] if a metadata value does not fit its field
    /// * [`Error::ResourceLimit`] if the archive would outgrow
    ///   `max_archive_size`
    pub fn append(
        &mut self,
        path: impl AsRef<[u8]>,
        content: impl AsRef<[u8]>,
        options: &EntryOptions,
    ) -> Result<&[u8]> {
        let path = path.as_ref();
        let content = content.as_ref();

        if self.state == ArchiveState::Finalized {
            return Err(Error::Finalized);
        }

        let mtime = options.resolved_mtime();
        let header = HeaderBuilder::from_options(path, content.len() as u64, options, mtime)
            .generate()?;

        let padding = padding_for(content.len());
        self.check_limit(RECORD_SIZE as u64 + content.len() as u64 + padding as u64)?;

        // Nothing is written until the arena has room for header and content
        self.arena.ensure_capacity(RECORD_SIZE + content.len())?;
        self.arena.write(header.as_record())?;
        self.arena.write(content)?;
        self.arena.write_zeros(padding)?;

        // Keep room for the end-of-archive marker
        if self.arena.remaining() < TERMINATOR_SIZE {
            self.arena.ensure_capacity(TERMINATOR_SIZE)?;
        }

        self.state = ArchiveState::Writing;
        self.entry_count += 1;

        debug!(
            path = %String::from_utf8_lossy(path),
            size = content.len(),
            padding,
            written = self.arena.written(),
            capacity = self.arena.capacity(),
            "appended tar entry"
        );

        Ok(self.arena.as_slice())
    }

    /// Append text content encoded one byte per character (Latin-1).
    ///
    /// # Errors
    ///
    /// Returns [`Error::EncodingRange`] if any character is above U+00FF,
    /// before anything is written. Other errors as for [`append`](Self::append).
    pub fn append_latin1(
        &mut self,
        path: impl AsRef<[u8]>,
        text: &str,
        options: &EntryOptions,
    ) -> Result<&[u8]> {
        let content = encode_latin1(text)?;
        self.append(path, content, options)
    }

    /// Write the two zero records that end a tar stream and freeze the
    /// archive.
    ///
    /// Returns the complete archive. Finalizing twice returns the same bytes.
    pub fn finalize(&mut self) -> Result<&[u8]> {
        if self.state != ArchiveState::Finalized {
            self.check_limit(0)?;
            self.arena.write_zeros(TERMINATOR_SIZE)?;
            self.state = ArchiveState::Finalized;
            debug!(
                entries = self.entry_count,
                length = self.arena.written(),
                "finalized tar archive"
            );
        }
        Ok(self.arena.as_slice())
    }

    /// Finalize and hand over the archive as an owned buffer
    pub fn into_bytes(mut self) -> Result<Bytes> {
        self.finalize()?;
        Ok(Bytes::from(self.arena.into_vec()))
    }

    /// Drop every entry and return to `Empty` with one block of capacity
    pub fn clear(&mut self) {
        debug!(
            entries = self.entry_count,
            written = self.arena.written(),
            "clearing tar archive"
        );
        self.arena.clear();
        self.state = ArchiveState::Empty;
        self.entry_count = 0;
    }

    /// Fail if adding `additional` bytes of entries would push the finalized
    /// archive past the configured limit
    fn check_limit(&self, additional: u64) -> Result<()> {
        let Some(limit) = self.config.max_archive_size else {
            return Ok(());
        };
        let required = (self.arena.written() as u64)
            .saturating_add(additional)
            .saturating_add(TERMINATOR_SIZE as u64);
        if required > limit {
            warn!(required, limit, "tar archive size limit reached");
            return Err(Error::ResourceLimit { required, limit });
        }
        Ok(())
    }
}

/// Encode text one byte per character, refusing anything above U+00FF
pub fn encode_latin1(text: &str) -> Result<Vec<u8>> {
    text.chars()
        .enumerate()
        .map(|(index, c)| {
            u8::try_from(u32::from(c)).map_err(|_| Error::EncodingRange {
                code_point: u32::from(c),
                index,
            })
        })
        .collect()
}
