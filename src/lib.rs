//! ustar-builder - In-memory USTAR archive construction
//!
//! This library encodes (path, bytes) entries into a single contiguous tar
//! stream held in a growable, block-aligned buffer.
//!
//! # Features
//!
//! - **Header encoding**: fixed-width 512-byte USTAR headers with octal
//!   numeric fields and the standard checksum
//! - **Block-aligned arena**: capacity grows in whole blocks (20 records by
//!   default) and never loses written content
//! - **Explicit finalize**: the two zero records that end a tar stream are
//!   written by `finalize()`, after which the archive is frozen
//! - **Strict validation**: over-long paths, owner names and numeric values
//!   are rejected instead of truncated
//!
//! Compression and file-system access stay with the caller: the builder
//! takes raw bytes and returns raw bytes.
//!
//! # Example - Building an archive
//!
//! ```
//! use ustar_builder::{ArchiveBuilder, EntryOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut tar = ArchiveBuilder::new();
//! let opts = EntryOptions::new().with_mode(0o644).with_mtime(1_700_000_000);
//!
//! tar.append("a.txt", b"hello", &opts)?;
//! tar.append("dir/b.txt", b"", &opts)?;
//! assert_eq!(tar.written(), 1536);
//!
//! let archive = tar.into_bytes()?;
//! assert_eq!(archive.len(), 1536 + 1024);
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Encoding a single header
//!
//! ```
//! use ustar_builder::HeaderBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let header = HeaderBuilder::new(b"empty.txt", 0).generate()?;
//! assert_eq!(header.as_record().len(), 512);
//! assert_eq!(header.stored_checksum(), Some(0o7601));
//! # Ok(())
//! # }
//! ```

/// Shared utilities: error type and octal field encoding
pub mod common;

/// Tar archive construction
///
/// This module holds the header encoder, the byte arena and the archive
/// builder that ties them together.
pub mod archive;

// Re-export commonly used types for convenience
pub use archive::{
    ArchiveBuilder, ArchiveConfig, ArchiveState, ByteArena, EntryOptions, HeaderBuilder,
    SharedArchive, UstarHeader,
};
pub use common::{Error, Result};
