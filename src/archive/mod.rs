//! USTAR archive construction
//!
//! This module builds tar archives in memory from (path, bytes) entries.
//! Compression and file-system access are left to the caller: the builder
//! consumes raw bytes and hands back the finished archive.

/// Format constants and record arithmetic
pub mod consts;

/// Header record encoding
mod header;

/// Growable block-aligned buffer
mod arena;

/// Per-entry metadata
mod options;

/// Archive-wide settings
mod config;

/// Archive builder state machine
mod builder;

/// Mutex-guarded handle for multi-threaded producers
mod shared;


// Re-export public types
pub use arena::ByteArena;
pub use builder::{ArchiveBuilder, ArchiveState, encode_latin1};
pub use config::ArchiveConfig;
pub use header::{HeaderBuilder, UstarHeader, validate_path};
pub use options::EntryOptions;
pub use shared::SharedArchive;
