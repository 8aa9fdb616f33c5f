//! Per-entry header metadata.

use super::consts::{DEFAULT_MODE, MODE_MASK};
use serde::{Deserialize, Serialize};

/// Metadata recorded in an entry's header.
///
/// Every field has an explicit default, so zero values such as `uid: 0` or
/// `mode: 0` are written as given rather than treated as missing.
///
/// # Example
///
/// ```rust
/// use ustar_builder::EntryOptions;
///
/// let opts = EntryOptions::new()
///     .with_mode(0o644)
///     .with_mtime(1_700_000_000)
///     .with_owner("alice");
/// assert_eq!(opts.mode, 0o644);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryOptions {
    /// Permission bits; masked to 12 bits when encoded
    pub mode: u32,
    /// Modification time in Unix seconds; `None` means the time of the append
    pub mtime: Option<u64>,
    /// Owner user ID
    pub uid: u32,
    /// Owner group ID
    pub gid: u32,
    /// Owner user name
    pub owner: String,
    /// Owner group name
    pub group: String,
}

impl Default for EntryOptions {
    fn default() -> Self {
        Self {
            mode: DEFAULT_MODE,
            mtime: None,
            uid: 0,
            gid: 0,
            owner: String::new(),
            group: String::new(),
        }
    }
}

impl EntryOptions {
    /// Options with every field at its default
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_mtime(mut self, mtime: u64) -> Self {
        self.mtime = Some(mtime);
        self
    }

    pub fn with_uid(mut self, uid: u32) -> Self {
        self.uid = uid;
        self
    }

    pub fn with_gid(mut self, gid: u32) -> Self {
        self.gid = gid;
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    /// Mode as written to the header
    #[inline]
    pub fn masked_mode(&self) -> u32 {
        self.mode & MODE_MASK
    }

    /// Resolve the modification time, reading the clock if none was given.
    ///
    /// Clocks set before the Unix epoch resolve to zero.
    pub fn resolved_mtime(&self) -> u64 {
        self.mtime
            .unwrap_or_else(|| u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0))
    }
}
