//! Archive-wide settings.

use super::consts::{DEFAULT_RECORDS_PER_BLOCK, RECORD_SIZE};
use crate::common::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Settings fixed for the lifetime of an [`ArchiveBuilder`](super::ArchiveBuilder).
///
/// # Example
///
/// ```rust
/// use ustar_builder::ArchiveConfig;
///
/// let config = ArchiveConfig::from_yaml_str("records_per_block: 4\nmax_archive_size: 65536\n")?;
/// assert_eq!(config.block_size(), 2048);
/// # Ok::<(), ustar_builder::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Records per growth block; capacity always grows by whole blocks
    pub records_per_block: usize,
    /// Upper bound on the finalized archive length, terminator included
    pub max_archive_size: Option<u64>,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            records_per_block: DEFAULT_RECORDS_PER_BLOCK,
            max_archive_size: None,
        }
    }
}

impl ArchiveConfig {
    pub fn with_records_per_block(mut self, records: usize) -> Self {
        self.records_per_block = records;
        self
    }

    pub fn with_max_archive_size(mut self, limit: u64) -> Self {
        self.max_archive_size = Some(limit);
        self
    }

    /// Growth increment in bytes
    #[inline]
    pub fn block_size(&self) -> usize {
        self.records_per_block * RECORD_SIZE
    }

    /// Check the settings are usable.
    pub fn validate(&self) -> Result<()> {
        if self.records_per_block == 0 {
            return Err(Error::Config(
                "records_per_block must be at least 1".to_string(),
            ));
        }
        if self.records_per_block.checked_mul(RECORD_SIZE).is_none() {
            return Err(Error::Config(format!(
                "records_per_block {} overflows the block size",
                self.records_per_block
            )));
        }
        Ok(())
    }

    /// Parse and validate settings from YAML. Missing keys take defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_saphyr::from_str(yaml)
            .map_err(|e| Error::Config(format!("Failed to parse archive config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_block_size() {
        assert_eq!(ArchiveConfig::default().block_size(), 10240);
    }

    #[test]
    fn test_zero_records_rejected() {
        let config = ArchiveConfig::default().with_records_per_block(0);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_from_yaml_defaults() {
        let config = ArchiveConfig::from_yaml_str("max_archive_size: 4096\n").unwrap();
        assert_eq!(config.records_per_block, 20);
        assert_eq!(config.max_archive_size, Some(4096));
    }

    #[test]
    fn test_from_yaml_invalid() {
        assert!(ArchiveConfig::from_yaml_str("records_per_block: 0\n").is_err());
        assert!(ArchiveConfig::from_yaml_str("records_per_block: [1, 2]\n").is_err());
    }
}
