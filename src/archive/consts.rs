/// Size of a tar record; every header and every padded content run is a
/// whole number of records
pub const RECORD_SIZE: usize = 512;

/// Default number of records per growth block
pub const DEFAULT_RECORDS_PER_BLOCK: usize = 20;

/// Size of the end-of-archive marker (two zero records)
pub const TERMINATOR_SIZE: usize = 2 * RECORD_SIZE;

// Field widths, in header order
/// Entry name
pub const NAME_LEN: usize = 100;
/// Permission bits
pub const MODE_LEN: usize = 8;
/// Owner user ID
pub const UID_LEN: usize = 8;
/// Owner group ID
pub const GID_LEN: usize = 8;
/// Content length
pub const SIZE_LEN: usize = 12;
/// Modification time
pub const MTIME_LEN: usize = 12;
/// Header checksum
pub const CHECKSUM_LEN: usize = 8;
/// Entry type flag
pub const TYPEFLAG_LEN: usize = 1;
/// Link target (unused)
pub const LINKNAME_LEN: usize = 100;
/// Format magic
pub const MAGIC_LEN: usize = 8;
/// Owner user name
pub const OWNER_LEN: usize = 32;
/// Owner group name
pub const GROUP_LEN: usize = 32;
/// Device major number (unused)
pub const DEVMAJOR_LEN: usize = 8;
/// Device minor number (unused)
pub const DEVMINOR_LEN: usize = 8;
/// Long-name prefix (unused)
pub const PREFIX_LEN: usize = 155;
/// Trailing pad up to the record size
pub const PAD_LEN: usize = 12;

/// Byte offset of the checksum field
pub const CHECKSUM_OFFSET: usize = NAME_LEN + MODE_LEN + UID_LEN + GID_LEN + SIZE_LEN + MTIME_LEN;

/// Digits in the checksum value; the field ends in NUL and space
pub const CHECKSUM_DIGITS: usize = 6;

/// Type flag of a regular file
pub const TYPEFLAG_REGULAR: u8 = b'0';

/// Old GNU magic: "ustar" followed by two spaces and a NUL
pub const MAGIC: &[u8; MAGIC_LEN] = b"ustar  \0";

/// Permission bits written when no mode is given
pub const DEFAULT_MODE: u32 = 0o777;

/// Mask applied to every mode value
pub const MODE_MASK: u32 = 0o7777;

/// Width table in header order; sums to [`RECORD_SIZE`]
pub const FIELD_WIDTHS: [(&str, usize); 16] = [
    ("fileName", NAME_LEN),
    ("fileMode", MODE_LEN),
    ("uid", UID_LEN),
    ("gid", GID_LEN),
    ("fileSize", SIZE_LEN),
    ("mtime", MTIME_LEN),
    ("checksum", CHECKSUM_LEN),
    ("type", TYPEFLAG_LEN),
    ("linkName", LINKNAME_LEN),
    ("ustar", MAGIC_LEN),
    ("owner", OWNER_LEN),
    ("group", GROUP_LEN),
    ("majorNumber", DEVMAJOR_LEN),
    ("minorNumber", DEVMINOR_LEN),
    ("filenamePrefix", PREFIX_LEN),
    ("padding", PAD_LEN),
];

const _: () = {
    let mut total = 0;
    let mut i = 0;
    while i < FIELD_WIDTHS.len() {
        total += FIELD_WIDTHS[i].1;
        i += 1;
    }
    assert!(total == RECORD_SIZE, "tar header fields must total one record");
};

/// Zero padding after `len` content bytes up to the next record boundary
#[inline]
pub const fn padding_for(len: usize) -> usize {
    (RECORD_SIZE - len % RECORD_SIZE) % RECORD_SIZE
}

/// Total bytes one entry occupies in the archive: header, content, padding
#[inline]
pub const fn entry_footprint(len: usize) -> usize {
    RECORD_SIZE + len + padding_for(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_for() {
        assert_eq!(padding_for(0), 0);
        assert_eq!(padding_for(1), 511);
        assert_eq!(padding_for(5), 507);
        assert_eq!(padding_for(512), 0);
        assert_eq!(padding_for(513), 511);
    }

    #[test]
    fn test_checksum_offset() {
        assert_eq!(CHECKSUM_OFFSET, 148);
    }

    #[test]
    fn test_field_widths_total_one_record() {
        let total: usize = FIELD_WIDTHS.iter().map(|(_, w)| w).sum();
        assert_eq!(total, RECORD_SIZE);
    }
}
