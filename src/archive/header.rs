//! Tar header generation
//!
//! Generates the 512-byte USTAR header record for a regular file: fixed
//! width name and owner fields, octal numeric fields, the old GNU magic and
//! the header checksum.

use super::consts::*;
use super::options::EntryOptions;
use crate::common::error::{Error, Result};
use crate::common::octal::{parse_octal, write_octal_field};
use zerocopy::{FromZeros, IntoBytes};
use zerocopy_derive::{
    FromBytes as DeriveFromBytes, Immutable, IntoBytes as DeriveIntoBytes, KnownLayout,
};

/// One USTAR header record, field by field in on-disk order
#[repr(C)]
#[derive(Debug, Clone, Copy, DeriveIntoBytes, DeriveFromBytes, Immutable, KnownLayout)]
pub struct UstarHeader {
    pub name: [u8; NAME_LEN],
    pub mode: [u8; MODE_LEN],
    pub uid: [u8; UID_LEN],
    pub gid: [u8; GID_LEN],
    pub size: [u8; SIZE_LEN],
    pub mtime: [u8; MTIME_LEN],
    pub checksum: [u8; CHECKSUM_LEN],
    pub typeflag: [u8; TYPEFLAG_LEN],
    pub linkname: [u8; LINKNAME_LEN],
    pub magic: [u8; MAGIC_LEN],
    pub owner: [u8; OWNER_LEN],
    pub group: [u8; GROUP_LEN],
    pub devmajor: [u8; DEVMAJOR_LEN],
    pub devminor: [u8; DEVMINOR_LEN],
    pub prefix: [u8; PREFIX_LEN],
    pub pad: [u8; PAD_LEN],
}

const _: () = assert!(std::mem::size_of::<UstarHeader>() == RECORD_SIZE);

impl UstarHeader {
    /// Raw record bytes
    #[inline]
    pub fn as_record(&self) -> &[u8] {
        self.as_bytes()
    }

    /// Byte sum of the record with the checksum field counted as spaces
    pub fn compute_checksum(&self) -> u32 {
        let bytes = self.as_bytes();
        let outside: u32 = bytes[..CHECKSUM_OFFSET]
            .iter()
            .chain(&bytes[CHECKSUM_OFFSET + CHECKSUM_LEN..])
            .map(|&b| u32::from(b))
            .sum();
        outside + u32::from(b' ') * CHECKSUM_LEN as u32
    }

    /// Checksum stored in the checksum field, if it parses
    pub fn stored_checksum(&self) -> Option<u32> {
        parse_octal(&self.checksum).and_then(|v| u32::try_from(v).ok())
    }

    /// Entry size stored in the size field, if it parses
    pub fn entry_size(&self) -> Option<u64> {
        parse_octal(&self.size)
    }

    /// Entry name up to the first NUL
    pub fn path_bytes(&self) -> &[u8] {
        let end = memchr::memchr(0, &self.name).unwrap_or(NAME_LEN);
        &self.name[..end]
    }

    /// Splice the checksum of the current field values into the record
    fn seal(&mut self) {
        self.checksum.fill(b' ');
        let sum = self.compute_checksum();
        // A record sums to at most 512 * 255, well inside six octal digits
        let mut value = sum;
        for slot in self.checksum[..CHECKSUM_DIGITS].iter_mut().rev() {
            *slot = b'0' + (value & 0o7) as u8;
            value >>= 3;
        }
        self.checksum[CHECKSUM_DIGITS] = 0;
        self.checksum[CHECKSUM_DIGITS + 1] = b' ';
    }
}

/// Tar header builder
pub struct HeaderBuilder<'a> {
    /// Entry path as written to the name field
    path: &'a [u8],
    /// Content length in bytes
    size: u64,
    /// Permission bits (already masked)
    mode: u32,
    uid: u32,
    gid: u32,
    /// Modification time, Unix seconds
    mtime: u64,
    owner: &'a [u8],
    group: &'a [u8],
}

impl<'a> HeaderBuilder<'a> {
    /// Create a header builder for a regular file
    ///
    /// Metadata starts at the defaults: mode `0o777`, owner and group IDs
    /// zero, empty owner names and an mtime of zero.
    pub fn new(path: &'a [u8], size: u64) -> Self {
        Self {
            path,
            size,
            mode: DEFAULT_MODE,
            uid: 0,
            gid: 0,
            mtime: 0,
            owner: b"",
            group: b"",
        }
    }

    /// Create a header builder taking metadata from entry options.
    ///
    /// `mtime` is passed separately so the caller decides when the clock is
    /// read.
    pub fn from_options(path: &'a [u8], size: u64, options: &'a EntryOptions, mtime: u64) -> Self {
        Self {
            path,
            size,
            mode: options.masked_mode(),
            uid: options.uid,
            gid: options.gid,
            mtime,
            owner: options.owner.as_bytes(),
            group: options.group.as_bytes(),
        }
    }

    pub fn set_mode(&mut self, mode: u32) {
        self.mode = mode & MODE_MASK;
    }

    pub fn set_ids(&mut self, uid: u32, gid: u32) {
        self.uid = uid;
        self.gid = gid;
    }

    pub fn set_mtime(&mut self, mtime: u64) {
        self.mtime = mtime;
    }

    pub fn set_owner(&mut self, owner: &'a [u8], group: &'a [u8]) {
        self.owner = owner;
        self.group = group;
    }

    /// Check every field fits its slot without producing a record
    pub fn validate(&self) -> Result<()> {
        validate_path(self.path)?;
        check_text_field(self.owner, OWNER_LEN, "owner")?;
        check_text_field(self.group, GROUP_LEN, "group")?;
        // Numeric widths are checked when the fields are written
        let mut scratch = UstarHeader::new_zeroed();
        self.write_numbers(&mut scratch)
    }

    /// Generate the header record
    ///
    /// # Errors
    ///
    /// Fails when the path is empty, holds a NUL byte or exceeds 100 bytes,
    /// when the owner or group name exceeds 32 bytes, or when a numeric value
    /// needs more octal digits than its field holds.
    pub fn generate(&self) -> Result<UstarHeader> {
        validate_path(self.path)?;
        check_text_field(self.owner, OWNER_LEN, "owner")?;
        check_text_field(self.group, GROUP_LEN, "group")?;

        let mut header = UstarHeader::new_zeroed();

        header.name[..self.path.len()].copy_from_slice(self.path);
        self.write_numbers(&mut header)?;

        header.typeflag[0] = TYPEFLAG_REGULAR;
        header.magic.copy_from_slice(MAGIC);
        header.owner[..self.owner.len()].copy_from_slice(self.owner);
        header.group[..self.group.len()].copy_from_slice(self.group);

        // linkname, device numbers, prefix and pad stay zero

        header.seal();
        Ok(header)
    }

    fn write_numbers(&self, header: &mut UstarHeader) -> Result<()> {
        write_octal_field(&mut header.mode, u64::from(self.mode), "fileMode")?;
        write_octal_field(&mut header.uid, u64::from(self.uid), "uid")?;
        write_octal_field(&mut header.gid, u64::from(self.gid), "gid")?;
        write_octal_field(&mut header.size, self.size, "fileSize")?;
        write_octal_field(&mut header.mtime, self.mtime, "mtime")
    }
}

/// Reject paths the name field cannot hold verbatim
pub fn validate_path(path: &[u8]) -> Result<()> {
    if path.is_empty() {
        return Err(Error::InvalidInput("entry path is empty".to_string()));
    }
    if path.len() > NAME_LEN {
        return Err(Error::PathTooLong {
            len: path.len(),
            max: NAME_LEN,
        });
    }
    if let Some(pos) = memchr::memchr(0, path) {
        return Err(Error::InvalidInput(format!(
            "entry path contains a NUL byte at offset {}",
            pos
        )));
    }
    Ok(())
}

fn check_text_field(value: &[u8], width: usize, field: &'static str) -> Result<()> {
    if value.len() > width {
        return Err(Error::FieldOverflow {
            field,
            reason: format!("{} bytes exceed the {}-byte field", value.len(), width),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_txt() -> UstarHeader {
        HeaderBuilder::new(b"empty.txt", 0).generate().unwrap()
    }

    #[test]
    fn test_header_generation() {
        let header = empty_txt();
        let bytes = header.as_record();

        assert_eq!(bytes.len(), 512);
        assert_eq!(&bytes[0..9], b"empty.txt");
        assert!(bytes[9..100].iter().all(|&b| b == 0));
        assert_eq!(&bytes[100..108], b"0000777\0");
        assert_eq!(&bytes[108..116], b"0000000\0");
        assert_eq!(&bytes[116..124], b"0000000\0");
        assert_eq!(&bytes[124..136], b"00000000000\0");
        assert_eq!(&bytes[136..148], b"00000000000\0");
        assert_eq!(bytes[156], b'0');
        assert_eq!(&bytes[257..265], b"ustar  \0");
        assert!(bytes[265..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_golden_checksum() {
        let header = empty_txt();
        assert_eq!(&header.checksum, b"007601\0 ");
        assert_eq!(header.stored_checksum(), Some(3969));
        assert_eq!(header.compute_checksum(), 3969);
    }

    #[test]
    fn test_owner_and_ids() {
        let options = EntryOptions::new()
            .with_mode(0o644)
            .with_uid(1000)
            .with_gid(100)
            .with_owner("alice")
            .with_group("users");
        let header = HeaderBuilder::from_options(b"a.txt", 5, &options, 0o1234)
            .generate()
            .unwrap();

        assert_eq!(&header.mode, b"0000644\0");
        assert_eq!(&header.uid, b"0001750\0");
        assert_eq!(&header.gid, b"0000144\0");
        assert_eq!(&header.size, b"00000000005\0");
        assert_eq!(&header.mtime, b"00000001234\0");
        assert_eq!(&header.owner[..6], b"alice\0");
        assert_eq!(&header.group[..6], b"users\0");
        assert_eq!(header.stored_checksum(), Some(header.compute_checksum()));
    }

    #[test]
    fn test_full_width_path() {
        let path = [b'p'; NAME_LEN];
        let header = HeaderBuilder::new(&path, 0).generate().unwrap();
        assert_eq!(header.path_bytes(), &path[..]);
    }

    #[test]
    fn test_long_path_rejected() {
        let path = [b'p'; NAME_LEN + 1];
        let err = HeaderBuilder::new(&path, 0).generate().unwrap_err();
        assert!(matches!(err, Error::PathTooLong { len: 101, max: 100 }));
    }

    #[test]
    fn test_bad_paths_rejected() {
        assert!(matches!(
            HeaderBuilder::new(b"", 0).generate(),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            HeaderBuilder::new(b"a\0b", 0).generate(),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_long_owner_rejected() {
        let owner = [b'o'; OWNER_LEN + 1];
        let mut builder = HeaderBuilder::new(b"a", 0);
        builder.set_owner(&owner, b"");
        assert!(matches!(
            builder.generate(),
            Err(Error::FieldOverflow { field: "owner", .. })
        ));
    }

    #[test]
    fn test_numeric_overflow_rejected() {
        let mut builder = HeaderBuilder::new(b"a", 0);
        builder.set_ids(0o10000000, 0);
        assert!(matches!(
            builder.validate(),
            Err(Error::FieldOverflow { field: "uid", .. })
        ));

        let builder = HeaderBuilder::new(b"big", 0o100000000000);
        assert!(matches!(
            builder.generate(),
            Err(Error::FieldOverflow { field: "fileSize", .. })
        ));
    }

    #[test]
    fn test_mode_masked() {
        let mut builder = HeaderBuilder::new(b"a", 0);
        builder.set_mode(0o170755);
        let header = builder.generate().unwrap();
        assert_eq!(&header.mode, b"0000755\0");
    }
}
