//! Fixed-width octal ASCII fields.
//!
//! Tar headers store every number as zero-padded base-8 ASCII followed by a
//! terminator byte. These helpers render and read such fields without
//! allocating.

use super::error::{Error, Result};

/// Largest value that fits in `digits` octal digits.
#[inline]
pub const fn max_octal(digits: usize) -> u64 {
    if digits >= 22 {
        u64::MAX
    } else {
        (1u64 << (3 * digits)) - 1
    }
}

/// Write `value` into `field` as octal digits left-padded with `'0'` to
/// `field.len() - 1` characters, followed by a NUL byte.
///
/// # Errors
///
/// Returns [`Error::FieldOverflow`] when `value` needs more digits than the
/// field can hold. The field is left untouched in that case.
///
/// # Examples
///
/// ```
/// use ustar_builder::common::octal::write_octal_field;
/// let mut field = [0xFFu8; 8];
/// write_octal_field(&mut field, 0o755, "mode").unwrap();
/// assert_eq!(&field, b"0000755\0");
/// ```
pub fn write_octal_field(field: &mut [u8], value: u64, name: &'static str) -> Result<()> {
    let Some(width) = field.len().checked_sub(1) else {
        return Err(Error::FieldOverflow {
            field: name,
            reason: "field has no room for digits".to_string(),
        });
    };

    let max = max_octal(width);
    if value > max {
        return Err(Error::FieldOverflow {
            field: name,
            reason: format!("{value} exceeds {width}-digit octal maximum {max}"),
        });
    }

    let mut rest = value;
    for slot in field[..width].iter_mut().rev() {
        *slot = b'0' + (rest & 0o7) as u8;
        rest >>= 3;
    }
    field[width] = 0;
    Ok(())
}

/// Read an octal ASCII field, stopping at the first NUL or space.
///
/// Leading spaces are skipped. Returns `None` if a non-octal digit is found
/// or the field holds no digits.
pub fn parse_octal(field: &[u8]) -> Option<u64> {
    let end = memchr::memchr(0, field).unwrap_or(field.len());
    let digits = field[..end]
        .iter()
        .skip_while(|&&b| b == b' ')
        .take_while(|&&b| b != b' ');

    let mut value: u64 = 0;
    let mut seen = false;
    for &b in digits {
        if !(b'0'..=b'7').contains(&b) {
            return None;
        }
        value = value.checked_mul(8)?.checked_add(u64::from(b - b'0'))?;
        seen = true;
    }
    seen.then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_octal_field_pads_with_zeros() {
        let mut field = [0u8; 12];
        write_octal_field(&mut field, 5, "size").unwrap();
        assert_eq!(&field, b"00000000005\0");
    }

    #[test]
    fn test_write_octal_field_maximum() {
        let mut field = [0u8; 8];
        write_octal_field(&mut field, 0o7777777, "uid").unwrap();
        assert_eq!(&field, b"7777777\0");
    }

    #[test]
    fn test_write_octal_field_overflow_leaves_field() {
        let mut field = [b'x'; 8];
        let err = write_octal_field(&mut field, 0o10000000, "uid").unwrap_err();
        assert!(matches!(err, Error::FieldOverflow { field: "uid", .. }));
        assert_eq!(&field, b"xxxxxxxx");
    }

    #[test]
    fn test_parse_octal() {
        assert_eq!(parse_octal(b"0000777\0"), Some(0o777));
        assert_eq!(parse_octal(b"007601\0 "), Some(0o7601));
        assert_eq!(parse_octal(b"   644 \0"), Some(0o644));
        assert_eq!(parse_octal(b"\0\0\0\0"), None);
        assert_eq!(parse_octal(b"0000789\0"), None);
    }

    #[test]
    fn test_max_octal() {
        assert_eq!(max_octal(6), 0o777777);
        assert_eq!(max_octal(11), 0o77777777777);
        assert_eq!(max_octal(22), u64::MAX);
    }
}
