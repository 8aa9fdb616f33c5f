//! Growable byte arena backing an archive under construction.
//!
//! The arena keeps a zero-filled backing buffer whose length is always a
//! whole number of blocks, and a separate `written` mark. Only
//! `[0, written)` is archive content; the rest is headroom.

use crate::common::error::{Error, Result};
use tracing::trace;

/// Owned, block-aligned byte buffer with a logical length
#[derive(Debug, Clone)]
pub struct ByteArena {
    /// Backing store; `buf.len()` is the capacity
    buf: Vec<u8>,
    /// Logical end of the content
    written: usize,
    /// Growth increment in bytes
    block_size: usize,
}

impl ByteArena {
    /// Create an arena holding one zeroed block.
    ///
    /// # Panics
    ///
    /// Panics if `block_size` is zero.
    pub fn new(block_size: usize) -> Self {
        assert!(block_size > 0, "Block size must be non-zero");
        Self {
            buf: vec![0; block_size],
            written: 0,
            block_size,
        }
    }

    #[inline]
    pub fn written(&self) -> usize {
        self.written
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Spare bytes past `written`
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.written
    }

    /// Content written so far
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.written]
    }

    /// Capacity `ensure_capacity(additional)` would settle on
    pub fn capacity_after(&self, additional: usize) -> Result<usize> {
        if self.remaining() >= additional {
            return Ok(self.capacity());
        }
        let target = self
            .written
            .checked_add(additional)
            .and_then(|n| n.checked_add(1))
            .and_then(|n| n.div_ceil(self.block_size).checked_mul(self.block_size))
            .ok_or(Error::ResourceLimit {
                required: u64::MAX,
                limit: usize::MAX as u64,
            })?;
        Ok(target)
    }

    /// Make room for `additional` bytes past `written`.
    ///
    /// When the spare room is too small the buffer grows to the smallest
    /// multiple of the block size that is at least `written + additional + 1`.
    /// Capacity never shrinks and `[0, written)` is preserved.
    pub fn ensure_capacity(&mut self, additional: usize) -> Result<()> {
        let new_capacity = self.capacity_after(additional)?;
        if new_capacity > self.buf.len() {
            trace!(
                old_capacity = self.buf.len(),
                new_capacity,
                written = self.written,
                "growing archive arena"
            );
            self.buf.resize(new_capacity, 0);
        }
        Ok(())
    }

    /// Copy `data` in at `written` and advance past it
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        self.ensure_capacity(data.len())?;
        let end = self.written + data.len();
        self.buf[self.written..end].copy_from_slice(data);
        self.written = end;
        Ok(())
    }

    /// Write `len` zero bytes at `written` and advance past them.
    ///
    /// The bytes are zeroed explicitly so stale content can never leak into
    /// padding.
    pub fn write_zeros(&mut self, len: usize) -> Result<()> {
        self.ensure_capacity(len)?;
        let end = self.written + len;
        self.buf[self.written..end].fill(0);
        self.written = end;
        Ok(())
    }

    /// Drop all content and go back to one zeroed block
    pub fn clear(&mut self) {
        self.buf = vec![0; self.block_size];
        self.written = 0;
    }

    /// Give up the buffer, cut down to the written content
    pub fn into_vec(mut self) -> Vec<u8> {
        self.buf.truncate(self.written);
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_one_block() {
        let arena = ByteArena::new(10240);
        assert_eq!(arena.capacity(), 10240);
        assert_eq!(arena.written(), 0);
        assert!(arena.as_slice().is_empty());
    }

    #[test]
    fn test_no_growth_when_room() {
        let mut arena = ByteArena::new(1024);
        arena.ensure_capacity(1024).unwrap();
        assert_eq!(arena.capacity(), 1024);
    }

    #[test]
    fn test_growth_rounds_to_block() {
        let mut arena = ByteArena::new(1024);
        arena.write(&[7u8; 1000]).unwrap();
        arena.ensure_capacity(100).unwrap();
        // 1000 + 100 + 1 = 1101 -> two blocks
        assert_eq!(arena.capacity(), 2048);
    }

    #[test]
    fn test_growth_exact_multiple_goes_one_past() {
        let mut arena = ByteArena::new(512);
        arena.write(&[1u8; 512]).unwrap();
        // 512 + 512 + 1 = 1025 -> three records
        arena.ensure_capacity(512).unwrap();
        assert_eq!(arena.capacity(), 1536);
    }

    #[test]
    fn test_growth_preserves_content() {
        let mut arena = ByteArena::new(512);
        let data: Vec<u8> = (0..=255u8).cycle().take(700).collect();
        arena.write(&data).unwrap();
        let before = arena.as_slice().to_vec();
        arena.ensure_capacity(5000).unwrap();
        assert_eq!(arena.as_slice(), &before[..]);
        assert_eq!(arena.capacity() % 512, 0);
        assert!(arena.capacity() > 5700);
    }

    #[test]
    fn test_write_zeros() {
        let mut arena = ByteArena::new(512);
        arena.write(b"abc").unwrap();
        arena.write_zeros(509).unwrap();
        assert_eq!(arena.written(), 512);
        assert!(arena.as_slice()[3..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_clear_resets() {
        let mut arena = ByteArena::new(512);
        arena.write(&[9u8; 3000]).unwrap();
        arena.clear();
        assert_eq!(arena.written(), 0);
        assert_eq!(arena.capacity(), 512);
    }

    #[test]
    fn test_into_vec() {
        let mut arena = ByteArena::new(512);
        arena.write(b"hello").unwrap();
        assert_eq!(arena.into_vec(), b"hello");
    }
}
