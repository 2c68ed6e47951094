//! This module defines the seams between the decoder and its collaborators:
//! the byte source it reads from, the dictionary it resolves codes through,
//! and the per-type reader facade callers drive.

use std::io::Cursor;

use crate::error::Result;

/// A forward-only, exhaustible byte source that is already materialized in
/// memory. Reads never block.
pub trait ByteCursor {
    /// Number of bytes that can still be read.
    fn remaining(&self) -> usize;

    fn read_byte(&mut self) -> Option<u8>;

    /// Copies up to `buf.len()` bytes into `buf` and returns how many were
    /// copied. A short count means the cursor is exhausted.
    fn read_up_to(&mut self, buf: &mut [u8]) -> usize;
}

impl<T: AsRef<[u8]>> ByteCursor for Cursor<T> {
    fn remaining(&self) -> usize {
        let len = self.get_ref().as_ref().len() as u64;
        len.saturating_sub(self.position()) as usize
    }

    fn read_byte(&mut self) -> Option<u8> {
        let pos = self.position() as usize;
        let byte = *self.get_ref().as_ref().get(pos)?;
        self.set_position((pos + 1) as u64);
        Some(byte)
    }

    fn read_up_to(&mut self, buf: &mut [u8]) -> usize {
        let n = buf.len().min(self.remaining());
        if n == 0 {
            return 0;
        }
        let pos = self.position() as usize;
        buf[..n].copy_from_slice(&self.get_ref().as_ref()[pos..pos + n]);
        self.set_position((pos + n) as u64);
        n
    }
}

impl<C: ByteCursor + ?Sized> ByteCursor for &mut C {
    fn remaining(&self) -> usize {
        (**self).remaining()
    }

    fn read_byte(&mut self) -> Option<u8> {
        (**self).read_byte()
    }

    fn read_up_to(&mut self, buf: &mut [u8]) -> usize {
        (**self).read_up_to(buf)
    }
}

/// A read-only mapping from dictionary code to domain value.
///
/// Implementations must not mutate after construction: one dictionary is
/// shared by every decoder scanning chunks of the same column, possibly on
/// different threads.
pub trait Dictionary {
    type Value: Copy;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolves `code`, or `None` when it is outside the dictionary.
    fn get(&self, code: u32) -> Option<Self::Value>;

    fn retained_size_in_bytes(&self) -> usize;
}

/// The per-type reader facade drained by column readers.
///
/// Over the life of a decoder, the `read_next` and `skip` lengths must add up
/// to exactly the number of values encoded in the chunk.
pub trait ValuesDecoder {
    type Value;

    /// Writes `length` values into `values[offset..offset + length]`.
    fn read_next(&mut self, values: &mut [Self::Value], offset: usize, length: usize)
        -> Result<()>;

    /// Advances past `length` values without materializing them.
    fn skip(&mut self, length: usize) -> Result<()>;

    fn retained_size_in_bytes(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_reads_and_tracks_remaining() {
        let data = [1u8, 2, 3, 4, 5];
        let mut cursor = Cursor::new(&data[..]);
        assert_eq!(cursor.remaining(), 5);
        assert_eq!(cursor.read_byte(), Some(1));

        let mut buf = [0u8; 3];
        assert_eq!(cursor.read_up_to(&mut buf), 3);
        assert_eq!(buf, [2, 3, 4]);
        assert_eq!(cursor.remaining(), 1);

        let mut buf = [0u8; 4];
        assert_eq!(cursor.read_up_to(&mut buf), 1);
        assert_eq!(buf, [5, 0, 0, 0]);
        assert_eq!(cursor.remaining(), 0);
        assert_eq!(cursor.read_byte(), None);
        assert_eq!(cursor.read_up_to(&mut buf), 0);
    }

    #[test]
    fn test_cursor_past_end_is_exhausted() {
        let mut cursor = Cursor::new(vec![7u8, 8]);
        cursor.set_position(10);
        assert_eq!(cursor.remaining(), 0);
        assert_eq!(cursor.read_byte(), None);
        assert_eq!(cursor.read_up_to(&mut [0u8; 2]), 0);
    }

    #[test]
    fn test_mut_ref_shares_position() {
        fn take_one(mut source: impl ByteCursor) -> Option<u8> {
            source.read_byte()
        }

        let data = [9u8, 10, 11];
        let mut cursor = Cursor::new(&data[..]);
        assert_eq!(take_one(&mut cursor), Some(9));
        assert_eq!(take_one(&mut cursor), Some(10));
        assert_eq!(cursor.remaining(), 1);
    }
}
