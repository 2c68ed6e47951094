//! Wire-level pieces of the hybrid RLE / bit-packed format.
//!
//! ### Format
//! A stream is a sequence of runs. Each run starts with a LEB128 header:
//! 1.  **Bit 0**: `0` for an RLE run, `1` for a bit-packed run.
//! 2.  **Bits 1..**: the repeat count (RLE) or the number of 8-value groups (bit-packed).
//!
//! An RLE run is followed by its value in `ceil(bit_width / 8)` little-endian
//! bytes. A bit-packed run is followed by `bit_width * num_groups` bytes.
//!
//! The writers here produce that format; they back the tests and benchmarks.

use super::{bitpack, leb128};
use crate::error::{HybridRleError, Result};
use crate::traits::ByteCursor;

/// How the values of the current run are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// A single value repeated `count` times.
    Rle,
    /// `count` individually bit-packed values.
    Packed,
}

/// Splits a header into its mode and its count field.
#[inline]
pub fn parse_header(header: u32) -> (Mode, u32) {
    let mode = if header & 1 == 0 { Mode::Rle } else { Mode::Packed };
    (mode, header >> 1)
}

/// Number of bytes an RLE value occupies for `bit_width`.
#[inline]
pub fn value_byte_width(bit_width: u8) -> usize {
    (bit_width as usize + 7) / 8
}

/// Reads an RLE value: `ceil(bit_width / 8)` little-endian bytes, zero-extended.
pub fn read_rle_value<C: ByteCursor + ?Sized>(cursor: &mut C, bit_width: u8) -> Result<u32> {
    let width = value_byte_width(bit_width);
    let mut bytes = [0u8; 4];
    let read = cursor.read_up_to(&mut bytes[..width]);
    if read < width {
        return Err(HybridRleError::TruncatedStream(format!(
            "RLE value needs {} bytes, only {} available",
            width, read
        )));
    }
    Ok(u32::from_le_bytes(bytes))
}

fn check_count(count: u32) -> Result<u32> {
    if count > u32::MAX >> 1 {
        return Err(HybridRleError::InvalidArgument(format!(
            "count {} does not fit in a run header",
            count
        )));
    }
    Ok(count << 1)
}

/// Appends an RLE run of `value` repeated `run_length` times.
pub fn write_rle_run(value: u32, run_length: u32, bit_width: u8, output: &mut Vec<u8>) -> Result<()> {
    if bit_width > bitpack::MAX_BIT_WIDTH {
        return Err(HybridRleError::InvalidArgument(format!(
            "bit width must be in 0..={}, got {}",
            bitpack::MAX_BIT_WIDTH,
            bit_width
        )));
    }
    if bit_width < 32 && value >> bit_width != 0 {
        return Err(HybridRleError::InvalidArgument(format!(
            "value {} exceeds bit width {}",
            value, bit_width
        )));
    }
    leb128::encode_one(check_count(run_length)?, output)?;
    output.extend_from_slice(&value.to_le_bytes()[..value_byte_width(bit_width)]);
    Ok(())
}

/// Appends a bit-packed run. `values.len()` must be a non-zero multiple of 8.
pub fn write_bitpacked_run(values: &[u32], bit_width: u8, output: &mut Vec<u8>) -> Result<()> {
    if values.is_empty() || values.len() % bitpack::GROUP_SIZE != 0 {
        return Err(HybridRleError::InvalidArgument(format!(
            "bit-packed runs hold a multiple of {} values, got {}",
            bitpack::GROUP_SIZE,
            values.len()
        )));
    }
    let num_groups = u32::try_from(values.len() / bitpack::GROUP_SIZE).map_err(|_| {
        HybridRleError::InvalidArgument("too many groups for one run".to_string())
    })?;
    leb128::encode_one(check_count(num_groups)? | 1, output)?;
    for group in values.chunks_exact(bitpack::GROUP_SIZE) {
        bitpack::pack8(group, bit_width, output)?;
    }
    Ok(())
}

/// Appends a single-bit run, where the value lives in the header's low bit and
/// no payload follows.
pub fn write_bit_run(value: bool, run_length: u32, output: &mut Vec<u8>) -> Result<()> {
    leb128::encode_one(check_count(run_length)? | value as u32, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_header() {
        assert_eq!(parse_header(0x0A), (Mode::Rle, 5));
        assert_eq!(parse_header(0x03), (Mode::Packed, 1));
        assert_eq!(parse_header(0), (Mode::Rle, 0));
        assert_eq!(parse_header(u32::MAX), (Mode::Packed, u32::MAX >> 1));
    }

    #[test]
    fn test_value_byte_width() {
        assert_eq!(value_byte_width(0), 0);
        assert_eq!(value_byte_width(1), 1);
        assert_eq!(value_byte_width(8), 1);
        assert_eq!(value_byte_width(9), 2);
        assert_eq!(value_byte_width(17), 3);
        assert_eq!(value_byte_width(32), 4);
    }

    #[test]
    fn test_read_rle_value_zero_extends() {
        let bytes = [0x34, 0x12, 0x01, 0xFF];
        assert_eq!(read_rle_value(&mut Cursor::new(&bytes[..]), 8).unwrap(), 0x34);
        assert_eq!(read_rle_value(&mut Cursor::new(&bytes[..]), 12).unwrap(), 0x1234);
        assert_eq!(read_rle_value(&mut Cursor::new(&bytes[..]), 20).unwrap(), 0x01_1234);
        assert_eq!(read_rle_value(&mut Cursor::new(&bytes[..]), 32).unwrap(), 0xFF01_1234);
    }

    #[test]
    fn test_read_rle_value_truncated() {
        let result = read_rle_value(&mut Cursor::new(&[0x01u8][..]), 16);
        assert!(matches!(result, Err(HybridRleError::TruncatedStream(_))));
    }

    #[test]
    fn test_write_rle_run_layout() {
        let mut out = Vec::new();
        write_rle_run(0x2A, 5, 8, &mut out).unwrap();
        assert_eq!(out, vec![0x0A, 0x2A]);

        let mut out = Vec::new();
        write_rle_run(0x0102, 64, 10, &mut out).unwrap();
        assert_eq!(out, vec![0x80, 0x01, 0x02, 0x01]);

        let mut out = Vec::new();
        assert!(write_rle_run(8, 1, 3, &mut out).is_err());
    }

    #[test]
    fn test_write_bitpacked_run_layout() {
        let mut out = Vec::new();
        write_bitpacked_run(&[5, 6, 2, 5, 4, 7, 1, 0], 3, &mut out).unwrap();
        assert_eq!(out, vec![0x03, 0b1011_0101, 0b1100_1010, 0b0000_0111]);

        assert!(write_bitpacked_run(&[1, 2, 3], 3, &mut out).is_err());
        assert!(write_bitpacked_run(&[], 3, &mut out).is_err());
    }

    #[test]
    fn test_write_bit_run() {
        let mut out = Vec::new();
        write_bit_run(true, 3, &mut out).unwrap();
        write_bit_run(false, 200, &mut out).unwrap();
        assert_eq!(out, vec![0x07, 0x90, 0x03]);
    }
}
