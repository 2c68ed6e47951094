//! This module contains the kernels for fixed-width bit-packing in groups of
//! eight values, little-endian bit order.
//!
//! A group of eight `w`-bit values always occupies exactly `w` bytes
//! (8 values * w bits / 8 bits per byte), which is what lets the run decoder
//! size packed payloads from the header alone.

use bitvec::prelude::*;

use crate::error::{HybridRleError, Result};

/// Widest value a dictionary code stream can carry.
pub const MAX_BIT_WIDTH: u8 = 32;

/// Values per packed group.
pub const GROUP_SIZE: usize = 8;

/// Unpacks one group of eight `bit_width`-bit values from `input` into the
/// first eight slots of `output`.
///
/// `input` should hold `bit_width` bytes; any bytes it is short of are read as
/// zero. `bit_width` must be in `1..=32`.
#[inline]
pub fn unpack8(input: &[u8], bit_width: u8, output: &mut [u32]) {
    debug_assert!((1..=MAX_BIT_WIDTH).contains(&bit_width));
    debug_assert!(output.len() >= GROUP_SIZE);

    let width = bit_width as u32;
    let mask = (1u64 << width) - 1;
    let mut bytes = input.iter().take(bit_width as usize);

    // At most `width + 7` live bits, so a u64 window never overflows.
    let mut acc: u64 = 0;
    let mut bits: u32 = 0;
    for slot in output.iter_mut().take(GROUP_SIZE) {
        while bits < width {
            acc |= (bytes.next().copied().unwrap_or(0) as u64) << bits;
            bits += 8;
        }
        *slot = (acc & mask) as u32;
        acc >>= width;
        bits -= width;
    }
}

/// Packs exactly eight values into `bit_width` bytes appended to `output`.
pub fn pack8(values: &[u32], bit_width: u8, output: &mut Vec<u8>) -> Result<()> {
    if bit_width == 0 || bit_width > MAX_BIT_WIDTH {
        return Err(HybridRleError::InvalidArgument(format!(
            "bit width must be in 1..={}, got {}",
            MAX_BIT_WIDTH, bit_width
        )));
    }
    if values.len() != GROUP_SIZE {
        return Err(HybridRleError::InvalidArgument(format!(
            "a packed group holds {} values, got {}",
            GROUP_SIZE,
            values.len()
        )));
    }

    let width = bit_width as usize;
    let max_val = (1u64 << width) - 1;
    let mut bits = BitVec::<u8, Lsb0>::with_capacity(GROUP_SIZE * width);
    for &val in values {
        if val as u64 > max_val {
            return Err(HybridRleError::InvalidArgument(format!(
                "value {} exceeds bit width {}",
                val, bit_width
            )));
        }
        bits.extend_from_bitslice(&val.view_bits::<Lsb0>()[..width]);
    }

    output.extend_from_slice(bits.as_raw_slice());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_unpack_fixed_vector_width_3() {
        let input = [0b1011_0101u8, 0b1100_1010, 0b0000_0111];
        let mut output = [0u32; 8];
        unpack8(&input, 3, &mut output);
        assert_eq!(output, [5, 6, 2, 5, 4, 7, 1, 0]);
    }

    #[test]
    fn test_unpack_width_8_is_identity() {
        let input = [1u8, 2, 3, 4, 250, 251, 252, 255];
        let mut output = [0u32; 8];
        unpack8(&input, 8, &mut output);
        assert_eq!(output, [1, 2, 3, 4, 250, 251, 252, 255]);
    }

    #[test]
    fn test_unpack_writes_into_offset_slot() {
        let input = [0xFFu8];
        let mut output = [9u32; 12];
        unpack8(&input, 1, &mut output[4..]);
        assert_eq!(output, [9, 9, 9, 9, 1, 1, 1, 1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_unpack_masks_every_width() {
        let input = [0xFFu8; 32];
        for bit_width in 1..=MAX_BIT_WIDTH {
            let mut output = [0u32; 8];
            unpack8(&input[..bit_width as usize], bit_width, &mut output);
            let max = ((1u64 << bit_width) - 1) as u32;
            assert!(output.iter().all(|&v| v == max), "width {}", bit_width);
        }
    }

    #[test]
    fn test_unpack_short_input_reads_zeros() {
        let mut output = [0u32; 8];
        unpack8(&[10, 20, 30], 8, &mut output);
        assert_eq!(output, [10, 20, 30, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_pack_unpack_every_width() {
        let mut rng = rand::rng();
        for bit_width in 1..=MAX_BIT_WIDTH {
            let max = (1u64 << bit_width) - 1;
            let values: Vec<u32> = (0..8)
                .map(|_| rng.random_range(0..=max) as u32)
                .collect();

            let mut packed = Vec::new();
            pack8(&values, bit_width, &mut packed).unwrap();
            assert_eq!(packed.len(), bit_width as usize);

            let mut output = [0u32; 8];
            unpack8(&packed, bit_width, &mut output);
            assert_eq!(output.as_slice(), values.as_slice(), "width {}", bit_width);
        }
    }

    #[test]
    fn test_pack_value_exceeds_bit_width_error() {
        let mut packed = Vec::new();
        let result = pack8(&[1, 2, 3, 8, 0, 0, 0, 0], 3, &mut packed);
        match result {
            Err(HybridRleError::InvalidArgument(msg)) => assert!(msg.contains("exceeds bit width 3")),
            other => panic!("Expected InvalidArgument, got {:?}", other),
        }
        assert!(packed.is_empty());
    }

    #[test]
    fn test_pack_rejects_bad_shapes() {
        let mut packed = Vec::new();
        assert!(pack8(&[0; 8], 0, &mut packed).is_err());
        assert!(pack8(&[0; 8], 33, &mut packed).is_err());
        assert!(pack8(&[0; 7], 4, &mut packed).is_err());
    }
}
