//! This module contains the kernels for LEB128 (Little-Endian Base 128)
//! variable-length unsigned integers, the encoding used for every run header.
//!
//! Each byte carries 7 payload bits, least significant group first; the high
//! bit marks continuation. Decoding is panic-free and rejects values that do
//! not fit the target type.

use num_traits::{PrimInt, Unsigned};

use crate::error::{HybridRleError, Result};
use crate::traits::ByteCursor;

/// Encodes a single unsigned integer into a LEB128 byte sequence, appending to `buffer`.
pub fn encode_one<T>(value: T, buffer: &mut Vec<u8>) -> Result<()>
where
    T: PrimInt + Unsigned,
{
    let zero = T::zero();
    let seven_bit_mask = T::from(0x7F).ok_or_else(|| {
        HybridRleError::InvalidArgument("Failed to create 7-bit mask for type".to_string())
    })?;

    let mut current_value = value;
    loop {
        let byte = (current_value & seven_bit_mask).to_u8().ok_or_else(|| {
            HybridRleError::InvalidArgument("Failed to convert generic integer to u8".to_string())
        })?;
        current_value = current_value >> 7;

        if current_value == zero {
            buffer.push(byte);
            return Ok(());
        }
        buffer.push(byte | 0x80);
    }
}

/// Decodes a single unsigned integer from the cursor.
///
/// Fails with `TruncatedStream` if the cursor runs out mid-sequence, and with
/// `DecodeModeFault` if the encoded value does not fit in `T`.
pub fn decode_one<T, C>(cursor: &mut C) -> Result<T>
where
    T: PrimInt + Unsigned,
    C: ByteCursor + ?Sized,
{
    let mut result = T::zero();
    let mut shift = 0;
    let total_bits = std::mem::size_of::<T>() * 8;

    loop {
        let byte = cursor.read_byte().ok_or_else(|| {
            HybridRleError::TruncatedStream("Unexpected end of buffer in varint".to_string())
        })?;

        if shift >= total_bits {
            return Err(HybridRleError::DecodeModeFault(format!(
                "Integer overflow during varint decoding: does not fit in {} bits",
                total_bits
            )));
        }

        let seven_bit_payload = T::from(byte & 0x7F).ok_or_else(|| {
            HybridRleError::InvalidArgument("Failed to create 7-bit payload from byte".to_string())
        })?;
        result = result | (seven_bit_payload << shift);

        if byte & 0x80 == 0 {
            // The last group may carry bits above the type's width.
            if shift + 7 > total_bits && (byte >> (total_bits - shift)) > 0 {
                return Err(HybridRleError::DecodeModeFault(format!(
                    "Integer overflow during varint decoding: does not fit in {} bits",
                    total_bits
                )));
            }
            return Ok(result);
        }

        shift += 7;
    }
}
