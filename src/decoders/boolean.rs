//! Reader for boolean columns stored as single-bit runs.

use super::dictionary_values::check_output_range;
use super::run_decoder::{Run, RunDecoder};
use crate::error::{HybridRleError, Result};
use crate::traits::{ByteCursor, ValuesDecoder};

pub struct BooleanRleValuesDecoder<C> {
    runs: RunDecoder<C>,
}

impl<C: ByteCursor> BooleanRleValuesDecoder<C> {
    pub fn new(cursor: C) -> Self {
        Self {
            runs: RunDecoder::single_bit(cursor),
        }
    }
}

impl<C: ByteCursor> ValuesDecoder for BooleanRleValuesDecoder<C> {
    type Value = bool;

    fn read_next(&mut self, values: &mut [bool], offset: usize, length: usize) -> Result<()> {
        check_output_range(values.len(), offset, length)?;

        let mut destination = offset;
        self.runs.read_runs(length, |run| {
            let Run::Repeated { value, count } = run else {
                return Err(HybridRleError::DecodeModeFault(
                    "single-bit stream produced a packed run".to_string(),
                ));
            };
            let end = destination + count;
            values[destination..end].fill(value == 1);
            destination = end;
            Ok(())
        })
    }

    fn skip(&mut self, length: usize) -> Result<()> {
        self.runs.skip(length)
    }

    fn retained_size_in_bytes(&self) -> usize {
        self.runs.retained_size_in_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::hybrid_rle::write_bit_run;
    use std::io::Cursor;

    fn encode(runs: &[(bool, u32)]) -> Vec<u8> {
        let mut data = Vec::new();
        for &(value, length) in runs {
            write_bit_run(value, length, &mut data).unwrap();
        }
        data
    }

    #[test]
    fn test_read_bit_runs() {
        let data = encode(&[(true, 3), (false, 2), (true, 1)]);
        let mut decoder = BooleanRleValuesDecoder::new(Cursor::new(&data[..]));

        let mut values = [false; 6];
        decoder.read_next(&mut values, 0, 4).unwrap();
        decoder.read_next(&mut values, 4, 2).unwrap();
        assert_eq!(values, [true, true, true, false, false, true]);
    }

    #[test]
    fn test_skip_then_read() {
        let data = encode(&[(false, 10), (true, 5)]);
        let mut decoder = BooleanRleValuesDecoder::new(Cursor::new(&data[..]));

        decoder.skip(12).unwrap();
        let mut values = [false; 3];
        decoder.read_next(&mut values, 0, 3).unwrap();
        assert_eq!(values, [true; 3]);
        assert!(matches!(
            decoder.skip(1),
            Err(HybridRleError::StreamUnderrun { requested: 1, missing: 1 })
        ));
    }

    #[test]
    fn test_retained_size_is_constant() {
        let data = encode(&[(true, 100)]);
        let mut decoder = BooleanRleValuesDecoder::new(Cursor::new(&data[..]));
        let before = decoder.retained_size_in_bytes();
        decoder.skip(50).unwrap();
        assert_eq!(decoder.retained_size_in_bytes(), before);
    }
}
