//! Typed readers for dictionary-encoded columns.
//!
//! `RleDictionaryValuesDecoder` drains a `RunDecoder` of dictionary codes and
//! resolves each code through a borrowed `Dictionary` while copying into the
//! caller's buffer. RLE runs are resolved once and repeated; packed runs are
//! resolved code by code. The value domain comes entirely from the dictionary,
//! so each domain is just a type alias.

use std::mem::size_of;

use super::run_decoder::{Run, RunDecoder};
use crate::config::DecoderConfig;
use crate::dictionary::{Float64Dictionary, Int32Dictionary, Int64Dictionary, TimestampDictionary};
use crate::error::{HybridRleError, Result};
use crate::traits::{ByteCursor, Dictionary, ValuesDecoder};

/// Value count used when the caller does not know how many values a
/// zero-bit-width chunk holds: the constant run never runs dry.
pub const UNBOUNDED_VALUE_COUNT: usize = usize::MAX;

pub struct RleDictionaryValuesDecoder<'d, C, D> {
    runs: RunDecoder<C>,
    dictionary: &'d D,
}

pub type TimestampRleDictionaryValuesDecoder<'d, C> =
    RleDictionaryValuesDecoder<'d, C, TimestampDictionary>;
pub type Int32RleDictionaryValuesDecoder<'d, C> =
    RleDictionaryValuesDecoder<'d, C, Int32Dictionary>;
pub type Int64RleDictionaryValuesDecoder<'d, C> =
    RleDictionaryValuesDecoder<'d, C, Int64Dictionary>;
pub type Float64RleDictionaryValuesDecoder<'d, C> =
    RleDictionaryValuesDecoder<'d, C, Float64Dictionary>;

impl<'d, C: ByteCursor, D: Dictionary> RleDictionaryValuesDecoder<'d, C, D> {
    pub fn try_new(bit_width: u8, cursor: C, dictionary: &'d D) -> Result<Self> {
        Self::with_config(
            UNBOUNDED_VALUE_COUNT,
            bit_width,
            cursor,
            dictionary,
            DecoderConfig::default(),
        )
    }

    pub fn with_config(
        value_count: usize,
        bit_width: u8,
        cursor: C,
        dictionary: &'d D,
        config: DecoderConfig,
    ) -> Result<Self> {
        Ok(Self {
            runs: RunDecoder::with_config(value_count, bit_width, cursor, config)?,
            dictionary,
        })
    }

    /// A reader over a run decoder built elsewhere, e.g. `RunDecoder::constant`.
    pub fn from_runs(runs: RunDecoder<C>, dictionary: &'d D) -> Self {
        Self { runs, dictionary }
    }

    pub fn runs(&self) -> &RunDecoder<C> {
        &self.runs
    }
}

#[inline]
fn resolve<D: Dictionary>(dictionary: &D, code: u32) -> Result<D::Value> {
    dictionary
        .get(code)
        .ok_or_else(|| HybridRleError::DictionaryIndexOutOfBounds {
            code,
            len: dictionary.len(),
        })
}

/// Checks that `offset..offset + length` lies inside a buffer of `len` values.
pub(crate) fn check_output_range(len: usize, offset: usize, length: usize) -> Result<()> {
    match offset.checked_add(length) {
        Some(end) if end <= len => Ok(()),
        _ => Err(HybridRleError::InvalidArgument(format!(
            "output range {}..{}+{} exceeds buffer of {} values",
            offset, offset, length, len
        ))),
    }
}

impl<C: ByteCursor, D: Dictionary> ValuesDecoder for RleDictionaryValuesDecoder<'_, C, D> {
    type Value = D::Value;

    fn read_next(&mut self, values: &mut [D::Value], offset: usize, length: usize) -> Result<()> {
        check_output_range(values.len(), offset, length)?;

        let dictionary = self.dictionary;
        let mut destination = offset;
        self.runs.read_runs(length, |run| {
            let end = destination + run.len();
            match run {
                Run::Repeated { value, .. } => {
                    values[destination..end].fill(resolve(dictionary, value)?);
                }
                Run::Packed(codes) => {
                    for (slot, &code) in values[destination..end].iter_mut().zip(codes) {
                        *slot = resolve(dictionary, code)?;
                    }
                }
            }
            destination = end;
            Ok(())
        })
    }

    fn skip(&mut self, length: usize) -> Result<()> {
        self.runs.skip(length)
    }

    fn retained_size_in_bytes(&self) -> usize {
        size_of::<&D>()
            + self.runs.retained_size_in_bytes()
            + self.dictionary.retained_size_in_bytes()
    }
}
