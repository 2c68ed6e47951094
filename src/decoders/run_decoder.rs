//! The run state machine shared by every typed reader.
//!
//! A `RunDecoder` holds the run currently being drained: either a single
//! repeated code (`Mode::Rle`) or a freshly unpacked group buffer
//! (`Mode::Packed`), plus the number of values of that run not yet handed
//! out. `decode` replaces the current run with the next one from the cursor.
//! Typed readers own a `RunDecoder` and drain it through `read_runs`.

use std::io::Cursor;
use std::mem::size_of;

use crate::config::{DecoderConfig, TruncatedGroupPolicy};
use crate::error::{HybridRleError, Result};
use crate::kernels::bitpack::{self, GROUP_SIZE, MAX_BIT_WIDTH};
use crate::kernels::hybrid_rle::{self, Mode};
use crate::kernels::leb128;
use crate::traits::ByteCursor;

/// Selects how headers are interpreted. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Hybrid RLE / bit-packed runs with values of `bit_width` bits.
    Generic,
    /// Every header is an RLE run whose value is the header's low bit.
    /// No payload bytes follow the header.
    SingleBit,
}

/// A slice of the current run handed to a `read_runs` sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Run<'a> {
    Repeated { value: u32, count: usize },
    Packed(&'a [u32]),
}

impl Run<'_> {
    pub fn len(&self) -> usize {
        match self {
            Run::Repeated { count, .. } => *count,
            Run::Packed(codes) => codes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug)]
pub struct RunDecoder<C> {
    kind: Kind,
    bit_width: u8,
    /// `None` in constant-only mode: the initial run is all there is.
    cursor: Option<C>,
    config: DecoderConfig,

    mode: Mode,
    current_value: u32,
    /// Values of the current run not yet consumed.
    current_count: usize,
    /// Total length of the current packed run.
    run_length: usize,
    /// Unpacked codes of the groups of the current packed run that the
    /// stream actually holds. Groups past the end of the stream are not
    /// materialized and read as zero. Empty in RLE mode.
    current_buffer: Vec<u32>,
}

pub type SliceRunDecoder<'a> = RunDecoder<Cursor<&'a [u8]>>;

impl<C: ByteCursor> RunDecoder<C> {
    /// Creates a decoder over `cursor` with the default config.
    ///
    /// A `bit_width` of 0 means every value of the chunk is code 0: the
    /// decoder yields `value_count` zeros and never reads `cursor`.
    pub fn try_new(value_count: usize, bit_width: u8, cursor: C) -> Result<Self> {
        Self::with_config(value_count, bit_width, cursor, DecoderConfig::default())
    }

    pub fn with_config(
        value_count: usize,
        bit_width: u8,
        cursor: C,
        config: DecoderConfig,
    ) -> Result<Self> {
        if bit_width > MAX_BIT_WIDTH {
            return Err(HybridRleError::InvalidArgument(format!(
                "bit width must be in 0..={}, got {}",
                MAX_BIT_WIDTH, bit_width
            )));
        }
        if bit_width == 0 {
            return Ok(Self {
                config,
                ..Self::constant(0, value_count)
            });
        }
        Ok(Self {
            kind: Kind::Generic,
            bit_width,
            cursor: Some(cursor),
            config,
            mode: Mode::Rle,
            current_value: 0,
            current_count: 0,
            run_length: 0,
            current_buffer: Vec::new(),
        })
    }

    /// A decoder for a single run of `value` repeated `count` times, supplied
    /// out of band. It has no stream.
    pub fn constant(value: u32, count: usize) -> Self {
        Self {
            kind: Kind::Generic,
            bit_width: 0,
            cursor: None,
            config: DecoderConfig::default(),
            mode: Mode::Rle,
            current_value: value,
            current_count: count,
            run_length: 0,
            current_buffer: Vec::new(),
        }
    }

    /// A decoder for single-bit runs (boolean columns).
    pub fn single_bit(cursor: C) -> Self {
        Self {
            kind: Kind::SingleBit,
            bit_width: 1,
            cursor: Some(cursor),
            config: DecoderConfig::default(),
            mode: Mode::Rle,
            current_value: 0,
            current_count: 0,
            run_length: 0,
            current_buffer: Vec::new(),
        }
    }

    /// Loads the next run from the stream.
    ///
    /// Returns `Ok(false)` when there is nothing left to read: the decoder has
    /// no stream, or the cursor is exhausted (which also zeroes the current
    /// count). Errors are fatal for the chunk.
    pub fn decode(&mut self) -> Result<bool> {
        let Some(cursor) = self.cursor.as_mut() else {
            return Ok(false);
        };
        if cursor.remaining() == 0 {
            self.current_count = 0;
            return Ok(false);
        }

        let header: u32 = leb128::decode_one(cursor)?;
        match self.kind {
            Kind::SingleBit => {
                self.mode = Mode::Rle;
                self.current_value = header & 1;
                self.current_count = (header >> 1) as usize;
            }
            Kind::Generic => match hybrid_rle::parse_header(header) {
                (Mode::Rle, run_length) => {
                    self.current_value = hybrid_rle::read_rle_value(cursor, self.bit_width)?;
                    self.mode = Mode::Rle;
                    self.current_count = run_length as usize;
                    self.current_buffer = Vec::new();
                }
                (Mode::Packed, num_groups) => {
                    let (run_length, buffer) =
                        read_packed_groups(cursor, num_groups, self.bit_width, &self.config)?;
                    self.mode = Mode::Packed;
                    self.run_length = run_length;
                    self.current_count = run_length;
                    self.current_buffer = buffer;
                }
            },
        }

        log::trace!(
            "decoded {:?} run of {} values (bit width {})",
            self.mode,
            self.current_count,
            self.bit_width
        );
        Ok(true)
    }

    /// Hands out exactly `length` values, run slice by run slice, loading new
    /// runs as the current one drains.
    ///
    /// Fails with `StreamUnderrun` if the stream ends first; `sink` has then
    /// already seen every value that was available.
    pub fn read_runs<F>(&mut self, length: usize, mut sink: F) -> Result<()>
    where
        F: FnMut(Run<'_>) -> Result<()>,
    {
        let mut remaining = length;
        while remaining > 0 {
            if self.current_count == 0 && !self.decode()? {
                break;
            }

            let wanted = remaining.min(self.current_count);
            let run = match self.mode {
                Mode::Rle => Run::Repeated {
                    value: self.current_value,
                    count: wanted,
                },
                Mode::Packed => {
                    let start = self.run_length - self.current_count;
                    match self.current_buffer.get(start..) {
                        Some(codes) if !codes.is_empty() => {
                            Run::Packed(&codes[..wanted.min(codes.len())])
                        }
                        // Groups past the end of the stream read as zero.
                        _ => Run::Repeated {
                            value: 0,
                            count: wanted,
                        },
                    }
                }
            };
            let n = run.len();
            sink(run)?;

            self.current_count -= n;
            remaining -= n;
        }

        if remaining != 0 {
            return Err(HybridRleError::StreamUnderrun {
                requested: length,
                missing: remaining,
            });
        }
        Ok(())
    }

    /// Advances past `length` values without looking at them.
    pub fn skip(&mut self, length: usize) -> Result<()> {
        self.read_runs(length, |_| Ok(()))
    }
}

impl<C> RunDecoder<C> {
    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn bit_width(&self) -> u8 {
        self.bit_width
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn current_value(&self) -> u32 {
        self.current_value
    }

    pub fn current_count(&self) -> usize {
        self.current_count
    }

    /// The not-yet-consumed, materialized codes of the current packed run.
    /// Zero-filled groups past the end of the stream are not included.
    pub fn pending_codes(&self) -> &[u32] {
        match self.mode {
            Mode::Rle => &[],
            Mode::Packed => self
                .current_buffer
                .get(self.run_length - self.current_count..)
                .unwrap_or(&[]),
        }
    }

    #[cfg(test)]
    pub(crate) fn consume(&mut self, amount: usize) {
        self.current_count -= amount;
    }

    pub fn retained_size_in_bytes(&self) -> usize {
        size_of::<Self>() + self.current_buffer.capacity() * size_of::<u32>()
    }
}

/// Reads and unpacks the payload of a packed run of `num_groups` groups.
///
/// Returns the run length and the codes of the groups backed by stream
/// bytes, so memory is bounded by the input rather than by the header.
fn read_packed_groups<C: ByteCursor + ?Sized>(
    cursor: &mut C,
    num_groups: u32,
    bit_width: u8,
    config: &DecoderConfig,
) -> Result<(usize, Vec<u32>)> {
    let value_count = (num_groups as usize)
        .checked_mul(GROUP_SIZE)
        .ok_or_else(|| {
            HybridRleError::DecodeModeFault(format!("{} packed groups overflow", num_groups))
        })?;
    if let Some(max) = config.max_packed_values {
        if value_count > max {
            return Err(HybridRleError::DecodeModeFault(format!(
                "packed run of {} values exceeds the configured maximum of {}",
                value_count, max
            )));
        }
    }

    let width = bit_width as usize;
    let required = width.checked_mul(num_groups as usize).ok_or_else(|| {
        HybridRleError::DecodeModeFault(format!("{} packed groups overflow", num_groups))
    })?;
    let available = cursor.remaining();
    if required > available {
        match config.truncated_group_policy {
            TruncatedGroupPolicy::Reject => {
                log::debug!(
                    "rejecting truncated packed run: {} bytes required, {} available",
                    required,
                    available
                );
                return Err(HybridRleError::TruncatedGroup {
                    expected: required,
                    available,
                });
            }
            TruncatedGroupPolicy::ZeroFill => {
                log::debug!(
                    "zero-filling truncated packed run: {} bytes required, {} available",
                    required,
                    available
                );
            }
        }
    }

    let mut bytes = vec![0u8; required.min(available)];
    let read = cursor.read_up_to(&mut bytes);
    bytes.truncate(read);

    // A short last group is unpacked with its missing bytes read as zero.
    let backed_values = (read + width - 1) / width * GROUP_SIZE;
    let mut values = Vec::new();
    values.try_reserve_exact(backed_values).map_err(|err| {
        HybridRleError::DecodeModeFault(format!(
            "cannot allocate {} packed values: {}",
            backed_values, err
        ))
    })?;
    values.resize(backed_values, 0);
    for (group, out) in bytes.chunks(width).zip(values.chunks_exact_mut(GROUP_SIZE)) {
        bitpack::unpack8(group, bit_width, out);
    }
    Ok((value_count, values))
}
