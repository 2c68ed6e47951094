//! This module defines the single, unified error type for the decoder core.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.
//!
//! Every variant is fatal for the column-chunk being decoded. Nothing here is
//! retried internally; callers propagate and drop the decoder.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HybridRleError {
    // =========================================================================
    // === Contract Violations (caller and stream disagree)
    // =========================================================================
    /// More values were requested than the stream could supply.
    #[error("End of stream: invalid read size request (requested {requested}, missing {missing})")]
    StreamUnderrun { requested: usize, missing: usize },

    /// A run header that cannot describe a valid run or packed group.
    #[error("Invalid run header: {0}")]
    DecodeModeFault(String),

    /// Bad construction or call arguments (bit width, output range).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // =========================================================================
    // === Low-Level Stream Errors
    // =========================================================================
    #[error("Truncated stream: {0}")]
    TruncatedStream(String),

    /// Only raised under `TruncatedGroupPolicy::Reject`.
    #[error("Truncated packed group: expected {expected} bytes, {available} available")]
    TruncatedGroup { expected: usize, available: usize },

    #[error("Dictionary code {code} is out of bounds for a dictionary of {len} entries")]
    DictionaryIndexOutOfBounds { code: u32, len: usize },

    // =========================================================================
    // === External Error Wrappers
    // =========================================================================
    /// An error from the Serde JSON library, raised while parsing a `DecoderConfig`.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HybridRleError>;
