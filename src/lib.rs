//! This file is the root of the `hybrid_rle` crate: a decoder for the hybrid
//! run-length / bit-packed encoding used for dictionary-coded column chunks.
//!
//! Data flows one way:
//! byte cursor -> `kernels` (varint headers, 8-value unpacking)
//! -> `decoders::RunDecoder` (run state machine)
//! -> typed readers (`decoders::*ValuesDecoder`) -> caller buffer.
//!
//! Decoders are single-threaded and owned by one column reader; the
//! dictionaries they borrow are immutable and may be shared across threads.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod config;
pub mod decoders;
pub mod dictionary;
pub mod error;
pub mod kernels;
pub mod observability;
pub mod traits;

//==================================================================================
// 2. Re-exports
//==================================================================================
pub use config::{DecoderConfig, TruncatedGroupPolicy};
pub use decoders::{
    BooleanRleValuesDecoder, Kind, RleDictionaryValuesDecoder, RunDecoder,
    TimestampRleDictionaryValuesDecoder,
};
pub use dictionary::{PlainDictionary, TimestampDictionary};
pub use error::{HybridRleError, Result};
pub use kernels::hybrid_rle::Mode;
pub use traits::{ByteCursor, Dictionary, ValuesDecoder};
