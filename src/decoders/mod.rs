//! Stateful decoders: the run state machine and the typed readers built on it.

pub mod boolean;
pub mod dictionary_values;
pub mod run_decoder;


pub use boolean::BooleanRleValuesDecoder;
pub use dictionary_values::{
    Float64RleDictionaryValuesDecoder, Int32RleDictionaryValuesDecoder,
    Int64RleDictionaryValuesDecoder, RleDictionaryValuesDecoder,
    TimestampRleDictionaryValuesDecoder, UNBOUNDED_VALUE_COUNT,
};
pub use run_decoder::{Kind, Run, RunDecoder, SliceRunDecoder};
