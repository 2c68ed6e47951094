//! Stateless building blocks of the decoder: varints, 8-value bit-packing and
//! the run-level wire format that combines them.

pub mod bitpack;
pub mod hybrid_rle;
pub mod leb128;
