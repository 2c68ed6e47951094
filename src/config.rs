//! Decoder configuration.
//!
//! `DecoderConfig` is created once at the boundary (typically parsed from JSON
//! alongside the rest of the scan settings) and copied into every decoder
//! built for a column-chunk. It is small and `Copy`, so no sharing is needed.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// What to do when a PACKED header asks for more payload bytes than the
/// cursor still holds.
///
/// The stream itself cannot tell a legitimately short final group apart from
/// corruption that happens to land on the last group, so the lenient
/// behaviour is the default.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TruncatedGroupPolicy {
    /// **Default:** read what is available and treat the missing bytes as
    /// zero, which zero-fills the tail of the group.
    #[default]
    ZeroFill,

    /// Fail the decode with `HybridRleError::TruncatedGroup`.
    Reject,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct DecoderConfig {
    #[serde(default)]
    pub truncated_group_policy: TruncatedGroupPolicy,

    /// Upper bound on the number of values a single PACKED header may
    /// materialize. `None` leaves it bounded only by the header width.
    #[serde(default)]
    pub max_packed_values: Option<usize>,
}

impl DecoderConfig {
    /// Parses a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
