//! # Supported-Spec Tuples
//!
//! A [`ZkSpec`] names one (system, circuit hash, attribute count, version)
//! combination the verifier build accepts. The list of supported specs is
//! compiled into the verification engine and exposed read-only; it is the
//! forward/backward-compatibility contract between provers and verifiers.
//! Deprecated circuit hashes are removed from the list on release, which
//! automatically rejects proofs built against them.

use serde::{Deserialize, Serialize};

/// The only proving-system identifier this verifier currently understands.
pub const LONGFELLOW_V1: &str = "longfellow-libzk-v1";

/// Fixed width of the verification-time string the engine expects,
/// e.g. `2025-01-01T00:00:00Z`.
pub const TIMESTAMP_LEN: usize = 20;

/// Inclusive bounds on the number of attribute claims a single proof
/// may cover.
pub const MIN_ATTRIBUTES: u32 = 1;
/// See [`MIN_ATTRIBUTES`].
pub const MAX_ATTRIBUTES: u32 = 4;

/// One supported (system, circuit, version, attribute-count) tuple.
///
/// Compatibility matching is exact on all four fields; there is no fuzzy
/// version negotiation. JSON field names match the `/specs` wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZkSpec {
    /// Proving-system identifier, e.g. [`LONGFELLOW_V1`].
    pub system: String,
    /// Hex content identifier of the circuit this spec refers to.
    pub circuit_hash: String,
    /// Number of attribute claims the circuit proves, in `1..=4`.
    pub num_attributes: u32,
    /// Spec version; bumped when the circuit format changes.
    pub version: u32,
}

impl ZkSpec {
    /// True when every field of `self` matches the declared tuple.
    pub fn matches(&self, system: &str, circuit_hash: &str, num_attributes: u32, version: u32) -> bool {
        self.system == system
            && self.circuit_hash == circuit_hash
            && self.num_attributes == num_attributes
            && self.version == version
    }
}
