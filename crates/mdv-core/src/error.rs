//! # Error Taxonomy
//!
//! Every pipeline stage reports through [`VerifyError`]. The first four
//! variants are detected locally before any cryptography runs and
//! short-circuit the pipeline; the last two are produced at the engine
//! boundary and are distinguished at the service layer: an engine
//! execution failure is an operational problem, a negative verdict is an
//! expected outcome.

use thiserror::Error;

/// Pipeline and engine errors for a single verification request.
///
/// None of these are fatal to the process; they reject the request that
/// triggered them and nothing else.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// Malformed, truncated, or type-mismatched CBOR input.
    #[error("decode error: {0}")]
    Decode(String),

    /// The declared (system, circuitHash, version, numAttributes) tuple
    /// does not exactly match any supported spec.
    #[error("unsupported spec: {field}: expected {expected}, got {actual}")]
    SpecMismatch {
        /// The offending field, e.g. `system` or `circuitHash`.
        field: &'static str,
        /// What the registry would have accepted.
        expected: String,
        /// What the document declared.
        actual: String,
    },

    /// Declared attribute count disagrees with the signed items present.
    #[error("attribute count mismatch: declared {declared}, found {found}")]
    AttributeCount {
        /// `numAttributes` as declared in the document.
        declared: u32,
        /// Signed items actually present across all namespaces.
        found: usize,
    },

    /// Certificate chain absent, malformed, expired, wrong-usage, or not
    /// rooted in the trusted store. Never degrades to "trust anyway".
    #[error("untrusted issuer: {0}")]
    UntrustedIssuer(String),

    /// The verification engine itself failed to execute.
    #[error("engine error: {0}")]
    Engine(String),

    /// The engine ran to completion and the proof is invalid.
    #[error("proof verification failed: {0}")]
    ProofInvalid(String),
}

impl VerifyError {
    /// True for errors that reject the request before the engine runs.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Decode(_)
                | Self::SpecMismatch { .. }
                | Self::AttributeCount { .. }
                | Self::UntrustedIssuer(_)
        )
    }
}
