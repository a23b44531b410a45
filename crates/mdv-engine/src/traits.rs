//! The verification engine boundary.

use mdv_core::{VerifyError, VerifyRequest, ZkSpec};

use crate::registry::Circuit;

/// A zero-knowledge proof verification backend.
///
/// The service core is engine-agnostic: it validates documents, resolves the
/// circuit, and hands a canonical [`VerifyRequest`] across this boundary.
/// Implementations are shared across request handlers and must tolerate
/// concurrent calls.
pub trait VerifierEngine: Send + Sync {
    /// The (system, circuitHash, version, numAttributes) tuples this engine
    /// build accepts. Read-only; fixed for the lifetime of the process.
    fn supported_specs(&self) -> Vec<ZkSpec>;

    /// Computes the content identifier of a circuit from its bytes. The
    /// identifier doubles as the circuit's file name and its `circuitHash`
    /// spec field.
    fn circuit_id(&self, circuit: &[u8]) -> Result<String, VerifyError>;

    /// Verifies the proof in `request` against `circuit`.
    ///
    /// `Ok(())` means the proof is valid. [`VerifyError::ProofInvalid`] is a
    /// completed negative verdict; [`VerifyError::Engine`] means the engine
    /// itself failed and the verdict is unknown.
    fn verify_proof(&self, circuit: &Circuit, request: &VerifyRequest) -> Result<(), VerifyError>;
}
