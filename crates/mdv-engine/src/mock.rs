//! Deterministic mock engine.
//!
//! Stands in for a real proving-system backend in development and tests.
//! Circuit identifiers are SHA-256 digests of the circuit bytes, and a proof
//! is "valid" when it equals a digest binding the circuit, the document type,
//! the transcript, and every attribute triple. [`MockEngine::prove`] produces
//! that digest so tests and demo tooling can mint passing proofs.

use mdv_core::{Attribute, VerifyError, VerifyRequest, ZkSpec, LONGFELLOW_V1};
use sha2::{Digest, Sha256};

use crate::registry::Circuit;
use crate::traits::VerifierEngine;

/// In-process engine with a fixed spec table and digest-based proofs.
pub struct MockEngine {
    specs: Vec<ZkSpec>,
}

impl MockEngine {
    /// Engine advertising the built-in spec table.
    pub fn new() -> Self {
        MockEngine {
            specs: builtin_specs(),
        }
    }

    /// Engine advertising exactly `specs`. Tests use this to pin the spec
    /// table to circuits they generate on the fly.
    pub fn with_specs(specs: Vec<ZkSpec>) -> Self {
        MockEngine { specs }
    }

    /// The proof bytes [`VerifierEngine::verify_proof`] will accept for the
    /// given inputs.
    pub fn prove(
        circuit: &[u8],
        doc_type: &str,
        transcript: &[u8],
        attributes: &[Attribute],
    ) -> Vec<u8> {
        binding_digest(circuit, doc_type, transcript, attributes)
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl VerifierEngine for MockEngine {
    fn supported_specs(&self) -> Vec<ZkSpec> {
        self.specs.clone()
    }

    fn circuit_id(&self, circuit: &[u8]) -> Result<String, VerifyError> {
        Ok(hex::encode(Sha256::digest(circuit)))
    }

    fn verify_proof(&self, circuit: &Circuit, request: &VerifyRequest) -> Result<(), VerifyError> {
        if circuit.id != request.circuit_id {
            return Err(VerifyError::Engine(format!(
                "circuit {} does not match request circuit id {}",
                circuit.id, request.circuit_id
            )));
        }
        let expected = binding_digest(
            &circuit.bytes,
            &request.doc_type,
            &request.transcript,
            &request.attributes,
        );
        if request.proof == expected {
            Ok(())
        } else {
            Err(VerifyError::ProofInvalid(
                "proof does not bind the presented attributes".to_string(),
            ))
        }
    }
}

/// Length-prefixed digest over everything a real proof would commit to.
fn binding_digest(
    circuit: &[u8],
    doc_type: &str,
    transcript: &[u8],
    attributes: &[Attribute],
) -> Vec<u8> {
    let mut hasher = Sha256::new();
    for part in [circuit, doc_type.as_bytes(), transcript] {
        hasher.update((part.len() as u64).to_be_bytes());
        hasher.update(part);
    }
    for attribute in attributes {
        for part in [
            attribute.namespace.as_bytes(),
            attribute.id.as_bytes(),
            attribute.cbor_value.as_slice(),
        ] {
            hasher.update((part.len() as u64).to_be_bytes());
            hasher.update(part);
        }
    }
    hasher.finalize().to_vec()
}

/// Spec table for the circuits a development build ships with.
fn builtin_specs() -> Vec<ZkSpec> {
    const CIRCUIT_HASHES: [&str; 4] = [
        "2836f3b2cd85871f7b29c1f6a2f4ad2872019022b4d7b102cfa1cc31a2b30cfe",
        "40b2b68088f1d4c56569f932fe09a4ddf1b2bd014a3893df9f74b81ec091962f",
        "99a5da3fb7d244c1d8180131e17f31a25f0a941cd230d4784b9d0cbf5a0b99a6",
        "c353acad5f337e64548e294e2cc36d4e00e15fc377fe3e6b46e1b9ffdffce4a1",
    ];
    CIRCUIT_HASHES
        .iter()
        .enumerate()
        .map(|(i, hash)| ZkSpec {
            system: LONGFELLOW_V1.to_string(),
            circuit_hash: (*hash).to_string(),
            num_attributes: i as u32 + 1,
            version: 2,
        })
        .collect()
}
