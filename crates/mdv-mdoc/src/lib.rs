//! # mdv-mdoc — Credential Envelope Validation
//!
//! Everything between raw device-response bytes and an engine-ready
//! [`VerifyRequest`]: CBOR envelope decoding with byte-exact element values,
//! spec compatibility checks, issuer trust chain validation, and canonical
//! request assembly. The pipeline is pure with respect to its inputs; the
//! caller supplies the supported specs, the trusted roots, and the clock.

pub mod assemble;
mod claims;
pub mod decode;
mod scan;
pub mod spec_check;
pub mod trust;
pub mod types;

use chrono::{DateTime, Utc};
use mdv_core::{VerifyError, VerifyRequest, ZkSpec};

pub use decode::{decode_device_response, DecodedDocument};
pub use trust::{IssuerKey, TrustAnchorError, TrustedRoots};
pub use types::{DeviceResponse, SignedItem, ZkDocument, ZkParams, ZkSystem, X5CHAIN_LABEL};

/// Runs the full validation pipeline over a raw device-response envelope.
///
/// Stages run in a fixed order and the first failure wins: decode, spec
/// compatibility, issuer trust, assembly. No partial request ever reaches
/// the engine.
pub fn build_request(
    envelope: &[u8],
    specs: &[ZkSpec],
    roots: &TrustedRoots,
    transcript: Vec<u8>,
    now: DateTime<Utc>,
) -> Result<VerifyRequest, VerifyError> {
    let decoded = decode_device_response(envelope)?;
    spec_check::validate_spec(&decoded.doc, specs, decoded.attributes.len())?;
    let issuer_key = trust::validate_issuer(&decoded.doc, roots, now)?;
    Ok(assemble::assemble(&decoded, &issuer_key, transcript, now))
}


#[cfg(test)]
mod tests {
    use chrono::Utc;
    use mdv_core::VerifyError;

    use super::*;
    use crate::testutil;

    #[test]
    fn pipeline_builds_request_from_valid_envelope() {
        let ca = testutil::test_ca();
        let leaf = testutil::issue_leaf(&ca);
        let roots = TrustedRoots::from_pem(ca.cert.pem().as_bytes()).unwrap();
        let doc = testutil::sample_document(&leaf);
        let envelope = testutil::encode_envelope(&doc);

        let request = build_request(
            &envelope,
            &[testutil::sample_spec()],
            &roots,
            b"session transcript".to_vec(),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(request.circuit_id, doc.zk_system.params.circuit_hash);
        assert_eq!(request.attributes.len(), 1);
        // The attribute bytes must be exactly what went over the wire.
        assert_eq!(
            request.attributes[0].cbor_value,
            serde_cbor::to_vec(&serde_cbor::Value::Bool(true)).unwrap()
        );
    }

    #[test]
    fn spec_check_runs_before_trust_validation() {
        // Unsupported spec and untrusted issuer at once: the spec error wins.
        let trusted_ca = testutil::test_ca();
        let other_ca = testutil::test_ca();
        let leaf = testutil::issue_leaf(&other_ca);
        let roots = TrustedRoots::from_pem(trusted_ca.cert.pem().as_bytes()).unwrap();
        let mut doc = testutil::sample_document(&leaf);
        doc.zk_system.params.circuit_hash = "ee".repeat(32);
        let envelope = testutil::encode_envelope(&doc);

        let err = build_request(
            &envelope,
            &[testutil::sample_spec()],
            &roots,
            Vec::new(),
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, VerifyError::SpecMismatch { .. }));
    }

    #[test]
    fn untrusted_issuer_never_reaches_assembly() {
        let trusted_ca = testutil::test_ca();
        let other_ca = testutil::test_ca();
        let leaf = testutil::issue_leaf(&other_ca);
        let roots = TrustedRoots::from_pem(trusted_ca.cert.pem().as_bytes()).unwrap();
        let envelope = testutil::encode_envelope(&testutil::sample_document(&leaf));

        let err = build_request(
            &envelope,
            &[testutil::sample_spec()],
            &roots,
            Vec::new(),
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, VerifyError::UntrustedIssuer(_)));
    }
}
