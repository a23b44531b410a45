//! # Engine-Ready Verification Request
//!
//! [`VerifyRequest`] is the canonical output of the validation pipeline:
//! everything the verification engine needs, flattened into plain strings
//! and byte buffers so nothing downstream has to re-interpret CBOR. Built
//! fresh per verification call, never persisted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One attribute claim the proof covers, in wire order.
///
/// `cbor_value` is the verbatim CBOR encoding of the claimed value as it
/// appeared in the credential document. The proof is bound to these exact
/// bytes; re-encoding them would silently invalidate correct proofs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Namespace the claim lives under, e.g. `org.iso.18013.5.1`.
    pub namespace: String,
    /// Element identifier within the namespace, e.g. `age_over_18`.
    pub id: String,
    /// Original CBOR encoding of the claimed value, byte for byte.
    pub cbor_value: Vec<u8>,
}

/// A decoded claim as echoed back to API callers.
///
/// The element value is rendered to JSON for transport; the byte-exact
/// CBOR form the proof binds to travels separately in [`Attribute`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    #[serde(rename = "elementIdentifier")]
    pub element_identifier: String,
    #[serde(rename = "elementValue")]
    pub element_value: serde_json::Value,
}

/// The issuer-signed claims mapping: namespace to claims in that namespace.
///
/// A `BTreeMap` keeps the JSON rendering deterministic across runs.
pub type IssuerSigned = BTreeMap<String, Vec<Claim>>;

/// Canonical verification request consumed by the engine boundary.
///
/// By the time one of these exists, spec compatibility and issuer trust
/// have already been checked; the engine performs only the cryptographic
/// proof verification.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifyRequest {
    /// Proving-system identifier from the document.
    pub system: String,
    /// Circuit content identifier the proof was generated against.
    pub circuit_id: String,
    /// Issuer public key affine X coordinate, lowercase hex.
    pub pk_x: String,
    /// Issuer public key affine Y coordinate, lowercase hex.
    pub pk_y: String,
    /// Verification time, fixed-width UTC (`2025-01-01T00:00:00Z`).
    pub now: String,
    /// Document type, e.g. `org.iso.18013.5.1.mDL`.
    pub doc_type: String,
    /// Attribute triples in deterministic wire order.
    pub attributes: Vec<Attribute>,
    /// Session transcript supplied by the caller, verbatim.
    pub transcript: Vec<u8>,
    /// Decoded claims for echoing back to the caller.
    pub claims: IssuerSigned,
    /// The zero-knowledge proof, verbatim.
    pub proof: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_json_uses_camel_case_wire_names() {
        let claim = Claim {
            element_identifier: "age_over_18".to_string(),
            element_value: serde_json::json!(true),
        };
        let json = serde_json::to_value(&claim).unwrap();
        assert_eq!(json["elementIdentifier"], "age_over_18");
        assert_eq!(json["elementValue"], true);
    }

    #[test]
    fn issuer_signed_renders_namespaces_in_stable_order() {
        let mut claims = IssuerSigned::new();
        claims.insert("z.namespace".to_string(), vec![]);
        claims.insert("a.namespace".to_string(), vec![]);
        let json = serde_json::to_string(&claims).unwrap();
        let a = json.find("a.namespace").unwrap();
        let z = json.find("z.namespace").unwrap();
        assert!(a < z);
    }
}
