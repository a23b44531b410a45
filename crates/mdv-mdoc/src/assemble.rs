//! Canonical verification request assembly.

use chrono::{DateTime, Utc};
use mdv_core::VerifyRequest;

use crate::claims;
use crate::decode::DecodedDocument;
use crate::trust::IssuerKey;

/// Builds the canonical engine request from the validated document parts.
///
/// Attribute order is the document's wire order, so assembling the same
/// envelope twice yields identical requests.
pub fn assemble(
    decoded: &DecodedDocument,
    issuer_key: &IssuerKey,
    transcript: Vec<u8>,
    now: DateTime<Utc>,
) -> VerifyRequest {
    VerifyRequest {
        system: decoded.doc.zk_system.system.clone(),
        circuit_id: decoded.doc.zk_system.params.circuit_hash.clone(),
        pk_x: issuer_key.x.clone(),
        pk_y: issuer_key.y.clone(),
        now: format_verification_time(now),
        doc_type: decoded.doc.doc_type.clone(),
        attributes: decoded.attributes.clone(),
        transcript,
        claims: claims::claims_from(&decoded.doc),
        proof: decoded.doc.proof.to_vec(),
    }
}

/// Formats the verification time the way the proof circuit consumes it:
/// second precision, UTC, trailing `Z`.
pub fn format_verification_time(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
