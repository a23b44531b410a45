//! Device-response envelope decoding.

use mdv_core::{Attribute, VerifyError};

use crate::scan;
use crate::types::{DeviceResponse, ZkDocument};

/// A fully decoded credential document plus the byte-exact attribute values
/// the typed decoder cannot preserve.
#[derive(Debug, Clone)]
pub struct DecodedDocument {
    pub doc: ZkDocument,
    /// Issuer-signed elements in wire order, with `cbor_value` copied verbatim
    /// from the raw document bytes.
    pub attributes: Vec<Attribute>,
}

/// Decodes a device-response envelope.
///
/// Every entry in `documents` must decode; one malformed document fails the
/// whole request. Verification then covers the first document only, so the
/// first decode result is what comes back.
pub fn decode_device_response(bytes: &[u8]) -> Result<DecodedDocument, VerifyError> {
    let envelope: DeviceResponse = serde_cbor::from_slice(bytes)
        .map_err(|e| VerifyError::Decode(format!("device response: {e}")))?;

    if envelope.documents.is_empty() {
        return Err(VerifyError::Decode(
            "device response carries no documents".to_string(),
        ));
    }
    if envelope.documents.len() > 1 {
        tracing::debug!(
            extra = envelope.documents.len() - 1,
            "device response carries additional documents, verifying the first"
        );
    }

    let mut decoded = envelope
        .documents
        .iter()
        .enumerate()
        .map(|(index, doc)| {
            decode_document(doc).map_err(|e| match e {
                VerifyError::Decode(msg) => {
                    VerifyError::Decode(format!("document {index}: {msg}"))
                }
                other => other,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(decoded.swap_remove(0))
}

/// Decodes one embedded credential document. The timestamp must parse as
/// RFC 3339, though no freshness window is enforced here.
fn decode_document(doc_bytes: &[u8]) -> Result<DecodedDocument, VerifyError> {
    let doc: ZkDocument = serde_cbor::from_slice(doc_bytes)
        .map_err(|e| VerifyError::Decode(format!("credential document: {e}")))?;

    chrono::DateTime::parse_from_rfc3339(&doc.timestamp)
        .map_err(|e| VerifyError::Decode(format!("document timestamp: {e}")))?;

    let spans = scan::issuer_signed_spans(doc_bytes)?;
    let typed_count: usize = doc.issuer_signed.values().map(Vec::len).sum();
    if spans.len() != typed_count {
        // Both parsers read the same bytes; a disagreement means the document
        // exploited a difference between them.
        return Err(VerifyError::Decode(format!(
            "issuerSigned parse disagreement: {} typed items, {} scanned spans",
            typed_count,
            spans.len()
        )));
    }

    let attributes = spans
        .into_iter()
        .map(|span| Attribute {
            namespace: span.namespace,
            id: span.id,
            cbor_value: doc_bytes[span.value].to_vec(),
        })
        .collect();

    Ok(DecodedDocument { doc, attributes })
}

#[cfg(test)]
mod tests {
    use serde_bytes::ByteBuf;

    use super::*;
    use crate::testutil;

    #[test]
    fn decodes_envelope_and_first_document() {
        let doc = testutil::sample_document(b"not a real cert");
        let envelope = testutil::encode_envelope(&doc);

        let decoded = decode_device_response(&envelope).unwrap();
        assert_eq!(decoded.doc.doc_type, "org.iso.18013.5.1.mDL");
        assert_eq!(decoded.attributes.len(), 1);
        assert_eq!(decoded.attributes[0].id, "age_over_18");
        assert_eq!(
            decoded.attributes[0].cbor_value,
            serde_cbor::to_vec(&serde_cbor::Value::Bool(true)).unwrap()
        );
    }

    #[test]
    fn malformed_trailing_document_fails_the_request() {
        let good = testutil::sample_document(b"cert");
        let mut bad = testutil::sample_document(b"cert");
        bad.timestamp = "not a timestamp".to_string();

        let envelope = DeviceResponse {
            version: "1.0".to_string(),
            documents: vec![
                ByteBuf::from(serde_cbor::to_vec(&good).unwrap()),
                ByteBuf::from(serde_cbor::to_vec(&bad).unwrap()),
            ],
            status: 0,
        };
        let bytes = serde_cbor::to_vec(&envelope).unwrap();

        // No partial success: a bad document anywhere fails the decode.
        let err = decode_device_response(&bytes).unwrap_err();
        assert!(matches!(err, VerifyError::Decode(_)));
        assert!(err.to_string().contains("document 1"), "{err}");
    }

    #[test]
    fn first_of_several_valid_documents_is_returned() {
        let first = testutil::sample_document(b"cert");
        let mut second = testutil::sample_document(b"cert");
        second.doc_type = "org.example.other".to_string();

        let envelope = DeviceResponse {
            version: "1.0".to_string(),
            documents: vec![
                ByteBuf::from(serde_cbor::to_vec(&first).unwrap()),
                ByteBuf::from(serde_cbor::to_vec(&second).unwrap()),
            ],
            status: 0,
        };
        let bytes = serde_cbor::to_vec(&envelope).unwrap();

        let decoded = decode_device_response(&bytes).unwrap();
        assert_eq!(decoded.doc.doc_type, "org.iso.18013.5.1.mDL");
    }

    #[test]
    fn empty_documents_is_a_decode_error() {
        let envelope = DeviceResponse {
            version: "1.0".to_string(),
            documents: Vec::new(),
            status: 0,
        };
        let bytes = serde_cbor::to_vec(&envelope).unwrap();

        let err = decode_device_response(&bytes).unwrap_err();
        assert!(matches!(err, VerifyError::Decode(_)));
        assert!(err.to_string().contains("no documents"), "{err}");
    }

    #[test]
    fn garbage_bytes_are_a_decode_error() {
        let err = decode_device_response(b"\xff\x00garbage").unwrap_err();
        assert!(matches!(err, VerifyError::Decode(_)));
    }

    #[test]
    fn malformed_timestamp_is_rejected() {
        let mut doc = testutil::sample_document(b"cert");
        doc.timestamp = "2025-13-45T99:00:00Z".to_string();
        let envelope = testutil::encode_envelope(&doc);

        let err = decode_device_response(&envelope).unwrap_err();
        assert!(err.to_string().contains("timestamp"), "{err}");
    }
}
