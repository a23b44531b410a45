//! Spec compatibility validation.
//!
//! A document is only verifiable if the engine build hosting this service
//! supports the exact proof-system parameters the wallet used. Compatibility
//! is an exact match on the whole (system, circuitHash, version,
//! numAttributes) tuple; there is no version negotiation.

use mdv_core::{VerifyError, ZkSpec, LONGFELLOW_V1, MAX_ATTRIBUTES, MIN_ATTRIBUTES};

use crate::types::ZkDocument;

/// Checks a decoded document against the supported spec list. `found` is the
/// number of issuer-signed elements actually present in the document.
pub fn validate_spec(doc: &ZkDocument, specs: &[ZkSpec], found: usize) -> Result<(), VerifyError> {
    let system = &doc.zk_system.system;
    if system != LONGFELLOW_V1 {
        return Err(VerifyError::SpecMismatch {
            field: "system",
            expected: LONGFELLOW_V1.to_string(),
            actual: system.clone(),
        });
    }

    let params = &doc.zk_system.params;
    if !(MIN_ATTRIBUTES..=MAX_ATTRIBUTES).contains(&params.num_attributes) {
        return Err(VerifyError::SpecMismatch {
            field: "numAttributes",
            expected: format!("{MIN_ATTRIBUTES}..={MAX_ATTRIBUTES}"),
            actual: params.num_attributes.to_string(),
        });
    }

    if params.num_attributes as usize != found {
        return Err(VerifyError::AttributeCount {
            declared: params.num_attributes,
            found,
        });
    }

    let supported = specs.iter().any(|spec| {
        spec.matches(
            system,
            &params.circuit_hash,
            params.num_attributes,
            params.version,
        )
    });
    if !supported {
        return Err(VerifyError::SpecMismatch {
            field: "params",
            expected: "a supported (circuitHash, version, numAttributes) tuple".to_string(),
            actual: format!(
                "circuitHash={} version={} numAttributes={}",
                params.circuit_hash, params.version, params.num_attributes
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;

    fn doc_and_spec() -> (ZkDocument, ZkSpec) {
        (testutil::sample_document(b"cert"), testutil::sample_spec())
    }

    #[test]
    fn accepts_exact_tuple_match() {
        let (doc, spec) = doc_and_spec();
        assert!(validate_spec(&doc, &[spec], 1).is_ok());
    }

    #[test]
    fn rejects_unknown_system() {
        let (mut doc, spec) = doc_and_spec();
        doc.zk_system.system = "some-other-zk-system".to_string();

        let err = validate_spec(&doc, &[spec], 1).unwrap_err();
        assert!(matches!(err, VerifyError::SpecMismatch { field: "system", .. }));
    }

    #[test]
    fn rejects_version_mismatch() {
        let (mut doc, spec) = doc_and_spec();
        doc.zk_system.params.version += 1;

        let err = validate_spec(&doc, &[spec], 1).unwrap_err();
        assert!(matches!(err, VerifyError::SpecMismatch { field: "params", .. }));
    }

    #[test]
    fn rejects_unknown_circuit_hash() {
        let (mut doc, spec) = doc_and_spec();
        doc.zk_system.params.circuit_hash = "ff".repeat(32);

        let err = validate_spec(&doc, &[spec], 1).unwrap_err();
        assert!(matches!(err, VerifyError::SpecMismatch { field: "params", .. }));
    }

    #[test]
    fn rejects_attribute_count_out_of_bounds() {
        let (mut doc, spec) = doc_and_spec();
        doc.zk_system.params.num_attributes = 0;
        let err = validate_spec(&doc, std::slice::from_ref(&spec), 0).unwrap_err();
        assert!(matches!(err, VerifyError::SpecMismatch { field: "numAttributes", .. }));

        doc.zk_system.params.num_attributes = 5;
        let err = validate_spec(&doc, &[spec], 5).unwrap_err();
        assert!(matches!(err, VerifyError::SpecMismatch { field: "numAttributes", .. }));
    }

    #[test]
    fn rejects_declared_count_disagreeing_with_document() {
        let (mut doc, mut spec) = doc_and_spec();
        doc.zk_system.params.num_attributes = 2;
        spec.num_attributes = 2;

        let err = validate_spec(&doc, &[spec], 1).unwrap_err();
        assert!(matches!(
            err,
            VerifyError::AttributeCount { declared: 2, found: 1 }
        ));
    }

    #[test]
    fn empty_spec_list_rejects_everything() {
        let (doc, _) = doc_and_spec();
        assert!(validate_spec(&doc, &[], 1).is_err());
    }
}
