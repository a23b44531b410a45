//! Human-readable claim rendering.
//!
//! Claims returned to API callers are JSON derived from the typed decode of
//! `issuerSigned`. This rendering is informational only; the byte-exact
//! values sent to the verification engine come from [`crate::scan`].

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use mdv_core::{Claim, IssuerSigned};
use serde_cbor::Value as Cbor;
use serde_json::Value as Json;

use crate::types::ZkDocument;

pub(crate) fn claims_from(doc: &ZkDocument) -> IssuerSigned {
    doc.issuer_signed
        .iter()
        .map(|(namespace, items)| {
            let claims = items
                .iter()
                .map(|item| Claim {
                    element_identifier: item.element_identifier.clone(),
                    element_value: cbor_to_json(&item.element_value),
                })
                .collect();
            (namespace.clone(), claims)
        })
        .collect()
}

fn cbor_to_json(value: &Cbor) -> Json {
    match value {
        Cbor::Null => Json::Null,
        Cbor::Bool(b) => Json::Bool(*b),
        Cbor::Integer(i) => {
            if let Ok(i) = i64::try_from(*i) {
                Json::from(i)
            } else if let Ok(u) = u64::try_from(*i) {
                Json::from(u)
            } else {
                Json::String(i.to_string())
            }
        }
        Cbor::Float(f) => serde_json::Number::from_f64(*f)
            .map(Json::Number)
            .unwrap_or(Json::Null),
        Cbor::Bytes(b) => Json::String(BASE64.encode(b)),
        Cbor::Text(s) => Json::String(s.clone()),
        Cbor::Array(items) => Json::Array(items.iter().map(cbor_to_json).collect()),
        Cbor::Map(entries) => Json::Object(
            entries
                .iter()
                .map(|(k, v)| (map_key(k), cbor_to_json(v)))
                .collect(),
        ),
        Cbor::Tag(_, inner) => cbor_to_json(inner),
        _ => Json::Null,
    }
}

fn map_key(key: &Cbor) -> String {
    match key {
        Cbor::Text(s) => s.clone(),
        Cbor::Integer(i) => i.to_string(),
        other => cbor_to_json(other).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::testutil;

    #[test]
    fn renders_scalars_and_bytes() {
        let mut doc = testutil::sample_document(b"cert");
        let items = doc
            .issuer_signed
            .get_mut("org.iso.18013.5.1")
            .unwrap();
        items[0].element_value = Cbor::Bytes(vec![0xde, 0xad]);

        let claims = claims_from(&doc);
        let rendered = &claims["org.iso.18013.5.1"][0];
        assert_eq!(rendered.element_identifier, "age_over_18");
        assert_eq!(rendered.element_value, Json::String("3q0=".to_string()));
    }

    #[test]
    fn renders_tagged_and_nested_values() {
        let mut map = BTreeMap::new();
        map.insert(Cbor::Text("born".to_string()), Cbor::Integer(1990));
        let tagged = Cbor::Tag(0, Box::new(Cbor::Map(map)));

        assert_eq!(
            cbor_to_json(&tagged),
            serde_json::json!({ "born": 1990 })
        );
    }

    #[test]
    fn integer_map_keys_become_strings() {
        let mut map = BTreeMap::new();
        map.insert(Cbor::Integer(33), Cbor::Text("chain".to_string()));

        assert_eq!(cbor_to_json(&Cbor::Map(map)), serde_json::json!({ "33": "chain" }));
    }

    #[test]
    fn non_finite_floats_render_as_null() {
        assert_eq!(cbor_to_json(&Cbor::Float(f64::NAN)), Json::Null);
    }
}
