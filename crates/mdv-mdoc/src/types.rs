//! Wire shapes for the ZK device response envelope.
//!
//! These mirror the CBOR structures a wallet sends alongside a proof. The
//! typed structs are convenient for field access, but they are deliberately
//! lossy for `elementValue`: the verification engine needs those bytes exactly
//! as they appeared on the wire, which is what [`crate::scan`] recovers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_bytes::ByteBuf;

/// COSE header label carrying an ordered X.509 certificate chain (RFC 9360).
pub const X5CHAIN_LABEL: i64 = 33;

/// Outer device-response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceResponse {
    pub version: String,
    /// Each entry is an embedded, independently decodable [`ZkDocument`].
    pub documents: Vec<ByteBuf>,
    pub status: i64,
}

/// One credential document inside the envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZkDocument {
    #[serde(rename = "docType")]
    pub doc_type: String,
    #[serde(rename = "zkSystem")]
    pub zk_system: ZkSystem,
    /// Namespace to signed items. Values here are re-parsed CBOR; the
    /// byte-exact originals come from the span scanner.
    #[serde(rename = "issuerSigned")]
    pub issuer_signed: BTreeMap<String, Vec<SignedItem>>,
    /// Integer-keyed COSE header map; [`X5CHAIN_LABEL`] holds the
    /// concatenated DER chain, leaf first.
    #[serde(rename = "issuerCertChain")]
    pub issuer_cert_chain: BTreeMap<i64, ByteBuf>,
    /// RFC 3339 UTC timestamp recorded by the wallet at proof time.
    pub timestamp: String,
    pub proof: ByteBuf,
}

/// Proof system identification and parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZkSystem {
    pub system: String,
    pub params: ZkParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZkParams {
    pub version: u32,
    #[serde(rename = "circuitHash")]
    pub circuit_hash: String,
    #[serde(rename = "numAttributes")]
    pub num_attributes: u32,
}

/// A single issuer-signed element as the typed decoder sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedItem {
    #[serde(rename = "elementIdentifier")]
    pub element_identifier: String,
    #[serde(rename = "elementValue")]
    pub element_value: serde_cbor::Value,
}
