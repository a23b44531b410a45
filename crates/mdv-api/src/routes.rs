//! Request handlers and wire types.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use mdv_core::{IssuerSigned, VerifyError, ZkSpec};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

/// `POST /zkverify` request body. Both payloads travel base64-encoded.
#[derive(Debug, Deserialize)]
pub struct ZkVerifyRequest {
    #[serde(rename = "Transcript", with = "base64_bytes")]
    pub transcript: Vec<u8>,
    #[serde(rename = "ZKDeviceResponseCBOR", with = "base64_bytes")]
    pub device_response: Vec<u8>,
}

/// `POST /zkverify` response body.
#[derive(Debug, Serialize)]
pub struct ZkVerifyResponse {
    #[serde(rename = "Status")]
    pub status: bool,
    #[serde(rename = "Claims", skip_serializing_if = "IssuerSigned::is_empty")]
    pub claims: IssuerSigned,
    /// Set only on a negative verdict.
    #[serde(rename = "Message", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `GET /specs`: the spec tuples this verifier build accepts.
pub async fn specs(State(state): State<AppState>) -> Json<Vec<ZkSpec>> {
    Json(state.engine.supported_specs())
}

/// `POST /zkverify`: validate the envelope, then verify the proof.
///
/// Pipeline failures are 400s. A completed negative verdict is a 200 with
/// `Status: false`, because the service worked; the proof did not.
pub async fn zkverify(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ZkVerifyResponse>, ApiError> {
    let request: ZkVerifyRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("error reading request body: {e}")))?;

    let specs = state.engine.supported_specs();
    let verify_request = mdv_mdoc::build_request(
        &request.device_response,
        &specs,
        &state.roots,
        request.transcript,
        Utc::now(),
    )
    .map_err(|e| ApiError::BadRequest(format!("error processing device response: {e}")))?;

    let circuit = state
        .circuits
        .lookup(&verify_request.circuit_id)
        .cloned()
        .ok_or_else(|| {
            // The spec table admitted this hash, so the registry should
            // hold it; a miss means the deployment is misconfigured.
            ApiError::Internal(format!(
                "no circuit loaded for supported spec {}",
                verify_request.circuit_id
            ))
        })?;

    let claims = verify_request.claims.clone();
    let engine = state.engine.clone();
    let verdict = tokio::task::spawn_blocking(move || engine.verify_proof(&circuit, &verify_request))
        .await
        .map_err(|e| ApiError::Internal(format!("verification task failed: {e}")))?;

    match verdict {
        Ok(()) => {
            tracing::info!("proof verified");
            Ok(Json(ZkVerifyResponse {
                status: true,
                claims,
                message: None,
            }))
        }
        Err(VerifyError::Engine(detail)) => Err(ApiError::Internal(detail)),
        Err(e) => {
            tracing::info!(reason = %e, "proof rejected");
            Ok(Json(ZkVerifyResponse {
                status: false,
                claims,
                message: Some(e.to_string()),
            }))
        }
    }
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}
