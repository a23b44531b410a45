//! # mdv-core — Shared Contracts for the mdv Verifier
//!
//! Foundational types shared by the decoder, the engine boundary, and the
//! API layer: the supported-spec tuple, the engine-ready verification
//! request, the claims mapping echoed to callers, and the error taxonomy
//! every pipeline stage reports through.
//!
//! This crate is deliberately small and dependency-light so that both the
//! validation pipeline (`mdv-mdoc`) and the engine boundary (`mdv-engine`)
//! can depend on it without pulling in each other.

pub mod error;
pub mod request;
pub mod spec;

pub use error::VerifyError;
pub use request::{Attribute, Claim, IssuerSigned, VerifyRequest};
pub use spec::{ZkSpec, LONGFELLOW_V1, MAX_ATTRIBUTES, MIN_ATTRIBUTES, TIMESTAMP_LEN};
