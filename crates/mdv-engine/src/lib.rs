//! # mdv-engine — Verification Engine Boundary
//!
//! The seam between the validation pipeline and whatever actually checks
//! proofs: the [`VerifierEngine`] trait, the startup-time [`CircuitRegistry`],
//! and (behind the default `mock` feature) a deterministic in-process engine
//! for development and tests.

#[cfg(feature = "mock")]
pub mod mock;
pub mod registry;
pub mod traits;

#[cfg(feature = "mock")]
pub use mock::MockEngine;
pub use registry::{Circuit, CircuitLoadError, CircuitRegistry};
pub use traits::VerifierEngine;
