//! Shared application state.

use std::sync::Arc;

use mdv_engine::{CircuitRegistry, VerifierEngine};
use mdv_mdoc::TrustedRoots;

/// Everything a request handler needs, built once at startup. All three
/// members are immutable after construction, so handlers share them without
/// locking.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn VerifierEngine>,
    pub circuits: Arc<CircuitRegistry>,
    pub roots: Arc<TrustedRoots>,
}

impl AppState {
    pub fn new(
        engine: Arc<dyn VerifierEngine>,
        circuits: Arc<CircuitRegistry>,
        roots: Arc<TrustedRoots>,
    ) -> Self {
        AppState {
            engine,
            circuits,
            roots,
        }
    }
}
