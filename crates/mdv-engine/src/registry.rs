//! Circuit registry.
//!
//! Circuits are opaque blobs loaded from a directory at startup. A file is
//! admitted only when the engine's content identifier for its bytes equals
//! its file name, so a renamed or corrupted file can never be served under
//! the wrong identifier. Bad files are logged and skipped; an unreadable
//! directory is a startup failure.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::traits::VerifierEngine;

/// One admitted circuit.
#[derive(Debug, Clone)]
pub struct Circuit {
    /// Engine content identifier, equal to the source file name.
    pub id: String,
    pub bytes: Vec<u8>,
    /// Attribute count from the spec referencing this circuit, 0 when no
    /// spec references it.
    pub num_attributes: u32,
}

/// Startup failure loading the circuit directory.
#[derive(Debug, Error)]
#[error("cannot read circuit directory {path}: {source}")]
pub struct CircuitLoadError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Immutable id-to-circuit map built once at startup.
#[derive(Debug)]
pub struct CircuitRegistry {
    circuits: HashMap<String, Circuit>,
}

impl CircuitRegistry {
    /// Walks `dir` recursively and admits every verifiable circuit file.
    /// README files are documentation and are skipped by name.
    pub fn load(dir: &Path, engine: &dyn VerifierEngine) -> Result<Self, CircuitLoadError> {
        let specs = engine.supported_specs();
        let mut circuits = HashMap::new();
        load_dir(dir, engine, &specs, &mut circuits)?;
        Ok(CircuitRegistry { circuits })
    }

    pub fn lookup(&self, id: &str) -> Option<&Circuit> {
        self.circuits.get(id)
    }

    pub fn len(&self) -> usize {
        self.circuits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.circuits.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.circuits.keys().map(String::as_str)
    }
}

fn load_dir(
    dir: &Path,
    engine: &dyn VerifierEngine,
    specs: &[mdv_core::ZkSpec],
    circuits: &mut HashMap<String, Circuit>,
) -> Result<(), CircuitLoadError> {
    let entries = fs::read_dir(dir).map_err(|source| CircuitLoadError {
        path: dir.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| CircuitLoadError {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            load_dir(&path, engine, specs, circuits)?;
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.contains("README") {
            continue;
        }
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "skipping unreadable circuit file");
                continue;
            }
        };
        match engine.circuit_id(&bytes) {
            Ok(id) if id == name => {
                let num_attributes = specs
                    .iter()
                    .find(|spec| spec.circuit_hash == id)
                    .map(|spec| spec.num_attributes)
                    .unwrap_or(0);
                if num_attributes == 0 {
                    tracing::warn!(circuit = %id, "loaded circuit is not referenced by any supported spec");
                }
                tracing::info!(circuit = %id, size = bytes.len(), "loaded circuit");
                circuits.insert(id.clone(), Circuit { id, bytes, num_attributes });
            }
            Ok(id) => {
                tracing::warn!(
                    file = %path.display(),
                    computed = %id,
                    "skipping circuit file: content identifier does not match file name"
                );
            }
            Err(e) => {
                tracing::warn!(
                    file = %path.display(),
                    error = %e,
                    "skipping circuit file: identifier computation failed"
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::mock::MockEngine;

    fn write_circuit(dir: &Path, engine: &MockEngine, bytes: &[u8]) -> String {
        let id = engine.circuit_id(bytes).unwrap();
        fs::write(dir.join(&id), bytes).unwrap();
        id
    }

    #[test]
    fn admits_circuits_whose_id_matches_file_name() {
        let engine = MockEngine::new();
        let dir = tempfile::tempdir().unwrap();
        let a = write_circuit(dir.path(), &engine, b"circuit a");
        let b = write_circuit(dir.path(), &engine, b"circuit b");

        let registry = CircuitRegistry::load(dir.path(), &engine).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup(&a).unwrap().bytes, b"circuit a");
        assert!(registry.lookup(&b).is_some());
    }

    #[test]
    fn skips_files_with_mismatched_names() {
        let engine = MockEngine::new();
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("not-the-right-name"), b"circuit").unwrap();

        let registry = CircuitRegistry::load(dir.path(), &engine).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn skips_readme_files() {
        let engine = MockEngine::new();
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("README.md"), b"docs, not a circuit").unwrap();
        write_circuit(dir.path(), &engine, b"real circuit");

        let registry = CircuitRegistry::load(dir.path(), &engine).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn recurses_into_subdirectories() {
        let engine = MockEngine::new();
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("v2");
        fs::create_dir(&sub).unwrap();
        let id = write_circuit(&sub, &engine, b"nested circuit");

        let registry = CircuitRegistry::load(dir.path(), &engine).unwrap();
        assert!(registry.lookup(&id).is_some());
    }

    #[test]
    fn missing_directory_is_a_load_error() {
        let engine = MockEngine::new();
        let err = CircuitRegistry::load(Path::new("/nonexistent/circuits"), &engine).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/circuits"));
    }

    #[test]
    fn lookup_miss_returns_none() {
        let engine = MockEngine::new();
        let dir = tempfile::tempdir().unwrap();
        let registry = CircuitRegistry::load(dir.path(), &engine).unwrap();
        assert!(registry.lookup("unknown").is_none());
    }
}
