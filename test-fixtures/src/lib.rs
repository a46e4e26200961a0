//! Test fixture loader for the clinical scenarios shared across crates.
//!
//! Fixtures are plain JSON under `test-fixtures/clinical/`, deserialized
//! straight into the `oracle-core` model types.

use std::path::PathBuf;

use oracle_core::models::{CandidateTreatment, ClinicalQuery, ReviewerPosition, UncertaintyModel};
use serde::de::DeserializeOwned;

/// Root directory of the test-fixtures folder.
fn fixtures_root() -> PathBuf {
    // Works from any crate in the workspace: walk up to find test-fixtures.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    while !path.join("test-fixtures").exists() {
        if !path.pop() {
            panic!(
                "Could not find test-fixtures directory from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
    path.join("test-fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Check that a fixture file exists.
pub fn fixture_exists(relative_path: &str) -> bool {
    fixtures_root().join(relative_path).exists()
}

/// List all JSON files in a fixture subdirectory, sorted by name.
pub fn list_fixtures(subdir: &str) -> Vec<PathBuf> {
    let dir = fixtures_root().join(subdir);
    if !dir.exists() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("Failed to read directory {}: {}", dir.display(), e))
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            path.extension().is_some_and(|ext| ext == "json").then_some(path)
        })
        .collect();
    files.sort();
    files
}

/// `clinical/queries/{name}.json`
pub fn query(name: &str) -> ClinicalQuery {
    load_fixture(&format!("clinical/queries/{name}.json"))
}

/// `clinical/candidates/{name}.json`
pub fn candidates(name: &str) -> Vec<CandidateTreatment> {
    load_fixture(&format!("clinical/candidates/{name}.json"))
}

/// `clinical/models/{name}.json`
pub fn model(name: &str) -> UncertaintyModel {
    load_fixture(&format!("clinical/models/{name}.json"))
}

/// `clinical/consensus/{name}.json`
pub fn positions(name: &str) -> Vec<ReviewerPosition> {
    load_fixture(&format!("clinical/consensus/{name}.json"))
}
