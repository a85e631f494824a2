use crate::models::{Action, ActionSchema};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory for schema files
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a test file with content
pub fn create_test_file(dir: &TempDir, filename: &str, content: &str) -> PathBuf {
    let file_path = dir.path().join(filename);
    fs::write(&file_path, content).unwrap();
    file_path
}

/// A schema holding default actions under the given names, in order
pub fn schema_with_actions(names: &[&str]) -> ActionSchema {
    let mut schema = ActionSchema::new();
    for name in names {
        schema.properties.insert(name.to_string(), Action::new());
    }
    schema
}
