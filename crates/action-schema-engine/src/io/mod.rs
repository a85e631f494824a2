use crate::models::{ActionSchema, OBJECT_TYPE};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Invalid JSON. Please check your input. ({0})")]
    MalformedInput(#[from] serde_json::Error),
    #[error(
        "Invalid schema structure. Ensure it has a \"type\" of \"object\" and a \"properties\" object. ({0})"
    )]
    InvalidStructure(String),
}

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to import {path}: {source}")]
    Import { path: PathBuf, source: ImportError },
}

/// Parse serialized text into a schema.
///
/// The root must be an object whose `"type"` is `"object"` and whose
/// `"properties"` is an object of objects. Actions are then decoded field
/// by field; unknown keys, and known keys holding a value of another shape,
/// are kept as they are.
pub fn import_schema(text: &str) -> Result<ActionSchema, ImportError> {
    let value: Value = serde_json::from_str(text)?;
    check_structure(&value)?;
    serde_json::from_value(value).map_err(|e| ImportError::InvalidStructure(e.to_string()))
}

fn check_structure(value: &Value) -> Result<(), ImportError> {
    let Some(root) = value.as_object() else {
        return Err(ImportError::InvalidStructure(
            "root is not an object".to_string(),
        ));
    };
    if root.get("type").and_then(Value::as_str) != Some(OBJECT_TYPE) {
        return Err(ImportError::InvalidStructure(
            "missing \"type\": \"object\"".to_string(),
        ));
    }
    if !root.get("properties").is_some_and(Value::is_object) {
        return Err(ImportError::InvalidStructure(
            "missing \"properties\" object".to_string(),
        ));
    }
    Ok(())
}

/// Serialize a schema in its canonical form.
///
/// Two-space indentation, known keys first in a fixed order, everything
/// else in insertion order. Equal schemas always produce identical text.
pub fn export_schema(schema: &ActionSchema) -> String {
    // Every map in the tree is keyed by strings or unit enums, which
    // serde_json always accepts. Known keys held in `extra` are skipped on
    // the typed side, so no object gets a key twice.
    serde_json::to_string_pretty(schema).expect("action schema is always serializable")
}

/// Read and import a schema file
pub fn read_schema_file(path: &Path) -> Result<ActionSchema, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(IoError::Io)?;
    import_schema(&text).map_err(|source| IoError::Import {
        path: path.to_path_buf(),
        source,
    })
}

/// Export a schema to a file, creating parent directories as needed
pub fn write_schema_file(path: &Path, schema: &ActionSchema) -> Result<(), IoError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    let mut text = export_schema(schema);
    text.push('\n');
    fs::write(path, text).map_err(IoError::Io)
}
