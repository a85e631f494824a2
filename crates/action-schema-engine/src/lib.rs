pub mod editing;
pub mod io;
pub mod models;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use editing::{ActionField, Cmd, Document, EditError, ExampleField, Patch};
pub use io::*;
pub use models::*;
