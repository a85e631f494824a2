/*!
 * # Editing Core Module
 *
 * All changes to an action schema flow through this module.
 *
 * ## Architecture Overview
 *
 * ### 1. Single Owner
 * - A [`Document`] owns the [`ActionSchema`](crate::models::ActionSchema) tree
 * - The presentation layer holds the document and calls into it synchronously
 * - There is no shared or background state
 *
 * ### 2. Command-Based Editing
 * - Every edit is a [`Cmd`] value applied with [`Document::apply`]
 * - Preconditions are checked before the first write, so a failed command
 *   leaves the document exactly as it was
 * - [`Document::apply_lenient`] gives the form-control behavior where a failed
 *   precondition is a silent no-op
 *
 * ### 3. Lossless Round-Trip
 * - Export is a deterministic pretty-print of the tree
 * - Key order of actions, examples and example fields is insertion order
 * - Unknown keys survive import/export untouched
 *
 * ## Module Structure
 *
 * - **`document`**: `Document` session type with version tracking
 * - **`commands`**: `Cmd` enum, field types and command application
 * - **`patch`**: Edit result metadata (touched actions, new version)
 * - **`error`**: Precondition failures reported by commands
 *
 * ## Known Behavior
 *
 * Removing or renaming an action does not touch examples that include it.
 * Such dangling references are kept verbatim; see
 * [`ActionSchema::dangling_references`](crate::models::ActionSchema::dangling_references).
 */

pub mod commands;
pub mod document;
pub mod error;
pub mod patch;

pub use commands::{ActionField, Cmd, ExampleField};
pub use document::Document;
pub use error::EditError;
pub use patch::Patch;
