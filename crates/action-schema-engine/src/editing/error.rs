/// A command's precondition did not hold; the document was left unchanged
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("Action name must not be empty")]
    EmptyName,
    #[error("Action already exists: {0}")]
    DuplicateAction(String),
    #[error("Action not found: {0}")]
    ActionNotFound(String),
    #[error("Example {index} not found in action {action}")]
    ExampleNotFound { action: String, index: usize },
    #[error("Example {index} of action {action} does not include {reference}")]
    ExampleActionNotFound {
        action: String,
        index: usize,
        reference: String,
    },
    #[error("Unknown field: {0}")]
    UnknownField(String),
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("{field} of action {action} holds a value the editor cannot change in place")]
    UneditableValue { action: String, field: String },
}
