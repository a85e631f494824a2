use action_schema_engine::{ActionField, Cmd, EditError, ExampleField, HttpMethod, Validator};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Edit an action schema document from the command line
#[derive(Debug, Parser)]
#[command(name = "action-schema", version, about)]
pub struct Cli {
    /// Schema file to edit (defaults to `schema_path` from the config file)
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Ignore rejected edits instead of failing
    #[arg(long, global = true)]
    pub lenient: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an empty schema file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,

        /// Store the file as `schema_path` in the config file
        #[arg(long)]
        remember: bool,
    },

    /// Summarize the actions in the schema
    Show,

    /// Print the schema in its serialized form
    Export,

    /// Replace the schema with the contents of another file
    Import {
        /// File holding the serialized schema
        source: PathBuf,
    },

    /// Add a new empty action
    AddAction { name: String },

    /// Remove an action (examples that include it are kept as they are)
    RemoveAction { name: String },

    /// Rename an action
    RenameAction { old: String, new: String },

    /// Overwrite one action field
    ///
    /// FIELD is one of _description, _action_type, _webhook_constants,
    /// _validators, _depends_on. Dependencies are comma-separated; webhook
    /// constants and validators are JSON.
    SetField {
        action: String,
        field: String,
        value: String,
    },

    /// Set the webhook URL of an action
    SetWebhookUrl { action: String, url: String },

    /// Set the webhook HTTP method of an action (GET or POST)
    SetWebhookMethod { action: String, method: HttpMethod },

    /// Switch a validator on or off (email, date, time, datetimeiso)
    SetValidator {
        action: String,
        validator: Validator,
        #[arg(value_enum)]
        state: Toggle,
    },

    /// Append an empty example to an action
    AddExample { action: String },

    /// Overwrite a field of an example ("user says" or any other key)
    SetExampleField {
        action: String,
        index: usize,
        field: String,
        value: String,
    },

    /// Include an action in an example, resetting its fields
    IncludeAction {
        action: String,
        index: usize,
        reference: String,
    },

    /// Drop an included action from an example
    ExcludeAction {
        action: String,
        index: usize,
        reference: String,
    },

    /// Set a field of an action included in an example
    SetExampleActionField {
        action: String,
        index: usize,
        reference: String,
        field: String,
        value: String,
    },
}

impl Command {
    /// The engine command for an edit, or `None` for commands that do not
    /// edit the schema
    pub fn edit(&self) -> Result<Option<Cmd>, EditError> {
        let cmd = match self {
            Command::Init { .. } | Command::Show | Command::Export | Command::Import { .. } => {
                return Ok(None);
            }
            Command::AddAction { name } => Cmd::AddAction { name: name.clone() },
            Command::RemoveAction { name } => Cmd::RemoveAction { name: name.clone() },
            Command::RenameAction { old, new } => Cmd::RenameAction {
                old: old.clone(),
                new: new.clone(),
            },
            Command::SetField {
                action,
                field,
                value,
            } => Cmd::UpdateActionField {
                name: action.clone(),
                field: ActionField::parse(field, value)?,
            },
            Command::SetWebhookUrl { action, url } => Cmd::SetWebhookUrl {
                name: action.clone(),
                url: url.clone(),
            },
            Command::SetWebhookMethod { action, method } => Cmd::SetWebhookMethod {
                name: action.clone(),
                method: *method,
            },
            Command::SetValidator {
                action,
                validator,
                state,
            } => Cmd::SetValidator {
                name: action.clone(),
                validator: *validator,
                enabled: *state == Toggle::On,
            },
            Command::AddExample { action } => Cmd::AddExample {
                name: action.clone(),
            },
            Command::SetExampleField {
                action,
                index,
                field,
                value,
            } => Cmd::UpdateExampleField {
                name: action.clone(),
                index: *index,
                field: ExampleField::parse(field, value)?,
            },
            Command::IncludeAction {
                action,
                index,
                reference,
            } => Cmd::AddActionToExample {
                name: action.clone(),
                index: *index,
                reference: reference.clone(),
            },
            Command::ExcludeAction {
                action,
                index,
                reference,
            } => Cmd::RemoveActionFromExample {
                name: action.clone(),
                index: *index,
                reference: reference.clone(),
            },
            Command::SetExampleActionField {
                action,
                index,
                reference,
                field,
                value,
            } => Cmd::UpdateExampleActionField {
                name: action.clone(),
                index: *index,
                reference: reference.clone(),
                field: field.clone(),
                value: value.clone(),
            },
        };
        Ok(Some(cmd))
    }
}
