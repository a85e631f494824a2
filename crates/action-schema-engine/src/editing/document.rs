use crate::editing::commands::apply_command;
use crate::editing::{ActionField, Cmd, EditError, ExampleField, Patch};
use crate::io::{ImportError, export_schema, import_schema};
use crate::models::ActionSchema;

/// An editing session over one action schema.
///
/// The document owns the schema tree and a version counter. All changes go
/// through [`Document::apply`] (or [`Document::import`] for a wholesale
/// replacement), and a failed call never leaves a partial edit behind.
///
/// ```rust
/// # use action_schema_engine::editing::{ActionField, Document, ExampleField};
/// let mut doc = Document::new();
/// doc.add_action("greet").unwrap();
/// doc.update_action_field("greet", ActionField::Description("Greets the caller".into()))
///     .unwrap();
/// doc.add_example("greet").unwrap();
/// doc.update_example_field("greet", 0, ExampleField::UserSays("hello".into()))
///     .unwrap();
///
/// let text = doc.export();
/// let reloaded = Document::from_json(&text).unwrap();
/// assert_eq!(reloaded.schema(), doc.schema());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub(crate) schema: ActionSchema,
    /// Incremented on every change that touched the schema
    pub(crate) version: u64,
}

impl Document {
    /// An empty draft-07 document with no actions
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_schema(schema: ActionSchema) -> Self {
        Self { schema, version: 0 }
    }

    /// Create a document from serialized text
    pub fn from_json(text: &str) -> Result<Self, ImportError> {
        import_schema(text).map(Self::from_schema)
    }

    pub fn schema(&self) -> &ActionSchema {
        &self.schema
    }

    pub fn into_schema(self) -> ActionSchema {
        self.schema
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Apply a command to the document.
    ///
    /// A precondition failure is returned as an error and the document is
    /// left untouched. A command that is already satisfied (removing an
    /// absent action, renaming to the same name) returns a patch with no
    /// changed actions and does not bump the version.
    pub fn apply(&mut self, cmd: Cmd) -> Result<Patch, EditError> {
        let changed = apply_command(&mut self.schema, &cmd)?;

        if !changed.is_empty() {
            self.version += 1;
        }
        log::debug!("applied {cmd:?}, changed {changed:?}");

        Ok(Patch {
            changed,
            version: self.version,
        })
    }

    /// Apply a command, treating precondition failures as no-ops.
    ///
    /// This is the form-control behavior: a duplicate name or a stale index
    /// simply does nothing.
    pub fn apply_lenient(&mut self, cmd: Cmd) -> Patch {
        match self.apply(cmd) {
            Ok(patch) => patch,
            Err(e) => {
                log::debug!("ignored edit: {e}");
                Patch {
                    changed: Vec::new(),
                    version: self.version,
                }
            }
        }
    }

    /// Replace the whole schema with one parsed from `text`.
    ///
    /// On error the current schema is kept. The returned patch lists the
    /// actions of the imported schema.
    pub fn import(&mut self, text: &str) -> Result<Patch, ImportError> {
        let schema = match import_schema(text) {
            Ok(schema) => schema,
            Err(e) => {
                log::warn!("import rejected: {e}");
                return Err(e);
            }
        };
        log::info!("imported schema with {} actions", schema.len());

        let changed = schema.action_names().map(str::to_string).collect();
        self.schema = schema;
        self.version += 1;

        Ok(Patch {
            changed,
            version: self.version,
        })
    }

    /// Serialize the current schema; see [`export_schema`]
    pub fn export(&self) -> String {
        export_schema(&self.schema)
    }

    // Named forms of each command

    pub fn add_action(&mut self, name: impl Into<String>) -> Result<Patch, EditError> {
        self.apply(Cmd::AddAction { name: name.into() })
    }

    pub fn remove_action(&mut self, name: impl Into<String>) -> Result<Patch, EditError> {
        self.apply(Cmd::RemoveAction { name: name.into() })
    }

    pub fn rename_action(
        &mut self,
        old: impl Into<String>,
        new: impl Into<String>,
    ) -> Result<Patch, EditError> {
        self.apply(Cmd::RenameAction {
            old: old.into(),
            new: new.into(),
        })
    }

    pub fn update_action_field(
        &mut self,
        name: impl Into<String>,
        field: ActionField,
    ) -> Result<Patch, EditError> {
        self.apply(Cmd::UpdateActionField {
            name: name.into(),
            field,
        })
    }

    pub fn add_example(&mut self, name: impl Into<String>) -> Result<Patch, EditError> {
        self.apply(Cmd::AddExample { name: name.into() })
    }

    pub fn update_example_field(
        &mut self,
        name: impl Into<String>,
        index: usize,
        field: ExampleField,
    ) -> Result<Patch, EditError> {
        self.apply(Cmd::UpdateExampleField {
            name: name.into(),
            index,
            field,
        })
    }

    pub fn add_action_to_example(
        &mut self,
        name: impl Into<String>,
        index: usize,
        reference: impl Into<String>,
    ) -> Result<Patch, EditError> {
        self.apply(Cmd::AddActionToExample {
            name: name.into(),
            index,
            reference: reference.into(),
        })
    }

    pub fn remove_action_from_example(
        &mut self,
        name: impl Into<String>,
        index: usize,
        reference: impl Into<String>,
    ) -> Result<Patch, EditError> {
        self.apply(Cmd::RemoveActionFromExample {
            name: name.into(),
            index,
            reference: reference.into(),
        })
    }

    pub fn update_example_action_field(
        &mut self,
        name: impl Into<String>,
        index: usize,
        reference: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Patch, EditError> {
        self.apply(Cmd::UpdateExampleActionField {
            name: name.into(),
            index,
            reference: reference.into(),
            field: field.into(),
            value: value.into(),
        })
    }
}

impl ActionSchema {
    /// The schema that results from applying `cmd`, leaving `self` as is
    pub fn applied(&self, cmd: &Cmd) -> Result<ActionSchema, EditError> {
        let mut next = self.clone();
        apply_command(&mut next, cmd)?;
        Ok(next)
    }
}
