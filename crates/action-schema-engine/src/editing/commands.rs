use indexmap::IndexMap;
use serde_json::Value;

use crate::editing::EditError;
use crate::models::{
    Action, ActionSchema, ActionType, Example, ExampleActionFields, HttpMethod, RawFields,
    Validator, WebhookConstants, depends_on_from_csv,
};

/// Commands that can be applied to the document
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    AddAction {
        name: String,
    },
    RemoveAction {
        name: String,
    },
    RenameAction {
        old: String,
        new: String,
    },
    UpdateActionField {
        name: String,
        field: ActionField,
    },
    SetWebhookUrl {
        name: String,
        url: String,
    },
    SetWebhookMethod {
        name: String,
        method: HttpMethod,
    },
    SetValidator {
        name: String,
        validator: Validator,
        enabled: bool,
    },
    AddExample {
        name: String,
    },
    UpdateExampleField {
        name: String,
        index: usize,
        field: ExampleField,
    },
    AddActionToExample {
        name: String,
        index: usize,
        reference: String,
    },
    RemoveActionFromExample {
        name: String,
        index: usize,
        reference: String,
    },
    UpdateExampleActionField {
        name: String,
        index: usize,
        reference: String,
        field: String,
        value: String,
    },
}

/// One overwritable field of an action
#[derive(Debug, Clone, PartialEq)]
pub enum ActionField {
    Description(String),
    ActionType(Option<ActionType>),
    WebhookConstants(Option<WebhookConstants>),
    Validators(IndexMap<Validator, bool>),
    DependsOn(Vec<String>),
}

impl ActionField {
    pub const WIRE_NAMES: [&'static str; 5] = [
        Action::DESCRIPTION,
        Action::ACTION_TYPE,
        Action::WEBHOOK_CONSTANTS,
        Action::VALIDATORS,
        Action::DEPENDS_ON,
    ];

    /// Build a field from its serialized key and the text of its edit control.
    ///
    /// Action type takes an enum name (empty clears it), dependencies take a
    /// comma-separated list, webhook constants and validators take JSON.
    pub fn parse(wire_name: &str, text: &str) -> Result<Self, EditError> {
        let invalid = |reason: String| EditError::InvalidValue {
            field: wire_name.to_string(),
            reason,
        };

        match wire_name {
            Action::DESCRIPTION => Ok(ActionField::Description(text.to_string())),
            Action::ACTION_TYPE => {
                let text = text.trim();
                if text.is_empty() {
                    Ok(ActionField::ActionType(None))
                } else {
                    text.parse()
                        .map(|t| ActionField::ActionType(Some(t)))
                        .map_err(invalid)
                }
            }
            Action::WEBHOOK_CONSTANTS => {
                if text.trim().is_empty() {
                    Ok(ActionField::WebhookConstants(None))
                } else {
                    serde_json::from_str(text)
                        .map(|wc| ActionField::WebhookConstants(Some(wc)))
                        .map_err(|e| invalid(e.to_string()))
                }
            }
            Action::VALIDATORS => serde_json::from_str(text)
                .map(ActionField::Validators)
                .map_err(|e| invalid(e.to_string())),
            Action::DEPENDS_ON => Ok(ActionField::DependsOn(depends_on_from_csv(text))),
            other => Err(EditError::UnknownField(other.to_string())),
        }
    }

    pub fn wire_name(&self) -> &'static str {
        match self {
            ActionField::Description(_) => Action::DESCRIPTION,
            ActionField::ActionType(_) => Action::ACTION_TYPE,
            ActionField::WebhookConstants(_) => Action::WEBHOOK_CONSTANTS,
            ActionField::Validators(_) => Action::VALIDATORS,
            ActionField::DependsOn(_) => Action::DEPENDS_ON,
        }
    }

    /// Overwrite the field, replacing any verbatim value kept for its key
    fn write_to(&self, action: &mut Action) {
        action.extra.shift_remove(self.wire_name());
        match self {
            ActionField::Description(text) => action.description = text.clone(),
            ActionField::ActionType(t) => action.action_type = *t,
            ActionField::WebhookConstants(wc) => action.webhook_constants = wc.clone(),
            ActionField::Validators(v) => action.validators = Some(v.clone()),
            ActionField::DependsOn(paths) => action.depends_on = Some(paths.clone()),
        }
    }
}

/// One scalar field of an example
#[derive(Debug, Clone, PartialEq)]
pub enum ExampleField {
    UserSays(String),
    /// Any other example key, stored as a string
    Other { key: String, value: String },
}

impl ExampleField {
    pub const USER_SAYS: &'static str = Example::USER_SAYS;

    pub fn parse(key: &str, value: &str) -> Result<Self, EditError> {
        match key {
            Example::USER_SAYS => Ok(ExampleField::UserSays(value.to_string())),
            // Not a scalar; edited through the include commands
            Example::INCLUDES => Err(EditError::UnknownField(key.to_string())),
            "" => Err(EditError::UnknownField(String::new())),
            other => Ok(ExampleField::Other {
                key: other.to_string(),
                value: value.to_string(),
            }),
        }
    }

    /// Write the field, checking `Other` keys the way [`ExampleField::parse`]
    /// does. `Other { key: "user says" }` sets the utterance.
    fn write_to(&self, example: &mut Example) -> Result<(), EditError> {
        let field = match self {
            ExampleField::UserSays(_) => self.clone(),
            ExampleField::Other { key, value } => Self::parse(key, value)?,
        };
        match field {
            ExampleField::UserSays(text) => {
                example.extra.shift_remove(Example::USER_SAYS);
                example.user_says = text;
            }
            ExampleField::Other { key, value } => {
                example.extra.insert(key, Value::String(value));
            }
        }
        Ok(())
    }
}

/// Apply a command to the schema, returning the names of touched actions.
///
/// Every precondition is checked before the first write, so an `Err`
/// leaves the schema exactly as it was.
pub(crate) fn apply_command(
    schema: &mut ActionSchema,
    cmd: &Cmd,
) -> Result<Vec<String>, EditError> {
    match cmd {
        Cmd::AddAction { name } => {
            if name.is_empty() {
                return Err(EditError::EmptyName);
            }
            if schema.contains(name) {
                return Err(EditError::DuplicateAction(name.clone()));
            }
            schema.properties.insert(name.clone(), Action::new());
            Ok(vec![name.clone()])
        }
        Cmd::RemoveAction { name } => {
            // Example references to the removed action are kept
            match schema.properties.shift_remove(name) {
                Some(_) => Ok(vec![name.clone()]),
                None => Ok(Vec::new()),
            }
        }
        Cmd::RenameAction { old, new } => {
            if new.is_empty() {
                return Err(EditError::EmptyName);
            }
            if old == new {
                return Ok(Vec::new());
            }
            if schema.contains(new) {
                return Err(EditError::DuplicateAction(new.clone()));
            }
            let Some((index, _, action)) = schema.properties.shift_remove_full(old) else {
                return Err(EditError::ActionNotFound(old.clone()));
            };
            schema.properties.shift_insert(index, new.clone(), action);
            Ok(vec![old.clone(), new.clone()])
        }
        Cmd::UpdateActionField { name, field } => {
            field.write_to(action_mut(schema, name)?);
            Ok(vec![name.clone()])
        }
        Cmd::SetWebhookUrl { name, url } => {
            let action = action_mut(schema, name)?;
            ensure_editable(&action.extra, name, Action::WEBHOOK_CONSTANTS)?;
            action
                .webhook_constants
                .get_or_insert_with(WebhookConstants::default)
                .url = Some(url.clone());
            Ok(vec![name.clone()])
        }
        Cmd::SetWebhookMethod { name, method } => {
            let action = action_mut(schema, name)?;
            ensure_editable(&action.extra, name, Action::WEBHOOK_CONSTANTS)?;
            action
                .webhook_constants
                .get_or_insert_with(WebhookConstants::default)
                .method = Some(*method);
            Ok(vec![name.clone()])
        }
        Cmd::SetValidator {
            name,
            validator,
            enabled,
        } => {
            let action = action_mut(schema, name)?;
            ensure_editable(&action.extra, name, Action::VALIDATORS)?;
            action
                .validators
                .get_or_insert_with(IndexMap::new)
                .insert(*validator, *enabled);
            Ok(vec![name.clone()])
        }
        Cmd::AddExample { name } => {
            let action = action_mut(schema, name)?;
            ensure_editable(&action.extra, name, Action::EXAMPLES)?;
            action
                .examples
                .get_or_insert_with(Vec::new)
                .push(Example::new());
            Ok(vec![name.clone()])
        }
        Cmd::UpdateExampleField { name, index, field } => {
            field.write_to(example_mut(schema, name, *index)?)?;
            Ok(vec![name.clone()])
        }
        Cmd::AddActionToExample {
            name,
            index,
            reference,
        } => {
            let example = example_mut(schema, name, *index)?;
            ensure_editable(&example.extra, name, Example::INCLUDES)?;
            // Re-adding an included action resets its fields
            example
                .assistant_action_includes
                .insert(reference.clone(), ExampleActionFields::new());
            Ok(vec![name.clone()])
        }
        Cmd::RemoveActionFromExample {
            name,
            index,
            reference,
        } => {
            let example = example_mut(schema, name, *index)?;
            ensure_editable(&example.extra, name, Example::INCLUDES)?;
            match example.assistant_action_includes.shift_remove(reference) {
                Some(_) => Ok(vec![name.clone()]),
                None => Ok(Vec::new()),
            }
        }
        Cmd::UpdateExampleActionField {
            name,
            index,
            reference,
            field,
            value,
        } => {
            let example = example_mut(schema, name, *index)?;
            ensure_editable(&example.extra, name, Example::INCLUDES)?;
            let Some(fields) = example.assistant_action_includes.get_mut(reference) else {
                return Err(EditError::ExampleActionNotFound {
                    action: name.clone(),
                    index: *index,
                    reference: reference.clone(),
                });
            };
            fields.insert(field.clone(), value.clone());
            Ok(vec![name.clone()])
        }
    }
}

/// Merging into a field needs its typed value; a kept verbatim value
/// can only be overwritten as a whole.
fn ensure_editable(extra: &RawFields, action: &str, key: &str) -> Result<(), EditError> {
    if extra.contains_key(key) {
        return Err(EditError::UneditableValue {
            action: action.to_string(),
            field: key.to_string(),
        });
    }
    Ok(())
}

fn action_mut<'a>(schema: &'a mut ActionSchema, name: &str) -> Result<&'a mut Action, EditError> {
    schema
        .properties
        .get_mut(name)
        .ok_or_else(|| EditError::ActionNotFound(name.to_string()))
}

fn example_mut<'a>(
    schema: &'a mut ActionSchema,
    name: &str,
    index: usize,
) -> Result<&'a mut Example, EditError> {
    action_mut(schema, name)?
        .examples
        .as_mut()
        .and_then(|examples| examples.get_mut(index))
        .ok_or_else(|| EditError::ExampleNotFound {
            action: name.to_string(),
            index,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::schema_with_actions;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn apply(schema: &mut ActionSchema, cmd: Cmd) -> Result<Vec<String>, EditError> {
        apply_command(schema, &cmd)
    }

    fn names(schema: &ActionSchema) -> Vec<&str> {
        schema.action_names().collect()
    }

    // ============ Action commands ============

    #[test]
    fn test_add_action_appends_default_action() {
        let mut schema = schema_with_actions(&["alpha"]);

        let changed = apply(
            &mut schema,
            Cmd::AddAction {
                name: "foo".to_string(),
            },
        )
        .unwrap();

        assert_eq!(changed, vec!["foo"]);
        assert_eq!(names(&schema), vec!["alpha", "foo"]);
        assert_eq!(schema.action("foo"), Some(&Action::new()));
    }

    #[test]
    fn test_add_duplicate_action_is_rejected_unchanged() {
        let mut schema = schema_with_actions(&["foo"]);
        schema.properties["foo"].description = "keep me".to_string();
        let before = schema.clone();

        let result = apply(
            &mut schema,
            Cmd::AddAction {
                name: "foo".to_string(),
            },
        );

        assert_eq!(result, Err(EditError::DuplicateAction("foo".to_string())));
        assert_eq!(schema, before);
    }

    #[test]
    fn test_add_empty_name_is_rejected() {
        let mut schema = ActionSchema::new();
        let result = apply(&mut schema, Cmd::AddAction { name: String::new() });
        assert_eq!(result, Err(EditError::EmptyName));
        assert!(schema.is_empty());
    }

    #[test]
    fn test_remove_action_keeps_order_of_the_rest() {
        let mut schema = schema_with_actions(&["a", "b", "c"]);

        apply(
            &mut schema,
            Cmd::RemoveAction {
                name: "b".to_string(),
            },
        )
        .unwrap();

        assert_eq!(names(&schema), vec!["a", "c"]);
    }

    #[test]
    fn test_remove_missing_action_is_noop() {
        let mut schema = schema_with_actions(&["a"]);
        let changed = apply(
            &mut schema,
            Cmd::RemoveAction {
                name: "zzz".to_string(),
            },
        )
        .unwrap();
        assert!(changed.is_empty());
        assert_eq!(names(&schema), vec!["a"]);
    }

    #[test]
    fn test_remove_action_leaves_example_references() {
        let mut schema = schema_with_actions(&["greet", "bye"]);
        apply(
            &mut schema,
            Cmd::AddExample {
                name: "greet".to_string(),
            },
        )
        .unwrap();
        apply(
            &mut schema,
            Cmd::AddActionToExample {
                name: "greet".to_string(),
                index: 0,
                reference: "bye".to_string(),
            },
        )
        .unwrap();

        apply(
            &mut schema,
            Cmd::RemoveAction {
                name: "bye".to_string(),
            },
        )
        .unwrap();

        assert!(schema.properties["greet"].examples()[0].includes("bye"));
        assert_eq!(schema.dangling_references(), vec![("greet", 0, "bye")]);
    }

    #[test]
    fn test_rename_keeps_value_and_position() {
        let mut schema = schema_with_actions(&["a", "foo", "c"]);
        schema.properties["foo"].description = "moved".to_string();

        let changed = apply(
            &mut schema,
            Cmd::RenameAction {
                old: "foo".to_string(),
                new: "bar".to_string(),
            },
        )
        .unwrap();

        assert_eq!(changed, vec!["foo", "bar"]);
        assert_eq!(names(&schema), vec!["a", "bar", "c"]);
        assert_eq!(schema.properties["bar"].description, "moved");
    }

    #[test]
    fn test_rename_then_remove_drops_both_names() {
        let mut schema = schema_with_actions(&["a", "foo", "c"]);

        apply(
            &mut schema,
            Cmd::RenameAction {
                old: "foo".to_string(),
                new: "bar".to_string(),
            },
        )
        .unwrap();
        apply(
            &mut schema,
            Cmd::RemoveAction {
                name: "bar".to_string(),
            },
        )
        .unwrap();

        assert_eq!(names(&schema), vec!["a", "c"]);
    }

    #[test]
    fn test_rename_to_same_name_is_noop() {
        let mut schema = schema_with_actions(&["foo"]);
        let before = schema.clone();

        let changed = apply(
            &mut schema,
            Cmd::RenameAction {
                old: "foo".to_string(),
                new: "foo".to_string(),
            },
        )
        .unwrap();

        assert!(changed.is_empty());
        assert_eq!(schema, before);
    }

    #[rstest]
    #[case("foo", "", EditError::EmptyName)]
    #[case("foo", "bar", EditError::DuplicateAction("bar".to_string()))]
    #[case("missing", "new", EditError::ActionNotFound("missing".to_string()))]
    fn test_rename_preconditions(
        #[case] old: &str,
        #[case] new: &str,
        #[case] expected: EditError,
    ) {
        let mut schema = schema_with_actions(&["foo", "bar"]);
        let before = schema.clone();

        let result = apply(
            &mut schema,
            Cmd::RenameAction {
                old: old.to_string(),
                new: new.to_string(),
            },
        );

        assert_eq!(result, Err(expected));
        assert_eq!(schema, before);
    }

    #[test]
    fn test_rename_does_not_rewrite_example_references() {
        let mut schema = schema_with_actions(&["greet"]);
        let action = &mut schema.properties["greet"];
        let mut example = Example::new();
        example
            .assistant_action_includes
            .insert("greet".to_string(), ExampleActionFields::new());
        action.examples = Some(vec![example]);

        apply(
            &mut schema,
            Cmd::RenameAction {
                old: "greet".to_string(),
                new: "hello".to_string(),
            },
        )
        .unwrap();

        assert!(schema.properties["hello"].examples()[0].includes("greet"));
    }

    #[test]
    fn test_update_field_touches_only_that_field() {
        let mut schema = schema_with_actions(&["greet"]);
        schema.properties["greet"].depends_on = Some(vec!["user.name".to_string()]);

        apply(
            &mut schema,
            Cmd::UpdateActionField {
                name: "greet".to_string(),
                field: ActionField::ActionType(Some(ActionType::SendSms)),
            },
        )
        .unwrap();

        let action = &schema.properties["greet"];
        assert_eq!(action.action_type, Some(ActionType::SendSms));
        assert_eq!(action.depends_on, Some(vec!["user.name".to_string()]));
        assert_eq!(action.description, "");
    }

    #[test]
    fn test_update_field_on_missing_action() {
        let mut schema = ActionSchema::new();
        let result = apply(
            &mut schema,
            Cmd::UpdateActionField {
                name: "ghost".to_string(),
                field: ActionField::Description("boo".to_string()),
            },
        );
        assert_eq!(result, Err(EditError::ActionNotFound("ghost".to_string())));
        assert!(schema.is_empty());
    }

    #[test]
    fn test_webhook_edits_merge_into_one_record() {
        let mut schema = schema_with_actions(&["notify"]);

        apply(
            &mut schema,
            Cmd::SetWebhookMethod {
                name: "notify".to_string(),
                method: HttpMethod::Post,
            },
        )
        .unwrap();
        apply(
            &mut schema,
            Cmd::SetWebhookUrl {
                name: "notify".to_string(),
                url: "https://example.com/hook".to_string(),
            },
        )
        .unwrap();

        assert_eq!(
            schema.properties["notify"].webhook_constants,
            Some(WebhookConstants {
                url: Some("https://example.com/hook".to_string()),
                method: Some(HttpMethod::Post),
            })
        );
    }

    #[test]
    fn test_clearing_webhook_constants() {
        let mut schema = schema_with_actions(&["notify"]);
        schema.properties["notify"].webhook_constants = Some(WebhookConstants::default());

        apply(
            &mut schema,
            Cmd::UpdateActionField {
                name: "notify".to_string(),
                field: ActionField::WebhookConstants(None),
            },
        )
        .unwrap();

        assert_eq!(schema.properties["notify"].webhook_constants, None);
    }

    #[test]
    fn test_set_validator_keeps_toggle_order() {
        let mut schema = schema_with_actions(&["signup"]);
        for (validator, enabled) in [
            (Validator::Time, true),
            (Validator::Email, true),
            (Validator::Time, false),
        ] {
            apply(
                &mut schema,
                Cmd::SetValidator {
                    name: "signup".to_string(),
                    validator,
                    enabled,
                },
            )
            .unwrap();
        }

        let validators = schema.properties["signup"].validators.clone().unwrap();
        let order: Vec<_> = validators.iter().map(|(v, on)| (*v, *on)).collect();
        assert_eq!(
            order,
            vec![(Validator::Time, false), (Validator::Email, true)]
        );
    }

    // ============ Example commands ============

    #[test]
    fn test_add_example_creates_sequence_when_absent() {
        let mut schema = schema_with_actions(&["greet"]);
        schema.properties["greet"].examples = None;

        apply(
            &mut schema,
            Cmd::AddExample {
                name: "greet".to_string(),
            },
        )
        .unwrap();

        assert_eq!(schema.properties["greet"].examples, Some(vec![Example::new()]));
    }

    #[test]
    fn test_update_example_field() {
        let mut schema = schema_with_actions(&["greet"]);
        apply(
            &mut schema,
            Cmd::AddExample {
                name: "greet".to_string(),
            },
        )
        .unwrap();
        apply(
            &mut schema,
            Cmd::AddExample {
                name: "greet".to_string(),
            },
        )
        .unwrap();

        apply(
            &mut schema,
            Cmd::UpdateExampleField {
                name: "greet".to_string(),
                index: 1,
                field: ExampleField::UserSays("hi there".to_string()),
            },
        )
        .unwrap();

        let examples = schema.properties["greet"].examples();
        assert_eq!(examples[0].user_says, "");
        assert_eq!(examples[1].user_says, "hi there");
    }

    #[test]
    fn test_update_example_other_field_goes_to_extra() {
        let mut schema = schema_with_actions(&["greet"]);
        apply(
            &mut schema,
            Cmd::AddExample {
                name: "greet".to_string(),
            },
        )
        .unwrap();

        apply(
            &mut schema,
            Cmd::UpdateExampleField {
                name: "greet".to_string(),
                index: 0,
                field: ExampleField::parse("note", "formal").unwrap(),
            },
        )
        .unwrap();

        assert_eq!(
            schema.properties["greet"].examples()[0].extra.get("note"),
            Some(&Value::String("formal".to_string()))
        );
    }

    #[test]
    fn test_other_field_named_user_says_sets_the_utterance() {
        let mut schema = schema_with_actions(&["greet"]);
        schema.properties["greet"].examples = Some(vec![Example::new()]);

        apply(
            &mut schema,
            Cmd::UpdateExampleField {
                name: "greet".to_string(),
                index: 0,
                field: ExampleField::Other {
                    key: "user says".to_string(),
                    value: "x".to_string(),
                },
            },
        )
        .unwrap();

        let example = &schema.properties["greet"].examples()[0];
        assert_eq!(example.user_says, "x");
        assert!(example.extra.is_empty());
    }

    #[rstest]
    #[case("assistant action includes")]
    #[case("")]
    fn test_other_field_rejects_reserved_keys(#[case] key: &str) {
        let mut schema = schema_with_actions(&["greet"]);
        schema.properties["greet"].examples = Some(vec![Example::new()]);
        let before = schema.clone();

        let result = apply(
            &mut schema,
            Cmd::UpdateExampleField {
                name: "greet".to_string(),
                index: 0,
                field: ExampleField::Other {
                    key: key.to_string(),
                    value: "x".to_string(),
                },
            },
        );

        assert_eq!(result, Err(EditError::UnknownField(key.to_string())));
        assert_eq!(schema, before);
    }

    #[test]
    fn test_example_index_out_of_range() {
        let mut schema = schema_with_actions(&["greet"]);

        let result = apply(
            &mut schema,
            Cmd::UpdateExampleField {
                name: "greet".to_string(),
                index: 0,
                field: ExampleField::UserSays("hello".to_string()),
            },
        );

        assert_eq!(
            result,
            Err(EditError::ExampleNotFound {
                action: "greet".to_string(),
                index: 0,
            })
        );
    }

    #[test]
    fn test_add_then_remove_included_action_restores_example() {
        let mut schema = schema_with_actions(&["greet"]);
        apply(
            &mut schema,
            Cmd::AddExample {
                name: "greet".to_string(),
            },
        )
        .unwrap();
        let before = schema.clone();

        apply(
            &mut schema,
            Cmd::AddActionToExample {
                name: "greet".to_string(),
                index: 0,
                reference: "refA".to_string(),
            },
        )
        .unwrap();
        assert!(schema.properties["greet"].examples()[0].includes("refA"));

        apply(
            &mut schema,
            Cmd::RemoveActionFromExample {
                name: "greet".to_string(),
                index: 0,
                reference: "refA".to_string(),
            },
        )
        .unwrap();

        assert_eq!(schema, before);
    }

    #[test]
    fn test_readding_included_action_resets_fields() {
        let mut schema = schema_with_actions(&["greet"]);
        apply(
            &mut schema,
            Cmd::AddExample {
                name: "greet".to_string(),
            },
        )
        .unwrap();
        let include = Cmd::AddActionToExample {
            name: "greet".to_string(),
            index: 0,
            reference: "greet".to_string(),
        };
        apply(&mut schema, include.clone()).unwrap();
        apply(
            &mut schema,
            Cmd::UpdateExampleActionField {
                name: "greet".to_string(),
                index: 0,
                reference: "greet".to_string(),
                field: "tone".to_string(),
                value: "warm".to_string(),
            },
        )
        .unwrap();

        apply(&mut schema, include).unwrap();

        let includes = &schema.properties["greet"].examples()[0].assistant_action_includes;
        assert!(includes["greet"].is_empty());
    }

    #[test]
    fn test_update_example_action_fields_keep_order() {
        let mut schema = schema_with_actions(&["transfer"]);
        apply(
            &mut schema,
            Cmd::AddExample {
                name: "transfer".to_string(),
            },
        )
        .unwrap();
        apply(
            &mut schema,
            Cmd::AddActionToExample {
                name: "transfer".to_string(),
                index: 0,
                reference: "transfer".to_string(),
            },
        )
        .unwrap();

        for (field, value) in [("to", "sales"), ("reason", "pricing"), ("to", "support")] {
            apply(
                &mut schema,
                Cmd::UpdateExampleActionField {
                    name: "transfer".to_string(),
                    index: 0,
                    reference: "transfer".to_string(),
                    field: field.to_string(),
                    value: value.to_string(),
                },
            )
            .unwrap();
        }

        let fields = &schema.properties["transfer"].examples()[0].assistant_action_includes
            ["transfer"];
        let pairs: Vec<_> = fields.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(pairs, vec![("to", "support"), ("reason", "pricing")]);
    }

    #[test]
    fn test_update_example_action_field_requires_include() {
        let mut schema = schema_with_actions(&["greet"]);
        apply(
            &mut schema,
            Cmd::AddExample {
                name: "greet".to_string(),
            },
        )
        .unwrap();
        let before = schema.clone();

        let result = apply(
            &mut schema,
            Cmd::UpdateExampleActionField {
                name: "greet".to_string(),
                index: 0,
                reference: "refA".to_string(),
                field: "x".to_string(),
                value: "y".to_string(),
            },
        );

        assert_eq!(
            result,
            Err(EditError::ExampleActionNotFound {
                action: "greet".to_string(),
                index: 0,
                reference: "refA".to_string(),
            })
        );
        assert_eq!(schema, before);
    }

    #[test]
    fn test_remove_missing_included_action_is_noop() {
        let mut schema = schema_with_actions(&["greet"]);
        apply(
            &mut schema,
            Cmd::AddExample {
                name: "greet".to_string(),
            },
        )
        .unwrap();

        let changed = apply(
            &mut schema,
            Cmd::RemoveActionFromExample {
                name: "greet".to_string(),
                index: 0,
                reference: "nope".to_string(),
            },
        )
        .unwrap();

        assert!(changed.is_empty());
    }

    // ============ Values kept verbatim ============

    fn imported(action_json: &str) -> ActionSchema {
        let text = format!(r#"{{"type":"object","properties":{{"a":{action_json}}}}}"#);
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn test_overwrite_replaces_verbatim_value() {
        let mut schema = imported(r#"{"_depends_on": "caller.email"}"#);

        apply(
            &mut schema,
            Cmd::UpdateActionField {
                name: "a".to_string(),
                field: ActionField::DependsOn(vec!["caller.email".to_string()]),
            },
        )
        .unwrap();

        let action = &schema.properties["a"];
        assert_eq!(action.depends_on, Some(vec!["caller.email".to_string()]));
        assert!(action.extra.is_empty());
    }

    #[rstest]
    #[case(
        r#"{"_validators": {"phone": true}}"#,
        Cmd::SetValidator { name: "a".to_string(), validator: Validator::Email, enabled: true },
        "_validators"
    )]
    #[case(
        r#"{"_webhook_constants": {"method": "PUT"}}"#,
        Cmd::SetWebhookUrl { name: "a".to_string(), url: "https://x".to_string() },
        "_webhook_constants"
    )]
    #[case(
        r#"{"_examples": "none yet"}"#,
        Cmd::AddExample { name: "a".to_string() },
        "_examples"
    )]
    #[case(
        r#"{"_examples": [{"assistant action includes": {"b": {"n": 3}}}]}"#,
        Cmd::AddActionToExample { name: "a".to_string(), index: 0, reference: "c".to_string() },
        "assistant action includes"
    )]
    fn test_merge_into_verbatim_value_is_rejected(
        #[case] action_json: &str,
        #[case] cmd: Cmd,
        #[case] field: &str,
    ) {
        let mut schema = imported(action_json);
        let before = schema.clone();

        assert_eq!(
            apply(&mut schema, cmd),
            Err(EditError::UneditableValue {
                action: "a".to_string(),
                field: field.to_string(),
            })
        );
        assert_eq!(schema, before);
    }

    // ============ Field parsing ============

    #[test]
    fn test_parse_action_fields() {
        assert_eq!(
            ActionField::parse("_description", "Greets the caller").unwrap(),
            ActionField::Description("Greets the caller".to_string())
        );
        assert_eq!(
            ActionField::parse("_action_type", "webhook").unwrap(),
            ActionField::ActionType(Some(ActionType::Webhook))
        );
        assert_eq!(
            ActionField::parse("_action_type", "").unwrap(),
            ActionField::ActionType(None)
        );
        assert_eq!(
            ActionField::parse("_depends_on", "user.name, user.phone").unwrap(),
            ActionField::DependsOn(vec!["user.name".to_string(), "user.phone".to_string()])
        );
        assert_eq!(
            ActionField::parse("_webhook_constants", r#"{"url": "http://x", "method": "GET"}"#)
                .unwrap(),
            ActionField::WebhookConstants(Some(WebhookConstants {
                url: Some("http://x".to_string()),
                method: Some(HttpMethod::Get),
            }))
        );
        assert_eq!(
            ActionField::parse("_validators", r#"{"email": true}"#).unwrap(),
            ActionField::Validators(IndexMap::from([(Validator::Email, true)]))
        );
    }

    #[rstest]
    #[case("_examples")]
    #[case("type")]
    #[case("description")]
    fn test_parse_unknown_action_field(#[case] name: &str) {
        assert_eq!(
            ActionField::parse(name, "x"),
            Err(EditError::UnknownField(name.to_string()))
        );
    }

    #[test]
    fn test_parse_invalid_action_field_values() {
        assert!(matches!(
            ActionField::parse("_action_type", "fax"),
            Err(EditError::InvalidValue { .. })
        ));
        assert!(matches!(
            ActionField::parse("_webhook_constants", r#"{"method": "PUT"}"#),
            Err(EditError::InvalidValue { .. })
        ));
        assert!(matches!(
            ActionField::parse("_validators", "email"),
            Err(EditError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_wire_names_round_trip_through_parse() {
        for name in ActionField::WIRE_NAMES {
            let value = match name {
                "_webhook_constants" | "_validators" => "{}",
                _ => "",
            };
            assert_eq!(ActionField::parse(name, value).unwrap().wire_name(), name);
        }
    }

    #[test]
    fn test_parse_example_fields() {
        assert_eq!(
            ExampleField::parse("user says", "hello").unwrap(),
            ExampleField::UserSays("hello".to_string())
        );
        assert_eq!(
            ExampleField::parse("assistant action includes", "x"),
            Err(EditError::UnknownField("assistant action includes".to_string()))
        );
    }
}
