use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::models::Example;
use crate::models::fields::{FieldWriter, RawFields, take, take_optional};

/// Type tag written on every action created by the editor
pub const OBJECT_TYPE: &str = "object";

/// What the assistant does when it triggers an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    UpdateState,
    Webhook,
    HangUpCall,
    TransferCallTo,
    SendSms,
    PressPhoneKeys,
}

impl ActionType {
    pub const ALL: [ActionType; 6] = [
        ActionType::UpdateState,
        ActionType::Webhook,
        ActionType::HangUpCall,
        ActionType::TransferCallTo,
        ActionType::SendSms,
        ActionType::PressPhoneKeys,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::UpdateState => "update_state",
            ActionType::Webhook => "webhook",
            ActionType::HangUpCall => "hang_up_call",
            ActionType::TransferCallTo => "transfer_call_to",
            ActionType::SendSms => "send_sms",
            ActionType::PressPhoneKeys => "press_phone_keys",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown action type `{s}`"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            _ => Err(format!("unknown HTTP method `{s}`, expected GET or POST")),
        }
    }
}

/// Fixed request settings for a webhook action.
///
/// Both parts are optional because the form edits them one at a time; a
/// record holding only a method is a valid intermediate state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookConstants {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpMethod>,
}

/// Input-format checks that can be toggled per action.
///
/// Wire names are the labels the editor has always written; the short
/// forms are accepted on import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Validator {
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "date (MM/dd/yyy)", alias = "date")]
    Date,
    #[serde(rename = "time (hh:mm aa)", alias = "time")]
    Time,
    #[serde(rename = "datetimeiso")]
    DateTimeIso,
}

impl Validator {
    pub const ALL: [Validator; 4] = [
        Validator::Email,
        Validator::Date,
        Validator::Time,
        Validator::DateTimeIso,
    ];

    /// Name as written in the serialized document
    pub fn wire_name(&self) -> &'static str {
        match self {
            Validator::Email => "email",
            Validator::Date => "date (MM/dd/yyy)",
            Validator::Time => "time (hh:mm aa)",
            Validator::DateTimeIso => "datetimeiso",
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Validator::Email => "email",
            Validator::Date => "date",
            Validator::Time => "time",
            Validator::DateTimeIso => "datetimeiso",
        }
    }
}

impl fmt::Display for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for Validator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.short_name() == s || v.wire_name() == s)
            .ok_or_else(|| format!("unknown validator `{s}`"))
    }
}

/// A named unit of configured behavior.
///
/// A known key whose value has some other shape than the one the editor
/// writes is kept in `extra` under its own name and exported from there.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub description: String,
    pub examples: Option<Vec<Example>>,
    pub type_tag: String,
    pub action_type: Option<ActionType>,
    pub webhook_constants: Option<WebhookConstants>,
    pub validators: Option<IndexMap<Validator, bool>>,
    pub depends_on: Option<Vec<String>>,

    /// Keys this editor does not manage, kept so import/export is lossless
    pub extra: RawFields,
}

impl Action {
    pub const DESCRIPTION: &'static str = "_description";
    pub const EXAMPLES: &'static str = "_examples";
    pub const TYPE: &'static str = "type";
    pub const ACTION_TYPE: &'static str = "_action_type";
    pub const WEBHOOK_CONSTANTS: &'static str = "_webhook_constants";
    pub const VALIDATORS: &'static str = "_validators";
    pub const DEPENDS_ON: &'static str = "_depends_on";
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut fields = FieldWriter::new(serializer.serialize_map(None)?, &self.extra);
        fields.field(Self::DESCRIPTION, &self.description)?;
        fields.optional(Self::EXAMPLES, &self.examples)?;
        fields.field(Self::TYPE, &self.type_tag)?;
        fields.optional(Self::ACTION_TYPE, &self.action_type)?;
        fields.optional(Self::WEBHOOK_CONSTANTS, &self.webhook_constants)?;
        fields.optional(Self::VALIDATORS, &self.validators)?;
        fields.optional(Self::DEPENDS_ON, &self.depends_on)?;
        fields.end()
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut raw = RawFields::deserialize(deserializer)?;
        Ok(Self {
            description: take(&mut raw, Self::DESCRIPTION).unwrap_or_default(),
            examples: take_optional(&mut raw, Self::EXAMPLES),
            type_tag: take(&mut raw, Self::TYPE).unwrap_or_else(object_type),
            action_type: take_optional(&mut raw, Self::ACTION_TYPE),
            webhook_constants: take_optional(&mut raw, Self::WEBHOOK_CONSTANTS),
            validators: take_optional(&mut raw, Self::VALIDATORS),
            depends_on: take_optional(&mut raw, Self::DEPENDS_ON),
            extra: raw,
        })
    }
}

fn object_type() -> String {
    OBJECT_TYPE.to_string()
}

impl Default for Action {
    /// An action as created by the editor: empty description and an empty
    /// (but present) example list.
    fn default() -> Self {
        Self {
            description: String::new(),
            examples: Some(Vec::new()),
            type_tag: object_type(),
            action_type: None,
            webhook_constants: None,
            validators: None,
            depends_on: None,
            extra: RawFields::new(),
        }
    }
}

impl Action {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn examples(&self) -> &[Example] {
        self.examples.as_deref().unwrap_or_default()
    }

    pub fn is_webhook(&self) -> bool {
        self.action_type == Some(ActionType::Webhook)
    }

    /// Whether a validator is switched on; unset validators count as off
    pub fn validator_enabled(&self, validator: Validator) -> bool {
        self.validators
            .as_ref()
            .and_then(|v| v.get(&validator).copied())
            .unwrap_or(false)
    }
}

/// Split the comma-separated dependency field into trimmed paths.
///
/// Empty segments are dropped, so `"a,,b"` gives `["a", "b"]` and an empty
/// field gives no paths at all.
pub fn depends_on_from_csv(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join dependency paths back into the form the edit field shows
pub fn depends_on_to_csv(paths: &[String]) -> String {
    paths.join(", ")
}
