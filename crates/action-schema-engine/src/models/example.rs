use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::models::fields::{FieldWriter, RawFields, take};

/// Field values an example expects for one included action
pub type ExampleActionFields = IndexMap<String, String>;

/// A sample utterance and the actions it should trigger.
///
/// `assistant_action_includes` is keyed by action name. Keys are not
/// required to match an action in the schema, and removing or renaming
/// an action leaves them in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Example {
    pub user_says: String,
    pub assistant_action_includes: IndexMap<String, ExampleActionFields>,
    pub extra: RawFields,
}

impl Example {
    pub const USER_SAYS: &'static str = "user says";
    pub const INCLUDES: &'static str = "assistant action includes";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn includes(&self, action_name: &str) -> bool {
        self.assistant_action_includes.contains_key(action_name)
    }
}

impl Serialize for Example {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut fields = FieldWriter::new(serializer.serialize_map(None)?, &self.extra);
        fields.field(Self::USER_SAYS, &self.user_says)?;
        fields.field(Self::INCLUDES, &self.assistant_action_includes)?;
        fields.end()
    }
}

impl<'de> Deserialize<'de> for Example {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut raw = RawFields::deserialize(deserializer)?;
        Ok(Self {
            user_says: take(&mut raw, Self::USER_SAYS).unwrap_or_default(),
            assistant_action_includes: take(&mut raw, Self::INCLUDES).unwrap_or_default(),
            extra: raw,
        })
    }
}
