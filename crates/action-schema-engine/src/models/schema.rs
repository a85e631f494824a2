use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::models::fields::{FieldWriter, RawFields, take};
use crate::models::{Action, OBJECT_TYPE};

/// Dialect written to the `$schema` key of every new document
pub const DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";

/// The whole document: a set of uniquely named actions.
///
/// `properties` keeps insertion order, which is also the order actions are
/// shown and exported in. Every action must be an object; below that,
/// values of an unexpected shape are kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionSchema {
    pub dialect: String,
    pub type_tag: String,
    pub properties: IndexMap<String, Action>,

    /// Root keys besides the three above, such as `title`
    pub extra: RawFields,
}

fn draft_07() -> String {
    DRAFT_07.to_string()
}

impl Default for ActionSchema {
    fn default() -> Self {
        Self {
            dialect: draft_07(),
            type_tag: OBJECT_TYPE.to_string(),
            properties: IndexMap::new(),
            extra: RawFields::new(),
        }
    }
}

impl ActionSchema {
    const DIALECT: &'static str = "$schema";
    const TYPE: &'static str = "type";
    const PROPERTIES: &'static str = "properties";
}

impl Serialize for ActionSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut fields = FieldWriter::new(serializer.serialize_map(None)?, &self.extra);
        fields.field(Self::DIALECT, &self.dialect)?;
        fields.field(Self::TYPE, &self.type_tag)?;
        fields.field(Self::PROPERTIES, &self.properties)?;
        fields.end()
    }
}

impl<'de> Deserialize<'de> for ActionSchema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut raw = RawFields::deserialize(deserializer)?;
        let properties = raw
            .shift_remove(Self::PROPERTIES)
            .ok_or_else(|| D::Error::missing_field(Self::PROPERTIES))?;
        let properties = IndexMap::<String, Action>::deserialize(properties)
            .map_err(|e| D::Error::custom(format!("properties: {e}")))?;

        Ok(Self {
            dialect: take(&mut raw, Self::DIALECT).unwrap_or_else(draft_07),
            type_tag: take(&mut raw, Self::TYPE).unwrap_or_else(|| OBJECT_TYPE.to_string()),
            properties,
            extra: raw,
        })
    }
}

impl ActionSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn action(&self, name: &str) -> Option<&Action> {
        self.properties.get(name)
    }

    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Example references that point at no action in this schema.
    ///
    /// Yields `(action, example index, referenced name)`.
    pub fn dangling_references(&self) -> Vec<(&str, usize, &str)> {
        let mut dangling = Vec::new();
        for (name, action) in &self.properties {
            for (index, example) in action.examples().iter().enumerate() {
                for reference in example.assistant_action_includes.keys() {
                    if !self.contains(reference) {
                        dangling.push((name.as_str(), index, reference.as_str()));
                    }
                }
            }
        }
        dangling
    }
}
