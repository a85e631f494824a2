//! Field-by-field decoding shared by the schema records.
//!
//! A record is read as a raw ordered map first. Each known key is then taken
//! out only when its value decodes as the field's type; a value of any other
//! shape stays in the raw map, which becomes the record's `extra`. On write
//! the known fields come first, skipping any key that `extra` holds, and the
//! `extra` entries follow in their own order.

use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde_json::Value;

/// Keys of a record that are not held by its typed fields
pub type RawFields = IndexMap<String, Value>;

/// Take `key` out of `raw` if its value decodes as `T`
pub(crate) fn take<T: DeserializeOwned>(raw: &mut RawFields, key: &str) -> Option<T> {
    let value = raw.get(key)?;
    match T::deserialize(value) {
        Ok(decoded) => {
            raw.shift_remove(key);
            Some(decoded)
        }
        Err(e) => {
            log::debug!("keeping `{key}` verbatim: {e}");
            None
        }
    }
}

/// Like [`take`] for optional fields, where `null` reads as unset
pub(crate) fn take_optional<T: DeserializeOwned>(raw: &mut RawFields, key: &str) -> Option<T> {
    take::<Option<T>>(raw, key).flatten()
}

/// Serializes a record's known fields, then its `extra` entries
pub(crate) struct FieldWriter<'a, M> {
    map: M,
    extra: &'a RawFields,
}

impl<'a, M: SerializeMap> FieldWriter<'a, M> {
    pub(crate) fn new(map: M, extra: &'a RawFields) -> Self {
        Self { map, extra }
    }

    pub(crate) fn field<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
    ) -> Result<(), M::Error> {
        if self.extra.contains_key(key) {
            return Ok(());
        }
        self.map.serialize_entry(key, value)
    }

    pub(crate) fn optional<T: Serialize>(
        &mut self,
        key: &str,
        value: &Option<T>,
    ) -> Result<(), M::Error> {
        match value {
            Some(value) => self.field(key, value),
            None => Ok(()),
        }
    }

    pub(crate) fn end(mut self) -> Result<M::Ok, M::Error> {
        for (key, value) in self.extra {
            self.map.serialize_entry(key, value)?;
        }
        self.map.end()
    }
}
