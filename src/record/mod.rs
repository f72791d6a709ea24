//! Records - typed entities persisted as attribute maps.
//!
//! A record is any struct that flattens [`RecordMeta`] and declares its own
//! fields. The [`Record`] trait supplies construct-from-partial: an attribute
//! bag is validated against the type's allow-list, deep-copied over the
//! type's defaults, and deserialized into a fresh instance.
//!
//! ## Example
//!
//! ```ignore
//! use record_base::{Record, RecordMeta};
//!
//! #[derive(Clone, Debug, Default, Serialize, Deserialize, Record)]
//! #[serde(rename_all = "camelCase")]
//! #[record(collection = "users", index(name = "by_email", hash_key = "email"))]
//! struct User {
//!     #[serde(flatten)]
//!     meta: RecordMeta,
//!     email: String,
//! }
//!
//! let user = User::from_partial(&attrs)?;
//! ```

mod lifecycle;
mod meta;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::RecordError;
use crate::store::Attributes;

pub use lifecycle::RecordExt;
pub use meta::RecordMeta;

/// Key schema of a secondary index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSchema {
    pub name: &'static str,
    pub hash_key: &'static str,
    pub range_key: Option<&'static str>,
}

impl IndexSchema {
    /// Fails unless `key` supplies every attribute of this index's key.
    pub fn check_key(&self, key: &Attributes) -> Result<(), RecordError> {
        let required = std::iter::once(self.hash_key).chain(self.range_key);
        for attribute in required {
            match key.get(attribute) {
                Some(Value::Null) | None => {
                    return Err(RecordError::ValidationFailure(format!(
                        "index `{}` needs key attribute `{}`",
                        self.name, attribute
                    )))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

/// Trait for types that can be stored as records.
pub trait Record: Serialize + DeserializeOwned + Clone + Default + Send + Sync {
    /// The collection name for this record type (e.g., "users", "orders").
    /// Maps to a table in DynamoDB, a collection in MongoDB, a key prefix in KV stores, etc.
    const COLLECTION: &'static str;

    /// Serialized names of the type's own fields, excluding [`RecordMeta`] ones.
    const FIELDS: &'static [&'static str];

    /// Secondary indexes this record can be fetched through.
    const INDEXES: &'static [IndexSchema] = &[];

    fn meta(&self) -> &RecordMeta;

    fn meta_mut(&mut self) -> &mut RecordMeta;

    /// Returns the unique identifier for this record instance.
    fn id(&self) -> &str {
        &self.meta().id
    }

    /// True if `name` is a field this record accepts from an attribute bag.
    fn is_recognized(name: &str) -> bool {
        RecordMeta::FIELDS.contains(&name) || Self::FIELDS.contains(&name)
    }

    /// Looks up a declared secondary index by name.
    fn index(name: &str) -> Option<&'static IndexSchema> {
        Self::INDEXES.iter().find(|index| index.name == name)
    }

    /// Builds a new instance from a partial attribute bag.
    ///
    /// The bag is copied over the type's default values; the caller's map is
    /// never shared with the result. Unrecognized names and values of the wrong
    /// shape are a `ValidationFailure`.
    fn from_partial(partial: &Attributes) -> Result<Self, RecordError> {
        if let Some(unknown) = partial.keys().find(|name| !Self::is_recognized(name)) {
            return Err(RecordError::ValidationFailure(format!(
                "unrecognized field `{}` for {}",
                unknown,
                Self::COLLECTION
            )));
        }

        let mut attributes = Self::default().to_attributes()?;
        for (name, value) in partial {
            attributes.insert(name.clone(), value.clone());
        }

        serde_json::from_value(Value::Object(attributes)).map_err(|e| {
            RecordError::ValidationFailure(format!("invalid {} attributes: {}", Self::COLLECTION, e))
        })
    }

    /// The record's full attribute form, as written to the store.
    fn to_attributes(&self) -> Result<Attributes, RecordError> {
        match serde_json::to_value(self).map_err(|e| RecordError::Serde(e.to_string()))? {
            Value::Object(map) => Ok(map),
            other => Err(RecordError::Serde(format!(
                "{} serialized to a non-object value: {}",
                Self::COLLECTION,
                other
            ))),
        }
    }

    /// Builds an instance from an item the store returned.
    ///
    /// Attributes the type does not declare (version or TTL columns added
    /// store-side) are dropped. Declared attributes of the wrong shape are
    /// still a `ValidationFailure`.
    fn from_stored(item: &Attributes) -> Result<Self, RecordError> {
        Self::from_partial(&declared_only::<Self>(item))
    }

    /// Copies a stored item over the current state, keeping fields it omits.
    ///
    /// Undeclared attributes are dropped as in [`Record::from_stored`].
    fn overlay(&mut self, attributes: &Attributes) -> Result<(), RecordError> {
        let mut merged = self.to_attributes()?;
        merged.extend(declared_only::<Self>(attributes));
        *self = Self::from_partial(&merged)?;
        Ok(())
    }
}

fn declared_only<R: Record>(item: &Attributes) -> Attributes {
    item.iter()
        .filter(|(name, _)| R::is_recognized(name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}
