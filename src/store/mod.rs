//! Store clients - the key-value / document backend records persist into.
//!
//! A store client exposes four primitives over attribute maps: point `get`,
//! `query` against a secondary index, full-item `put`, and `delete` by
//! identity. Reads take a [`ReadConsistency`]. The record layer never retries;
//! retry and timeout policy, if any, belong to the client.
//!
//! ## Example
//!
//! ```ignore
//! use record_base::{InMemoryStore, ReadConsistency, StoreClient, id_key};
//!
//! let store = InMemoryStore::new();
//! store.put("users", item)?;
//! let loaded = store.get("users", &id_key("u-1"), ReadConsistency::Strong)?;
//! ```

mod in_memory;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreError;

/// An item or partial item: attribute name to JSON value.
pub type Attributes = serde_json::Map<String, Value>;

/// Lazily produced query results.
pub type ItemStream<'a> = Box<dyn Iterator<Item = Result<Attributes, StoreError>> + Send + 'a>;

/// Attribute holding a record's primary identity.
pub const ID_ATTRIBUTE: &str = "id";

/// Builds the identity-only key `{"id": id}`.
pub fn id_key(id: &str) -> Attributes {
    let mut key = Attributes::new();
    key.insert(ID_ATTRIBUTE.to_string(), Value::String(id.to_string()));
    key
}

/// Read consistency requested from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadConsistency {
    /// Reflects every write completed before the read.
    Strong,
    /// May lag behind recent writes.
    #[default]
    Eventual,
}

impl ReadConsistency {
    /// `Strong` when `strong_consistent` is set, otherwise `Eventual`.
    pub fn from_flag(strong_consistent: bool) -> Self {
        if strong_consistent {
            ReadConsistency::Strong
        } else {
            ReadConsistency::Eventual
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReadConsistency::Strong => "strong",
            ReadConsistency::Eventual => "eventual",
        }
    }
}

impl fmt::Display for ReadConsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReadConsistency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strong" => Ok(ReadConsistency::Strong),
            "eventual" => Ok(ReadConsistency::Eventual),
            other => Err(format!("unknown read consistency `{}`", other)),
        }
    }
}

/// Options for a store `query`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Secondary index to query; `None` queries the table's primary key.
    pub index_name: Option<String>,
    pub read_consistency: ReadConsistency,
}

/// Abstract item storage keyed by table name.
///
/// Calls are blocking. An async driver is adapted by running each future to
/// completion inside the impl (e.g. `tokio::runtime::Handle::block_on` from a
/// blocking thread), so every store call stays a single suspension point.
pub trait StoreClient: Send + Sync {
    /// Point read by identity. Returns None if no item exists.
    fn get(
        &self,
        table: &str,
        key: &Attributes,
        consistency: ReadConsistency,
    ) -> Result<Option<Attributes>, StoreError>;

    /// Query items whose key attributes match `key`, lazily.
    fn query<'a>(
        &'a self,
        table: &str,
        key: &Attributes,
        options: &QueryOptions,
    ) -> Result<ItemStream<'a>, StoreError>;

    /// Create-or-replace the whole item. Returns the item as the store now holds it.
    fn put(&self, table: &str, item: Attributes) -> Result<Attributes, StoreError>;

    /// Remove the item with the given identity. Deleting a missing item is not an error.
    fn delete(&self, table: &str, key: &Attributes) -> Result<(), StoreError>;
}

impl<S: StoreClient + ?Sized> StoreClient for std::sync::Arc<S> {
    fn get(
        &self,
        table: &str,
        key: &Attributes,
        consistency: ReadConsistency,
    ) -> Result<Option<Attributes>, StoreError> {
        (**self).get(table, key, consistency)
    }

    fn query<'a>(
        &'a self,
        table: &str,
        key: &Attributes,
        options: &QueryOptions,
    ) -> Result<ItemStream<'a>, StoreError> {
        (**self).query(table, key, options)
    }

    fn put(&self, table: &str, item: Attributes) -> Result<Attributes, StoreError> {
        (**self).put(table, item)
    }

    fn delete(&self, table: &str, key: &Attributes) -> Result<(), StoreError> {
        (**self).delete(table, key)
    }
}

pub use in_memory::{InMemoryStore, Replication};
