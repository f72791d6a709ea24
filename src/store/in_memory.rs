//! InMemoryStore - HashMap-backed store client for testing and development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;

use super::{Attributes, ItemStream, QueryOptions, ReadConsistency, StoreClient, ID_ATTRIBUTE};
use crate::error::StoreError;
use crate::normalize::{unwrap_numbers, wrap_item, NumberNormalizer, ValueNormalizer};

/// How writes reach the replica that serves eventually consistent reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Replication {
    /// Every write is visible to eventual reads immediately.
    #[default]
    Immediate,
    /// Eventual reads only see writes after [`InMemoryStore::sync_replicas`].
    Manual,
}

/// Internal stored representation of an item.
#[derive(Clone)]
struct StoredItem {
    /// Item with numbers in store-native `{"N": ...}` form.
    item: Attributes,
    /// Order of first insertion, used to order query results.
    seq: u64,
}

#[derive(Default)]
struct Tables {
    primary: HashMap<String, StoredItem>,
    replica: HashMap<String, StoredItem>,
    next_seq: u64,
}

/// In-memory store backed by a HashMap.
///
/// Storage key is `"TABLE:id"`. Numbers are held wrapped as `{"N": "..."}`,
/// the way DynamoDB returns them, so reads need a
/// [`NumberNormalizer`](crate::NumberNormalizer). Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
    replication: Replication,
}

impl InMemoryStore {
    /// Create a new empty store with immediate replication.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty store with the given replication mode.
    pub fn with_replication(replication: Replication) -> Self {
        Self {
            tables: Arc::default(),
            replication,
        }
    }

    /// Bring the replica up to date with every completed write.
    pub fn sync_replicas(&self) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        let snapshot = tables.primary.clone();
        tables.replica = snapshot;
        Ok(())
    }

    /// Number of items currently held in `table` (strongly consistent view).
    pub fn item_count(&self, table: &str) -> Result<usize, StoreError> {
        let prefix = format!("{}:", table);
        let tables = self.read()?;
        Ok(tables
            .primary
            .keys()
            .filter(|key| key.starts_with(&prefix))
            .count())
    }

    fn make_key(table: &str, id: &str) -> String {
        format!("{}:{}", table, id)
    }

    fn identity(item: &Attributes) -> Result<&str, StoreError> {
        match item.get(ID_ATTRIBUTE).and_then(Value::as_str) {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(StoreError::Malformed(format!(
                "item has no string `{}` attribute",
                ID_ATTRIBUTE
            ))),
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))
    }

    fn view(tables: &Tables, consistency: ReadConsistency) -> &HashMap<String, StoredItem> {
        match consistency {
            ReadConsistency::Strong => &tables.primary,
            ReadConsistency::Eventual => &tables.replica,
        }
    }

    fn replicates_immediately(&self) -> bool {
        self.replication == Replication::Immediate
    }
}

impl StoreClient for InMemoryStore {
    fn get(
        &self,
        table: &str,
        key: &Attributes,
        consistency: ReadConsistency,
    ) -> Result<Option<Attributes>, StoreError> {
        let key = Self::make_key(table, Self::identity(key)?);
        let tables = self.read()?;
        Ok(Self::view(&tables, consistency)
            .get(&key)
            .map(|stored| stored.item.clone()))
    }

    fn query<'a>(
        &'a self,
        table: &str,
        key: &Attributes,
        options: &QueryOptions,
    ) -> Result<ItemStream<'a>, StoreError> {
        if key.is_empty() {
            return Err(StoreError::Malformed(
                "query needs at least one key attribute".into(),
            ));
        }

        let wanted: Vec<(&String, Value)> = key
            .iter()
            .map(|(name, value)| (name, unwrap_numbers(value.clone())))
            .collect();
        let prefix = format!("{}:", table);

        let tables = self.read()?;
        let mut matches: Vec<&StoredItem> = Self::view(&tables, options.read_consistency)
            .iter()
            .filter(|(storage_key, _)| storage_key.starts_with(&prefix))
            .map(|(_, stored)| stored)
            .filter(|stored| {
                wanted.iter().all(|(name, value)| {
                    stored
                        .item
                        .get(name.as_str())
                        .map(|held| values_match(&unwrap_numbers(held.clone()), value))
                        .unwrap_or(false)
                })
            })
            .collect();
        matches.sort_by_key(|stored| stored.seq);

        let items: Vec<Attributes> = matches.into_iter().map(|stored| stored.item.clone()).collect();
        Ok(Box::new(items.into_iter().map(Ok::<_, StoreError>)))
    }

    fn put(&self, table: &str, item: Attributes) -> Result<Attributes, StoreError> {
        let key = Self::make_key(table, Self::identity(&item)?);
        let stored_item = wrap_item(item);

        let mut tables = self.write()?;
        let existing_seq = tables.primary.get(&key).map(|existing| existing.seq);
        let seq = match existing_seq {
            Some(seq) => seq,
            None => {
                tables.next_seq += 1;
                tables.next_seq
            }
        };

        let stored = StoredItem {
            item: stored_item.clone(),
            seq,
        };
        if self.replicates_immediately() {
            tables.replica.insert(key.clone(), stored.clone());
        }
        tables.primary.insert(key, stored);

        Ok(NumberNormalizer.normalize(stored_item))
    }

    fn delete(&self, table: &str, key: &Attributes) -> Result<(), StoreError> {
        let key = Self::make_key(table, Self::identity(key)?);
        let mut tables = self.write()?;
        tables.primary.remove(&key);
        if self.replicates_immediately() {
            tables.replica.remove(&key);
        }
        Ok(())
    }
}

/// Equality on native values where numbers compare by numeric value, so a
/// stored `2.0` matches a key of `2`.
fn values_match(held: &Value, wanted: &Value) -> bool {
    match (held, wanted) {
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
                a == b
            } else if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
                a == b
            } else {
                a.as_f64() == b.as_f64()
            }
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| values_match(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(name, a)| b.get(name).map(|b| values_match(a, b)).unwrap_or(false))
        }
        _ => held == wanted,
    }
}
