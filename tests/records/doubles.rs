//! Store client test doubles.

use std::sync::Mutex;

use record_base::{
    Attributes, InMemoryStore, ItemStream, QueryOptions, ReadConsistency, StoreClient,
    StoreError,
};

/// A store call as seen by [`RecordingStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Get {
        table: String,
        consistency: ReadConsistency,
    },
    Query {
        table: String,
        index_name: Option<String>,
        consistency: ReadConsistency,
    },
    Put {
        table: String,
    },
    Delete {
        table: String,
    },
}

/// Wraps an in-memory store and records every call it receives.
#[derive(Default)]
pub struct RecordingStore {
    inner: InMemoryStore,
    calls: Mutex<Vec<Call>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> Option<Call> {
        self.calls.lock().unwrap().last().cloned()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl StoreClient for RecordingStore {
    fn get(
        &self,
        table: &str,
        key: &Attributes,
        consistency: ReadConsistency,
    ) -> Result<Option<Attributes>, StoreError> {
        self.record(Call::Get {
            table: table.to_string(),
            consistency,
        });
        self.inner.get(table, key, consistency)
    }

    fn query<'a>(
        &'a self,
        table: &str,
        key: &Attributes,
        options: &QueryOptions,
    ) -> Result<ItemStream<'a>, StoreError> {
        self.record(Call::Query {
            table: table.to_string(),
            index_name: options.index_name.clone(),
            consistency: options.read_consistency,
        });
        self.inner.query(table, key, options)
    }

    fn put(&self, table: &str, item: Attributes) -> Result<Attributes, StoreError> {
        self.record(Call::Put {
            table: table.to_string(),
        });
        self.inner.put(table, item)
    }

    fn delete(&self, table: &str, key: &Attributes) -> Result<(), StoreError> {
        self.record(Call::Delete {
            table: table.to_string(),
        });
        self.inner.delete(table, key)
    }
}

/// Answers every index query with a fixed sequence of results.
pub struct ScriptedQueryStore {
    results: Vec<Result<Attributes, StoreError>>,
}

impl ScriptedQueryStore {
    pub fn new(results: Vec<Result<Attributes, StoreError>>) -> Self {
        Self { results }
    }
}

impl StoreClient for ScriptedQueryStore {
    fn get(
        &self,
        _table: &str,
        _key: &Attributes,
        _consistency: ReadConsistency,
    ) -> Result<Option<Attributes>, StoreError> {
        Ok(None)
    }

    fn query<'a>(
        &'a self,
        _table: &str,
        _key: &Attributes,
        _options: &QueryOptions,
    ) -> Result<ItemStream<'a>, StoreError> {
        Ok(Box::new(self.results.iter().cloned()))
    }

    fn put(&self, _table: &str, item: Attributes) -> Result<Attributes, StoreError> {
        Ok(item)
    }

    fn delete(&self, _table: &str, _key: &Attributes) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Fails every call with the same error.
pub struct FailingStore {
    error: StoreError,
}

impl FailingStore {
    pub fn new(error: StoreError) -> Self {
        Self { error }
    }
}

impl StoreClient for FailingStore {
    fn get(
        &self,
        _table: &str,
        _key: &Attributes,
        _consistency: ReadConsistency,
    ) -> Result<Option<Attributes>, StoreError> {
        Err(self.error.clone())
    }

    fn query<'a>(
        &'a self,
        _table: &str,
        _key: &Attributes,
        _options: &QueryOptions,
    ) -> Result<ItemStream<'a>, StoreError> {
        Err(self.error.clone())
    }

    fn put(&self, _table: &str, _item: Attributes) -> Result<Attributes, StoreError> {
        Err(self.error.clone())
    }

    fn delete(&self, _table: &str, _key: &Attributes) -> Result<(), StoreError> {
        Err(self.error.clone())
    }
}

/// An in-memory store that rewrites `displayName` on the way in, the way a
/// store might normalize or compute attributes on write.
#[derive(Default)]
pub struct TrimmingStore {
    inner: InMemoryStore,
}

impl StoreClient for TrimmingStore {
    fn get(
        &self,
        table: &str,
        key: &Attributes,
        consistency: ReadConsistency,
    ) -> Result<Option<Attributes>, StoreError> {
        self.inner.get(table, key, consistency)
    }

    fn query<'a>(
        &'a self,
        table: &str,
        key: &Attributes,
        options: &QueryOptions,
    ) -> Result<ItemStream<'a>, StoreError> {
        self.inner.query(table, key, options)
    }

    fn put(&self, table: &str, mut item: Attributes) -> Result<Attributes, StoreError> {
        if let Some(name) = item.get("displayName").and_then(|v| v.as_str()) {
            let trimmed = name.trim().to_string();
            item.insert("displayName".into(), trimmed.into());
        }
        self.inner.put(table, item)
    }

    fn delete(&self, table: &str, key: &Attributes) -> Result<(), StoreError> {
        self.inner.delete(table, key)
    }
}

/// An in-memory store that stamps a `version` column on every write, an
/// attribute no record type in these tests declares.
#[derive(Default)]
pub struct VersionStampingStore {
    inner: InMemoryStore,
}

impl VersionStampingStore {
    pub fn inner(&self) -> &InMemoryStore {
        &self.inner
    }
}

impl StoreClient for VersionStampingStore {
    fn get(
        &self,
        table: &str,
        key: &Attributes,
        consistency: ReadConsistency,
    ) -> Result<Option<Attributes>, StoreError> {
        self.inner.get(table, key, consistency)
    }

    fn query<'a>(
        &'a self,
        table: &str,
        key: &Attributes,
        options: &QueryOptions,
    ) -> Result<ItemStream<'a>, StoreError> {
        self.inner.query(table, key, options)
    }

    fn put(&self, table: &str, mut item: Attributes) -> Result<Attributes, StoreError> {
        item.insert("version".into(), 1.into());
        self.inner.put(table, item)
    }

    fn delete(&self, table: &str, key: &Attributes) -> Result<(), StoreError> {
        self.inner.delete(table, key)
    }
}
