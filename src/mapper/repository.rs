//! RecordRepository - Typed accessor for record lifecycle operations.

use std::marker::PhantomData;

use tracing::{debug, warn};

use super::RecordMapper;
use crate::error::{RecordError, StoreError};
use crate::record::Record;
use crate::store::{id_key, Attributes, QueryOptions, ReadConsistency, StoreClient};

/// How a record is located by [`RecordRepository::get`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetOptions {
    /// Secondary index to query instead of the primary key.
    pub index_name: Option<String>,
    /// Requested consistency; the mapper's default applies when unset.
    pub consistency: Option<ReadConsistency>,
}

impl GetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options requesting a strongly consistent primary-key read.
    pub fn strong() -> Self {
        Self::new().strong_consistent(true)
    }

    pub fn index(mut self, name: impl Into<String>) -> Self {
        self.index_name = Some(name.into());
        self
    }

    pub fn strong_consistent(mut self, strong: bool) -> Self {
        self.consistency = Some(ReadConsistency::from_flag(strong));
        self
    }
}

/// Typed repository wrapper for records of a specific type.
pub struct RecordRepository<'a, S, R> {
    mapper: &'a RecordMapper<S>,
    _marker: PhantomData<R>,
}

impl<'a, S: StoreClient, R: Record> RecordRepository<'a, S, R> {
    pub fn new(mapper: &'a RecordMapper<S>) -> Self {
        Self {
            mapper,
            _marker: PhantomData,
        }
    }

    /// Store table backing this record type.
    pub fn table(&self) -> String {
        self.mapper.config().table_name(R::COLLECTION)
    }

    /// Build a record from a partial attribute bag. No store round trip.
    pub fn from_partial(&self, partial: &Attributes) -> Result<R, RecordError> {
        R::from_partial(partial)
    }

    /// Fetch one record by primary key, or through a secondary index.
    ///
    /// Through an index, every matching item is read and normalized and the
    /// last one wins. Fails with `NotFound` when nothing matches.
    pub fn get(&self, key: &Attributes, options: &GetOptions) -> Result<R, RecordError> {
        let consistency = options
            .consistency
            .unwrap_or(self.mapper.config().default_consistency);
        let partial = match options.index_name.as_deref() {
            None => self.get_by_primary_key(key, consistency)?,
            Some(index_name) => self.get_by_index(index_name, key, consistency)?,
        };
        R::from_stored(&partial)
    }

    /// Eventually consistent fetch by `id`.
    pub fn get_by_id(&self, id: &str) -> Result<R, RecordError> {
        self.get(&id_key(id), &GetOptions::new().strong_consistent(false))
    }

    /// Strongly consistent fetch by `id`.
    pub fn get_by_id_strong(&self, id: &str) -> Result<R, RecordError> {
        self.get(&id_key(id), &GetOptions::strong())
    }

    /// Upsert the whole record, then overlay what the store returned.
    ///
    /// Stamps `updatedAt` (and `createdAt` on first save). The record is only
    /// modified when the write succeeds.
    pub fn save(&self, record: &mut R) -> Result<(), RecordError> {
        let mut pending = record.clone();
        pending.meta_mut().touch(self.mapper.now_millis());
        self.persist(record, pending)
    }

    /// Mark the record deleted and save it. The item stays in the store.
    pub fn soft_delete(&self, record: &mut R, reason: Option<&str>) -> Result<(), RecordError> {
        let now = self.mapper.now_millis();
        let mut pending = record.clone();
        pending.meta_mut().mark_deleted(now, reason);
        pending.meta_mut().touch(now);
        self.persist(record, pending)
    }

    /// Physically remove the record from the store.
    ///
    /// The instance is left as it was, so a failed call can be retried with
    /// it. After success it describes an item that no longer exists; saving
    /// it again recreates the item.
    pub fn hard_delete(&self, record: &R) -> Result<(), RecordError> {
        let key = self.identity_key(record.id())?;
        let table = self.table();
        debug!(collection = R::COLLECTION, id = record.id(), "hard-deleting record");
        self.mapper
            .store()
            .delete(&table, &key)
            .map_err(|e| self.store_failure("delete", e))
    }

    fn persist(&self, record: &mut R, mut pending: R) -> Result<(), RecordError> {
        self.identity_key(pending.id())?;
        let table = self.table();
        let item = pending.to_attributes()?;

        debug!(
            collection = R::COLLECTION,
            id = pending.id(),
            updated_at = pending.meta().updated_at,
            "saving record"
        );
        let saved = self
            .mapper
            .store()
            .put(&table, item)
            .map_err(|e| self.store_failure("put", e))?;

        pending.overlay(&saved)?;
        *record = pending;
        Ok(())
    }

    fn get_by_primary_key(
        &self,
        key: &Attributes,
        consistency: ReadConsistency,
    ) -> Result<Attributes, RecordError> {
        let template = R::from_partial(key)?;
        let identity = self.identity_key(template.id())?;
        let table = self.table();

        debug!(
            collection = R::COLLECTION,
            id = template.id(),
            consistency = %consistency,
            "fetching record"
        );
        match self
            .mapper
            .store()
            .get(&table, &identity, consistency)
            .map_err(|e| self.store_failure("get", e))?
        {
            Some(item) => Ok(self.mapper.normalizer().normalize(item)),
            None => Err(RecordError::not_found(&table, &identity)),
        }
    }

    fn get_by_index(
        &self,
        index_name: &str,
        key: &Attributes,
        consistency: ReadConsistency,
    ) -> Result<Attributes, RecordError> {
        let schema = R::index(index_name).ok_or_else(|| {
            RecordError::ValidationFailure(format!(
                "{} has no index `{}`",
                R::COLLECTION,
                index_name
            ))
        })?;
        if let Some(unknown) = key.keys().find(|name| !R::is_recognized(name)) {
            return Err(RecordError::ValidationFailure(format!(
                "unrecognized key attribute `{}` for {}",
                unknown,
                R::COLLECTION
            )));
        }
        schema.check_key(key)?;

        let table = self.table();
        let options = QueryOptions {
            index_name: Some(index_name.to_string()),
            read_consistency: consistency,
        };
        debug!(
            collection = R::COLLECTION,
            index = index_name,
            consistency = %consistency,
            "querying record index"
        );

        let items = self
            .mapper
            .store()
            .query(&table, key, &options)
            .map_err(|e| self.store_failure("query", e))?;

        let mut last = None;
        let mut matched = 0usize;
        for item in items {
            let item = item.map_err(|e| self.store_failure("query", e))?;
            last = Some(self.mapper.normalizer().normalize(item));
            matched += 1;
        }
        if matched > 1 {
            debug!(
                collection = R::COLLECTION,
                index = index_name,
                matched,
                "index query matched several records, keeping the last"
            );
        }

        last.ok_or_else(|| RecordError::not_found(&table, key))
    }

    fn identity_key(&self, id: &str) -> Result<Attributes, RecordError> {
        if id.is_empty() {
            return Err(RecordError::ValidationFailure(format!(
                "{} record has no `id`",
                R::COLLECTION
            )));
        }
        Ok(id_key(id))
    }

    fn store_failure(&self, operation: &'static str, err: StoreError) -> RecordError {
        warn!(
            collection = R::COLLECTION,
            operation,
            error = %err,
            "record store call failed"
        );
        err.into()
    }
}
