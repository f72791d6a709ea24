use crate::error::RecordError;
use crate::mapper::{GetOptions, RecordMapper};
use crate::store::{Attributes, StoreClient};

use super::Record;

/// Lifecycle operations available on every record type.
///
/// Each method delegates to the mapper's [`RecordRepository`](crate::RecordRepository)
/// for `Self`, so `user.save(&mapper)` and `mapper.records::<User>().save(&mut user)`
/// are interchangeable.
pub trait RecordExt: Record {
    /// Fetch one record by key attributes, optionally through a secondary index.
    fn get<S: StoreClient>(
        mapper: &RecordMapper<S>,
        key: &Attributes,
        options: &GetOptions,
    ) -> Result<Self, RecordError> {
        mapper.records::<Self>().get(key, options)
    }

    /// Upsert this record and refresh it from the store's response.
    fn save<S: StoreClient>(&mut self, mapper: &RecordMapper<S>) -> Result<(), RecordError> {
        mapper.records::<Self>().save(self)
    }

    /// Set `deletedAt`/`deletedReason` and save.
    fn soft_delete<S: StoreClient>(
        &mut self,
        mapper: &RecordMapper<S>,
        reason: Option<&str>,
    ) -> Result<(), RecordError> {
        mapper.records::<Self>().soft_delete(self, reason)
    }

    /// Remove this record from the store.
    fn hard_delete<S: StoreClient>(&self, mapper: &RecordMapper<S>) -> Result<(), RecordError> {
        mapper.records::<Self>().hard_delete(self)
    }
}

impl<R: Record> RecordExt for R {}
