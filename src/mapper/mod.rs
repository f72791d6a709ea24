//! RecordMapper - binds a store client to the collaborators records need.
//!
//! The mapper owns the store client, the value normalizer applied to every
//! read, the clock used for audit timestamps, and the table naming config.
//! It holds no registry or cache of record instances: every fetch produces a
//! new, independent value.
//!
//! ## Example
//!
//! ```ignore
//! use record_base::{GetOptions, InMemoryStore, RecordMapper};
//!
//! let mapper = RecordMapper::new(InMemoryStore::new());
//! let mut user = mapper.records::<User>().from_partial(&attrs)?;
//! mapper.records::<User>().save(&mut user)?;
//! let loaded = mapper.records::<User>().get_by_id_strong("u-1")?;
//! ```

mod repository;

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::MapperConfig;
use crate::normalize::{NumberNormalizer, ValueNormalizer};
use crate::record::Record;
use crate::store::StoreClient;

pub use repository::{GetOptions, RecordRepository};

/// Store client plus normalizer, clock and config.
pub struct RecordMapper<S> {
    store: S,
    normalizer: Arc<dyn ValueNormalizer>,
    clock: Arc<dyn Clock>,
    config: MapperConfig,
}

impl<S: StoreClient> RecordMapper<S> {
    /// A mapper with the number normalizer, system clock and default config.
    pub fn new(store: S) -> Self {
        Self {
            store,
            normalizer: Arc::new(NumberNormalizer),
            clock: Arc::new(SystemClock),
            config: MapperConfig::default(),
        }
    }

    pub fn with_normalizer(mut self, normalizer: impl ValueNormalizer + 'static) -> Self {
        self.normalizer = Arc::new(normalizer);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_config(mut self, config: MapperConfig) -> Self {
        self.config = config;
        self
    }

    /// Access the store client.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Get a typed record repository.
    pub fn records<R: Record>(&self) -> RecordRepository<'_, S, R> {
        RecordRepository::new(self)
    }

    pub(crate) fn normalizer(&self) -> &dyn ValueNormalizer {
        self.normalizer.as_ref()
    }

    pub(crate) fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }
}
