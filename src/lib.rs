mod clock;
mod config;
mod error;
mod logging;
mod mapper;
mod normalize;
mod record;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{MapperConfig, READ_CONSISTENCY_ENV, TABLE_PREFIX_ENV};
pub use error::{RecordError, StoreError};
pub use logging::setup_logging;
pub use mapper::{GetOptions, RecordMapper, RecordRepository};
pub use normalize::{
    unwrap_numbers, wrap_item, wrap_numbers, IdentityNormalizer, NumberNormalizer,
    ValueNormalizer,
};
pub use record::{IndexSchema, Record, RecordExt, RecordMeta};
pub use store::{
    id_key, Attributes, InMemoryStore, ItemStream, QueryOptions, ReadConsistency, Replication,
    StoreClient, ID_ATTRIBUTE,
};

// Re-export the derive macro under the trait's name
pub use record_base_macros::Record;
