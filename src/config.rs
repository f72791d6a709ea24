//! Mapper configuration.

use std::env;

use serde::Deserialize;

use crate::store::ReadConsistency;

/// Environment variable holding the table name prefix.
pub const TABLE_PREFIX_ENV: &str = "RECORD_TABLE_PREFIX";
/// Environment variable holding the default read consistency.
pub const READ_CONSISTENCY_ENV: &str = "RECORD_READ_CONSISTENCY";

/// Settings shared by every record type a mapper serves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Prepended to each record collection to form the store table name.
    pub table_prefix: String,
    /// Consistency used when a fetch does not choose one.
    pub default_consistency: ReadConsistency,
}

impl MapperConfig {
    /// Reads `RECORD_TABLE_PREFIX` and `RECORD_READ_CONSISTENCY`; both optional.
    pub fn from_env() -> Result<Self, String> {
        let table_prefix = env::var(TABLE_PREFIX_ENV).unwrap_or_default();
        let default_consistency = match env::var(READ_CONSISTENCY_ENV) {
            Ok(value) => value
                .parse()
                .map_err(|e| format!("{}: {}", READ_CONSISTENCY_ENV, e))?,
            Err(_) => ReadConsistency::default(),
        };
        Ok(Self {
            table_prefix,
            default_consistency,
        })
    }

    pub fn with_table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = prefix.into();
        self
    }

    pub fn with_default_consistency(mut self, consistency: ReadConsistency) -> Self {
        self.default_consistency = consistency;
        self
    }

    /// Store table name for a record collection.
    pub fn table_name(&self, collection: &str) -> String {
        format!("{}{}", self.table_prefix, collection)
    }
}
