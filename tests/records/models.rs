//! Record types used across the record integration tests.

use record_base::{Record, RecordMeta};
use serde::{Deserialize, Serialize};

/// Free-form profile data nested inside a user.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub bio: String,
    pub tags: Vec<String>,
}

/// A user account, fetchable by email through a secondary index.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
#[record(collection = "users", index(name = "by_email", hash_key = "email"))]
pub struct User {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub email: String,
    pub display_name: String,
    pub login_count: u32,
    pub profile: Profile,
}

impl User {
    pub fn new(id: &str, email: &str) -> Self {
        Self {
            meta: RecordMeta::new(id),
            email: email.to_string(),
            ..Self::default()
        }
    }
}

/// An order placed by a customer. Collection name comes from the type name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
#[record(index(name = "by_customer", hash_key = "customerId", range_key = "placedAt"))]
#[record(index(name = "by_status", hash_key = "status"))]
pub struct Order {
    #[serde(flatten)]
    #[record(meta)]
    pub audit: RecordMeta,
    pub customer_id: String,
    pub placed_at: i64,
    pub status: String,
    #[serde(rename = "total")]
    pub total_cents: i64,
}

impl Order {
    pub fn new(id: &str, customer_id: &str, status: &str, total_cents: i64) -> Self {
        Self {
            audit: RecordMeta::new(id),
            customer_id: customer_id.to_string(),
            placed_at: 1_700_000_000_000,
            status: status.to_string(),
            total_cents,
        }
    }
}
