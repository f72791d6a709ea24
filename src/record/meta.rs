use serde::{Deserialize, Serialize};

/// Identity and audit fields common to every record.
///
/// Flatten it into a concrete record with `#[serde(flatten)]`; on the wire the
/// fields are `id`, `createdAt`, `updatedAt`, `deletedAt` and `deletedReason`.
/// Timestamps are Unix milliseconds, zero meaning unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMeta {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
    #[serde(default)]
    pub deleted_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_reason: Option<String>,
}

impl RecordMeta {
    /// Serialized names of the common fields.
    pub const FIELDS: &'static [&'static str] =
        &["id", "createdAt", "updatedAt", "deletedAt", "deletedReason"];

    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// True once the record has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at > 0
    }

    /// Stamp a persist at `now`: `createdAt` once, `updatedAt` never backwards.
    pub(crate) fn touch(&mut self, now: i64) {
        if self.created_at == 0 {
            self.created_at = now;
        }
        self.updated_at = now.max(self.updated_at);
    }

    pub(crate) fn mark_deleted(&mut self, now: i64, reason: Option<&str>) {
        self.deleted_at = now;
        self.deleted_reason = reason.map(str::to_string);
    }
}
