//! Acknowledgement envelopes returned by write operations.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::RecordId;

/// Returned after a successful insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    pub inserted_id: RecordId,
}

impl InsertAck {
    pub fn new(inserted_id: RecordId) -> Self {
        Self {
            acknowledged: true,
            inserted_id,
        }
    }
}

/// Returned after a delete; `deleted_count` is zero when nothing matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteAck {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}

/// Returned after an update.
///
/// `matched_count` counts rows selected by id; `modified_count` counts rows
/// whose stored values actually changed.
///
/// # Examples
/// ```
/// use profast::domain::UpdateAck;
///
/// let ack = UpdateAck::new(1, 0);
/// assert!(ack.matched());
/// assert!(!ack.modified());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

impl UpdateAck {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
        }
    }

    pub fn matched(&self) -> bool {
        self.matched_count > 0
    }

    pub fn modified(&self) -> bool {
        self.modified_count > 0
    }
}
