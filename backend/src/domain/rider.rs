//! Delivery rider applications.
//!
//! Riders are created `pending` and move to `active` once an administrator
//! approves them. There is no way back to `pending`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use super::RecordId;
use super::details::{Details, strip_reserved};

/// Keys the server owns on a rider document.
pub const RIDER_RESERVED_FIELDS: &[&str] = &["_id", "id", "status", "createdAt"];

/// Lifecycle state of a rider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RiderStatus {
    Pending,
    Active,
}

impl RiderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
        }
    }
}

impl fmt::Display for RiderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised for status strings other than `pending` and `active`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("status must be one of: pending, active (got {0})")]
pub struct UnknownRiderStatus(pub String);

impl FromStr for RiderStatus {
    type Err = UnknownRiderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            other => Err(UnknownRiderStatus(other.to_owned())),
        }
    }
}

/// Stored rider record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "RiderDocument")]
pub struct Rider {
    pub id: RecordId,
    pub status: RiderStatus,
    pub created_at: DateTime<Utc>,
    pub details: Details,
}

/// JSON shape of a rider as served to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiderDocument {
    id: RecordId,
    status: RiderStatus,
    created_at: DateTime<Utc>,
    #[serde(flatten)]
    details: Details,
}

impl From<Rider> for RiderDocument {
    fn from(rider: Rider) -> Self {
        Self {
            id: rider.id,
            status: rider.status,
            created_at: rider.created_at,
            details: rider.details,
        }
    }
}

/// A rider application as submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct RiderApplication {
    details: Details,
}

impl RiderApplication {
    pub fn new(mut details: Details) -> Self {
        let removed = strip_reserved(&mut details, RIDER_RESERVED_FIELDS);
        if !removed.is_empty() {
            debug!(fields = ?removed, "ignoring server-controlled rider fields");
        }
        Self { details }
    }

    /// Applications always start pending, whatever the client sent.
    pub fn into_rider(self, id: RecordId, created_at: DateTime<Utc>) -> Rider {
        Rider {
            id,
            status: RiderStatus::Pending,
            created_at,
            details: self.details,
        }
    }
}
