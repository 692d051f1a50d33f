//! Parcel-delivery orders and their payment state.
//!
//! ## Invariants
//! - A parcel is `paid` exactly when it carries both a transaction id and a
//!   payment timestamp; [`PaymentState`] makes the other combinations
//!   unrepresentable.
//! - `created_by` is the verified email of the creator and never changes.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use super::details::{Details, strip_reserved};
use super::{Email, RecordId};

/// Keys the server owns on a parcel document.
pub const PARCEL_RESERVED_FIELDS: &[&str] = &[
    "_id",
    "id",
    "createdBy",
    "payment_status",
    "transactionId",
    "paidAt",
    "creation_date",
];

/// Maximum accepted transaction id length.
pub const TRANSACTION_ID_MAX: usize = 255;

/// Validation errors for [`TransactionId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransactionIdError {
    #[error("transactionId must not be empty")]
    Empty,
    #[error("transactionId must be at most {max} characters")]
    TooLong { max: usize },
}

/// Payment-provider transaction reference, as returned by the client after
/// a confirmed charge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "pi_3PqR2x")]
pub struct TransactionId(String);

impl TransactionId {
    pub fn parse(raw: impl Into<String>) -> Result<Self, TransactionIdError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TransactionIdError::Empty);
        }
        if trimmed.chars().count() > TRANSACTION_ID_MAX {
            return Err(TransactionIdError::TooLong {
                max: TRANSACTION_ID_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TransactionId {
    type Error = TransactionIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<TransactionId> for String {
    fn from(value: TransactionId) -> Self {
        value.0
    }
}

/// Wire label for a parcel's payment state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
        }
    }
}

/// Payment state of a parcel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentState {
    Unpaid,
    Paid {
        transaction_id: TransactionId,
        paid_at: DateTime<Utc>,
    },
}

impl PaymentState {
    pub fn status(&self) -> PaymentStatus {
        match self {
            Self::Unpaid => PaymentStatus::Unpaid,
            Self::Paid { .. } => PaymentStatus::Paid,
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, Self::Paid { .. })
    }
}

/// Stored parcel order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "ParcelDocument")]
pub struct Parcel {
    pub id: RecordId,
    pub created_by: Email,
    pub payment: PaymentState,
    pub creation_date: DateTime<Utc>,
    pub details: Details,
}

impl Parcel {
    /// Whether `email` owns this parcel.
    pub fn is_owned_by(&self, email: &Email) -> bool {
        &self.created_by == email
    }
}

/// JSON shape of a parcel as served to clients.
#[derive(Debug, Clone, Serialize)]
pub struct ParcelDocument {
    id: RecordId,
    #[serde(rename = "createdBy")]
    created_by: Email,
    payment_status: PaymentStatus,
    #[serde(rename = "transactionId", skip_serializing_if = "Option::is_none")]
    transaction_id: Option<TransactionId>,
    #[serde(rename = "paidAt", skip_serializing_if = "Option::is_none")]
    paid_at: Option<DateTime<Utc>>,
    creation_date: DateTime<Utc>,
    #[serde(flatten)]
    details: Details,
}

impl From<Parcel> for ParcelDocument {
    fn from(parcel: Parcel) -> Self {
        let payment_status = parcel.payment.status();
        let (transaction_id, paid_at) = match parcel.payment {
            PaymentState::Unpaid => (None, None),
            PaymentState::Paid {
                transaction_id,
                paid_at,
            } => (Some(transaction_id), Some(paid_at)),
        };
        Self {
            id: parcel.id,
            created_by: parcel.created_by,
            payment_status,
            transaction_id,
            paid_at,
            creation_date: parcel.creation_date,
            details: parcel.details,
        }
    }
}

/// A parcel submission after ownership has been resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct NewParcel {
    created_by: Email,
    details: Details,
}

impl NewParcel {
    /// Build a submission, dropping any server-controlled keys the client
    /// sent.
    pub fn new(created_by: Email, mut details: Details) -> Self {
        let removed = strip_reserved(&mut details, PARCEL_RESERVED_FIELDS);
        if !removed.is_empty() {
            debug!(fields = ?removed, "ignoring server-controlled parcel fields");
        }
        Self {
            created_by,
            details,
        }
    }

    pub fn created_by(&self) -> &Email {
        &self.created_by
    }

    /// New parcels always start unpaid.
    pub fn into_parcel(self, id: RecordId, creation_date: DateTime<Utc>) -> Parcel {
        Parcel {
            id,
            created_by: self.created_by,
            payment: PaymentState::Unpaid,
            creation_date,
            details: self.details,
        }
    }
}

/// Filter for parcel listings; `None` lists every parcel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParcelQuery {
    pub created_by: Option<Email>,
}
