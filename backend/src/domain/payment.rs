//! Append-only payment ledger entries.
//!
//! Entries are written once by the reconciliation workflow and never updated
//! or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Email, RecordId, TransactionId};

/// Validation errors for [`Amount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("amount must be a positive integer in the smallest currency unit")]
    NotPositive,
}

/// Positive amount in the smallest currency unit (cents for `usd`).
///
/// # Examples
/// ```
/// use profast::domain::Amount;
///
/// assert_eq!(Amount::new(1500).expect("positive").get(), 1500);
/// assert!(Amount::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "i64", into = "i64")]
#[schema(value_type = i64, example = 1500)]
pub struct Amount(i64);

impl Amount {
    pub fn new(value: i64) -> Result<Self, AmountError> {
        if value <= 0 {
            return Err(AmountError::NotPositive);
        }
        Ok(Self(value))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Amount {
    type Error = AmountError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for i64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

/// Payment method as reported by the client: a single label or the list
/// of method types the provider confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum PaymentMethod {
    Single(String),
    Many(Vec<String>),
}

impl PaymentMethod {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(label) => label.trim().is_empty(),
            Self::Many(labels) => labels.iter().all(|label| label.trim().is_empty()),
        }
    }
}

/// Outcome recorded on a ledger entry. Only confirmed charges are recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LedgerStatus {
    Success,
}

impl LedgerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
        }
    }
}

/// A payment ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Payment {
    pub id: RecordId,
    #[serde(rename = "parcelId")]
    pub parcel_id: RecordId,
    #[serde(rename = "userEmail")]
    pub user_email: Email,
    pub amount: Amount,
    #[serde(rename = "paymentMethod")]
    pub payment_method: PaymentMethod,
    #[serde(rename = "transactionId")]
    pub transaction_id: TransactionId,
    pub status: LedgerStatus,
    pub paid_at: DateTime<Utc>,
}
