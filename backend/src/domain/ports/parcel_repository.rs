//! Port for parcel persistence.
//!
//! Parcels are owner-scoped: callers filter by `created_by` through
//! [`ParcelQuery`]. The only mutation after insert is the unpaid → paid
//! transition performed by [`ParcelRepository::mark_paid`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Parcel, ParcelQuery, RecordId, TransactionId, UpdateAck};

use super::define_port_error;

define_port_error! {
    /// Errors raised by parcel repository adapters.
    pub enum ParcelRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "parcel repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "parcel repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParcelRepository: Send + Sync {
    /// List parcels matching `query`, newest `creation_date` first.
    async fn list(&self, query: &ParcelQuery) -> Result<Vec<Parcel>, ParcelRepositoryError>;

    async fn find_by_id(&self, id: &RecordId) -> Result<Option<Parcel>, ParcelRepositoryError>;

    async fn insert(&self, parcel: &Parcel) -> Result<(), ParcelRepositoryError>;

    /// Delete by id, returning the number of rows removed (0 or 1).
    async fn delete_by_id(&self, id: &RecordId) -> Result<u64, ParcelRepositoryError>;

    /// Move an unpaid parcel to paid.
    ///
    /// Only rows still `unpaid` are touched, so a parcel that was paid or
    /// deleted concurrently reports `modified_count == 0`.
    async fn mark_paid(
        &self,
        id: &RecordId,
        transaction_id: &TransactionId,
        paid_at: DateTime<Utc>,
    ) -> Result<UpdateAck, ParcelRepositoryError>;
}
