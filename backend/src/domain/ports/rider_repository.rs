//! Port for rider persistence.
use async_trait::async_trait;

use crate::domain::{RecordId, Rider, RiderStatus, UpdateAck};

use super::define_port_error;

define_port_error! {
    /// Errors raised by rider repository adapters.
    pub enum RiderRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "rider repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "rider repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RiderRepository: Send + Sync {
    /// List riders, optionally restricted to one status, newest first.
    async fn list(&self, status: Option<RiderStatus>) -> Result<Vec<Rider>, RiderRepositoryError>;

    async fn insert(&self, rider: &Rider) -> Result<(), RiderRepositoryError>;

    async fn delete_by_id(&self, id: &RecordId) -> Result<u64, RiderRepositoryError>;

    /// Set the rider's status to `active`.
    ///
    /// Rows already active are matched but not modified.
    async fn activate(&self, id: &RecordId) -> Result<UpdateAck, RiderRepositoryError>;
}
