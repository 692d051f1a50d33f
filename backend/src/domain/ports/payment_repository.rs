//! Port for the append-only payment ledger.
//!
//! There is deliberately no update or delete operation.

use async_trait::async_trait;

use crate::domain::{Email, Payment};

use super::define_port_error;

define_port_error! {
    /// Errors raised by payment ledger adapters.
    pub enum PaymentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "payment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "payment repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Ledger entries paid by `email`, newest `paid_at` first.
    async fn list_for_owner(&self, email: &Email) -> Result<Vec<Payment>, PaymentRepositoryError>;

    async fn insert(&self, payment: &Payment) -> Result<(), PaymentRepositoryError>;
}
