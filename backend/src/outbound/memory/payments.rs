use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::lock;
use crate::domain::ports::{PaymentRepository, PaymentRepositoryError};
use crate::domain::{Email, Payment};

/// Append-only ledger with a one-shot failure switch for exercising
/// partial reconciliation.
#[derive(Default)]
pub struct MemoryPaymentRepository {
    entries: Mutex<Vec<Payment>>,
    fail_next_insert: AtomicBool,
}

impl MemoryPaymentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `insert` fail with a connection error.
    pub fn fail_next_insert(&self) {
        self.fail_next_insert.store(true, Ordering::SeqCst);
    }

    /// Snapshot of every stored entry in insertion order.
    pub fn entries(&self) -> Result<Vec<Payment>, PaymentRepositoryError> {
        Ok(lock(&self.entries, PaymentRepositoryError::query)?.clone())
    }
}

#[async_trait]
impl PaymentRepository for MemoryPaymentRepository {
    async fn list_for_owner(&self, email: &Email) -> Result<Vec<Payment>, PaymentRepositoryError> {
        let entries = lock(&self.entries, PaymentRepositoryError::query)?;
        let mut owned: Vec<Payment> = entries
            .iter()
            .filter(|payment| payment.user_email == *email)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.paid_at.cmp(&a.paid_at));
        Ok(owned)
    }

    async fn insert(&self, payment: &Payment) -> Result<(), PaymentRepositoryError> {
        if self.fail_next_insert.swap(false, Ordering::SeqCst) {
            return Err(PaymentRepositoryError::connection("injected ledger failure"));
        }
        lock(&self.entries, PaymentRepositoryError::query)?.push(payment.clone());
        Ok(())
    }
}
