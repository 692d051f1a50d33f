//! PostgreSQL-backed `PaymentRepository` implementation using Diesel ORM.
//!
//! The adapter only inserts and reads; the ledger is append-only.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{PaymentRepository, PaymentRepositoryError};
use crate::domain::{Amount, Email, LedgerStatus, Payment, RecordId, TransactionId};

use super::diesel_basic_error_mapping::repository_error_mappers;
use super::models::{NewPaymentRow, PaymentRow};
use super::pool::DbPool;
use super::schema::payments;

/// Diesel-backed implementation of the `PaymentRepository` port.
#[derive(Clone)]
pub struct DieselPaymentRepository {
    pool: DbPool,
}

impl DieselPaymentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

repository_error_mappers!(PaymentRepositoryError);

fn row_to_payment(row: PaymentRow) -> Result<Payment, PaymentRepositoryError> {
    let invalid = |field: &'static str| {
        warn!(payment_id = %row.id, field, "stored payment row is invalid");
        PaymentRepositoryError::query("stored payment row is invalid")
    };
    let status = match row.status.as_str() {
        "success" => LedgerStatus::Success,
        _ => return Err(invalid("status")),
    };
    Ok(Payment {
        id: RecordId::from_uuid(row.id),
        parcel_id: RecordId::from_uuid(row.parcel_id),
        user_email: Email::parse(row.user_email).map_err(|_| invalid("user_email"))?,
        amount: Amount::new(row.amount).map_err(|_| invalid("amount"))?,
        payment_method: serde_json::from_value(row.payment_method)
            .map_err(|_| invalid("payment_method"))?,
        transaction_id: TransactionId::parse(row.transaction_id)
            .map_err(|_| invalid("transaction_id"))?,
        status,
        paid_at: row.paid_at,
    })
}

#[async_trait]
impl PaymentRepository for DieselPaymentRepository {
    async fn list_for_owner(&self, email: &Email) -> Result<Vec<Payment>, PaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<PaymentRow> = payments::table
            .filter(payments::user_email.eq(email.as_str()))
            .order(payments::paid_at.desc())
            .select(PaymentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_payment).collect()
    }

    async fn insert(&self, payment: &Payment) -> Result<(), PaymentRepositoryError> {
        let payment_method = serde_json::to_value(&payment.payment_method)
            .map_err(|err| PaymentRepositoryError::query(err.to_string()))?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewPaymentRow {
            id: *payment.id.as_uuid(),
            parcel_id: *payment.parcel_id.as_uuid(),
            user_email: payment.user_email.as_str(),
            amount: payment.amount.get(),
            payment_method,
            transaction_id: payment.transaction_id.as_str(),
            status: payment.status.as_str(),
            paid_at: payment.paid_at,
        };

        diesel::insert_into(payments::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
