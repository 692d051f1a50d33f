//! PostgreSQL-backed `ParcelRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde_json::Value;
use tracing::warn;

use crate::domain::ports::{ParcelRepository, ParcelRepositoryError};
use crate::domain::{
    Email, Parcel, ParcelQuery, PaymentState, PaymentStatus, RecordId, TransactionId, UpdateAck,
};

use super::diesel_basic_error_mapping::repository_error_mappers;
use super::models::{NewParcelRow, ParcelRow};
use super::pool::DbPool;
use super::schema::parcels;

/// Diesel-backed implementation of the `ParcelRepository` port.
#[derive(Clone)]
pub struct DieselParcelRepository {
    pool: DbPool,
}

impl DieselParcelRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

repository_error_mappers!(ParcelRepositoryError);

fn invalid_row(id: uuid::Uuid, reason: &str) -> ParcelRepositoryError {
    warn!(parcel_id = %id, reason, "stored parcel row is invalid");
    ParcelRepositoryError::query("stored parcel row is invalid")
}

fn row_to_parcel(row: ParcelRow) -> Result<Parcel, ParcelRepositoryError> {
    let created_by =
        Email::parse(row.created_by).map_err(|_| invalid_row(row.id, "created_by"))?;
    let payment = match (
        row.payment_status.as_str(),
        row.transaction_id,
        row.paid_at,
    ) {
        ("unpaid", None, None) => PaymentState::Unpaid,
        ("paid", Some(transaction_id), Some(paid_at)) => PaymentState::Paid {
            transaction_id: TransactionId::parse(transaction_id)
                .map_err(|_| invalid_row(row.id, "transaction_id"))?,
            paid_at,
        },
        _ => return Err(invalid_row(row.id, "payment_status")),
    };
    let Value::Object(details) = row.details else {
        return Err(invalid_row(row.id, "details"));
    };
    Ok(Parcel {
        id: RecordId::from_uuid(row.id),
        created_by,
        payment,
        creation_date: row.creation_date,
        details,
    })
}

#[async_trait]
impl ParcelRepository for DieselParcelRepository {
    async fn list(&self, query: &ParcelQuery) -> Result<Vec<Parcel>, ParcelRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut statement = parcels::table
            .select(ParcelRow::as_select())
            .order(parcels::creation_date.desc())
            .into_boxed();
        if let Some(owner) = &query.created_by {
            statement = statement.filter(parcels::created_by.eq(owner.as_str().to_owned()));
        }

        let rows: Vec<ParcelRow> = statement
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_parcel).collect()
    }

    async fn find_by_id(&self, id: &RecordId) -> Result<Option<Parcel>, ParcelRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ParcelRow> = parcels::table
            .filter(parcels::id.eq(id.as_uuid()))
            .select(ParcelRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_parcel).transpose()
    }

    async fn insert(&self, parcel: &Parcel) -> Result<(), ParcelRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (transaction_id, paid_at) = match &parcel.payment {
            PaymentState::Unpaid => (None, None),
            PaymentState::Paid {
                transaction_id,
                paid_at,
            } => (Some(transaction_id.as_str()), Some(*paid_at)),
        };
        let row = NewParcelRow {
            id: *parcel.id.as_uuid(),
            created_by: parcel.created_by.as_str(),
            payment_status: parcel.payment.status().as_str(),
            transaction_id,
            paid_at,
            creation_date: parcel.creation_date,
            details: Value::Object(parcel.details.clone()),
        };

        diesel::insert_into(parcels::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete_by_id(&self, id: &RecordId) -> Result<u64, ParcelRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(parcels::table.filter(parcels::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted as u64)
    }

    async fn mark_paid(
        &self,
        id: &RecordId,
        transaction_id: &TransactionId,
        paid_at: DateTime<Utc>,
    ) -> Result<UpdateAck, ParcelRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let modified = diesel::update(
            parcels::table
                .filter(parcels::id.eq(id.as_uuid()))
                .filter(parcels::payment_status.eq(PaymentStatus::Unpaid.as_str())),
        )
        .set((
            parcels::payment_status.eq(PaymentStatus::Paid.as_str()),
            parcels::transaction_id.eq(Some(transaction_id.as_str())),
            parcels::paid_at.eq(Some(paid_at)),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        if modified > 0 {
            return Ok(UpdateAck::new(modified as u64, modified as u64));
        }

        let matched: i64 = parcels::table
            .filter(parcels::id.eq(id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(UpdateAck::new(matched.unsigned_abs(), 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;
    use uuid::Uuid;

    #[fixture]
    fn row() -> ParcelRow {
        ParcelRow {
            id: Uuid::new_v4(),
            created_by: "ada@example.com".into(),
            payment_status: "unpaid".into(),
            transaction_id: None,
            paid_at: None,
            creation_date: Utc::now(),
            details: json!({ "title": "Books" }),
        }
    }

    #[rstest]
    fn converts_unpaid_rows(row: ParcelRow) {
        let parcel = row_to_parcel(row).expect("valid row");
        assert_eq!(parcel.payment, PaymentState::Unpaid);
        assert_eq!(parcel.details.get("title"), Some(&json!("Books")));
    }

    #[rstest]
    fn converts_paid_rows(mut row: ParcelRow) {
        row.payment_status = "paid".into();
        row.transaction_id = Some("pi_1".into());
        row.paid_at = Some(Utc::now());
        assert!(row_to_parcel(row).expect("valid row").payment.is_paid());
    }

    #[rstest]
    #[case("paid", None)]
    #[case("unpaid", Some("pi_1"))]
    #[case("refunded", None)]
    fn rejects_inconsistent_payment_columns(
        mut row: ParcelRow,
        #[case] status: &str,
        #[case] transaction_id: Option<&str>,
    ) {
        row.payment_status = status.into();
        row.transaction_id = transaction_id.map(str::to_owned);
        assert!(matches!(
            row_to_parcel(row),
            Err(ParcelRepositoryError::Query { .. })
        ));
    }

    #[rstest]
    fn rejects_non_object_details(mut row: ParcelRow) {
        row.details = json!(["not", "an", "object"]);
        assert!(row_to_parcel(row).is_err());
    }
}
