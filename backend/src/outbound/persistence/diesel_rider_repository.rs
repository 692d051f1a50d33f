//! PostgreSQL-backed `RiderRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde_json::Value;
use tracing::warn;

use crate::domain::ports::{RiderRepository, RiderRepositoryError};
use crate::domain::{RecordId, Rider, RiderStatus, UpdateAck};

use super::diesel_basic_error_mapping::repository_error_mappers;
use super::models::{NewRiderRow, RiderRow};
use super::pool::DbPool;
use super::schema::riders;

/// Diesel-backed implementation of the `RiderRepository` port.
#[derive(Clone)]
pub struct DieselRiderRepository {
    pool: DbPool,
}

impl DieselRiderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

repository_error_mappers!(RiderRepositoryError);

fn row_to_rider(row: RiderRow) -> Result<Rider, RiderRepositoryError> {
    let status = row.status.parse::<RiderStatus>().map_err(|err| {
        warn!(rider_id = %row.id, error = %err, "stored rider status is invalid");
        RiderRepositoryError::query("stored rider row is invalid")
    })?;
    let Value::Object(details) = row.details else {
        warn!(rider_id = %row.id, "stored rider details are not an object");
        return Err(RiderRepositoryError::query("stored rider row is invalid"));
    };
    Ok(Rider {
        id: RecordId::from_uuid(row.id),
        status,
        created_at: row.created_at,
        details,
    })
}

#[async_trait]
impl RiderRepository for DieselRiderRepository {
    async fn list(&self, status: Option<RiderStatus>) -> Result<Vec<Rider>, RiderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut statement = riders::table
            .select(RiderRow::as_select())
            .order(riders::created_at.desc())
            .into_boxed();
        if let Some(status) = status {
            statement = statement.filter(riders::status.eq(status.as_str()));
        }

        let rows: Vec<RiderRow> = statement
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_rider).collect()
    }

    async fn insert(&self, rider: &Rider) -> Result<(), RiderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewRiderRow {
            id: *rider.id.as_uuid(),
            status: rider.status.as_str(),
            created_at: rider.created_at,
            details: Value::Object(rider.details.clone()),
        };

        diesel::insert_into(riders::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete_by_id(&self, id: &RecordId) -> Result<u64, RiderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(riders::table.filter(riders::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted as u64)
    }

    async fn activate(&self, id: &RecordId) -> Result<UpdateAck, RiderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let modified = diesel::update(
            riders::table
                .filter(riders::id.eq(id.as_uuid()))
                .filter(riders::status.ne(RiderStatus::Active.as_str())),
        )
        .set(riders::status.eq(RiderStatus::Active.as_str()))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        if modified > 0 {
            return Ok(UpdateAck::new(modified as u64, modified as u64));
        }

        let matched: i64 = riders::table
            .filter(riders::id.eq(id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(UpdateAck::new(matched.unsigned_abs(), 0))
    }
}
