//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde_json::Value;
use tracing::warn;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{Email, RecordId, RegistrationOutcome, User};

use super::diesel_basic_error_mapping::repository_error_mappers;
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

repository_error_mappers!(UserRepositoryError);

fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    let email = Email::parse(row.email).map_err(|err| {
        warn!(user_id = %row.id, error = %err, "stored user email is invalid");
        UserRepositoryError::query("stored user row is invalid")
    })?;
    let role = row.role.parse().map_err(|err| {
        warn!(user_id = %row.id, error = %err, "stored user role is invalid");
        UserRepositoryError::query("stored user row is invalid")
    })?;
    let Value::Object(details) = row.details else {
        warn!(user_id = %row.id, "stored user details are not an object");
        return Err(UserRepositoryError::query("stored user row is invalid"));
    };
    Ok(User {
        id: RecordId::from_uuid(row.id),
        email,
        display_name: row.display_name,
        photo_url: row.photo_url,
        role,
        created_at: row.created_at,
        details,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert_if_absent(
        &self,
        user: &User,
    ) -> Result<RegistrationOutcome, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewUserRow {
            id: *user.id.as_uuid(),
            email: user.email.as_str(),
            display_name: user.display_name.as_deref(),
            photo_url: user.photo_url.as_deref(),
            role: user.role.as_str(),
            created_at: user.created_at,
            details: Value::Object(user.details.clone()),
        };

        let inserted = diesel::insert_into(users::table)
            .values(&row)
            .on_conflict(users::email)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(if inserted == 0 {
            RegistrationOutcome::AlreadyExists
        } else {
            RegistrationOutcome::Inserted(user.clone())
        })
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }
}
