//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer; adapters convert them to
//! domain records and back.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use super::schema::{parcels, payments, riders, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub details: Value,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub display_name: Option<&'a str>,
    pub photo_url: Option<&'a str>,
    pub role: &'a str,
    pub created_at: DateTime<Utc>,
    pub details: Value,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = parcels)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ParcelRow {
    pub id: Uuid,
    pub created_by: String,
    pub payment_status: String,
    pub transaction_id: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub creation_date: DateTime<Utc>,
    pub details: Value,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = parcels)]
pub(crate) struct NewParcelRow<'a> {
    pub id: Uuid,
    pub created_by: &'a str,
    pub payment_status: &'a str,
    pub transaction_id: Option<&'a str>,
    pub paid_at: Option<DateTime<Utc>>,
    pub creation_date: DateTime<Utc>,
    pub details: Value,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = payments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PaymentRow {
    pub id: Uuid,
    pub parcel_id: Uuid,
    pub user_email: String,
    pub amount: i64,
    pub payment_method: Value,
    pub transaction_id: String,
    pub status: String,
    pub paid_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payments)]
pub(crate) struct NewPaymentRow<'a> {
    pub id: Uuid,
    pub parcel_id: Uuid,
    pub user_email: &'a str,
    pub amount: i64,
    pub payment_method: Value,
    pub transaction_id: &'a str,
    pub status: &'a str,
    pub paid_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = riders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RiderRow {
    pub id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub details: Value,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = riders)]
pub(crate) struct NewRiderRow<'a> {
    pub id: Uuid,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
    pub details: Value,
}
