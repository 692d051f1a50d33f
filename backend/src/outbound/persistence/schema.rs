//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `backend/migrations` exactly.

diesel::table! {
    /// Registered users, one row per verified email. `details` holds the
    /// remaining profile fields the client sent.
    users (id) {
        id -> Uuid,
        email -> Varchar,
        display_name -> Nullable<Varchar>,
        photo_url -> Nullable<Varchar>,
        /// `user` or `admin`.
        role -> Varchar,
        created_at -> Timestamptz,
        details -> Jsonb,
    }
}

diesel::table! {
    /// Parcel-delivery orders. `details` holds the client's free-form fields.
    parcels (id) {
        id -> Uuid,
        created_by -> Varchar,
        /// `unpaid` or `paid`; a CHECK ties `paid` to the two columns below.
        payment_status -> Varchar,
        transaction_id -> Nullable<Varchar>,
        paid_at -> Nullable<Timestamptz>,
        creation_date -> Timestamptz,
        details -> Jsonb,
    }
}

diesel::table! {
    /// Append-only payment ledger.
    payments (id) {
        id -> Uuid,
        parcel_id -> Uuid,
        user_email -> Varchar,
        amount -> Int8,
        payment_method -> Jsonb,
        transaction_id -> Varchar,
        status -> Varchar,
        paid_at -> Timestamptz,
    }
}

diesel::table! {
    /// Rider applications.
    riders (id) {
        id -> Uuid,
        /// `pending` or `active`.
        status -> Varchar,
        created_at -> Timestamptz,
        details -> Jsonb,
    }
}
