//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! records; no business rules live here. Row structs (`models.rs`) and the
//! table definitions (`schema.rs`) stay private to this module. Connections
//! come from a `bb8` pool driven by `diesel-async`, and every database error
//! is mapped to the owning port's error type.
//!
//! # Example
//!
//! ```ignore
//! use profast::outbound::persistence::{DbPool, DieselParcelRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/profast")).await?;
//! let parcels = DieselParcelRepository::new(pool.clone());
//! ```

mod diesel_basic_error_mapping;
mod diesel_parcel_repository;
mod diesel_payment_repository;
mod diesel_rider_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_parcel_repository::DieselParcelRepository;
pub use diesel_payment_repository::DieselPaymentRepository;
pub use diesel_rider_repository::DieselRiderRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
