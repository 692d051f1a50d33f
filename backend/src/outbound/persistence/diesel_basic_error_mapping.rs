//! Shared Diesel error mapping for the repository adapters.

use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map Diesel errors into query or connection errors.
///
/// Database messages are logged at debug level and replaced with a generic
/// description so SQL details never travel further than the adapter.
pub fn map_basic_diesel_error<E, Q, C>(error: diesel::result::Error, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DeserializationError(_) | DieselError::SerializationError(_) => {
            query("stored value could not be converted")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
        | DieselError::BrokenTransactionManager => connection("database connection error"),
        _ => query("database error"),
    }
}

/// Generate `map_pool_error`/`map_diesel_error` for one repository error type.
macro_rules! repository_error_mappers {
    ($error:ident) => {
        fn map_pool_error(error: $crate::outbound::persistence::pool::PoolError) -> $error {
            $crate::outbound::persistence::diesel_basic_error_mapping::map_basic_pool_error(
                error,
                |message| $error::connection(message),
            )
        }

        fn map_diesel_error(error: diesel::result::Error) -> $error {
            $crate::outbound::persistence::diesel_basic_error_mapping::map_basic_diesel_error(
                error,
                |message| $error::query(message),
                |message| $error::connection(message),
            )
        }
    };
}

pub(crate) use repository_error_mappers;
