//! Conversions from repository port errors into domain errors.
//!
//! Connection faults surface as `service_unavailable`; query faults become
//! `internal_error`, whose message is logged and then redacted at the HTTP
//! edge.

use tracing::{error, warn};

use super::Error;
use super::ports::{
    ParcelRepositoryError, PaymentRepositoryError, RiderRepositoryError, UserRepositoryError,
};

macro_rules! map_repository_error {
    ($($error:ident => $label:literal),* $(,)?) => {
        $(
            impl From<$error> for Error {
                fn from(err: $error) -> Self {
                    match err {
                        $error::Connection { message } => {
                            warn!(repository = $label, %message, "repository unavailable");
                            Error::service_unavailable(concat!($label, " repository unavailable"))
                        }
                        $error::Query { message } => {
                            error!(repository = $label, %message, "repository query failed");
                            Error::internal(format!(concat!($label, " repository error: {}"), message))
                        }
                    }
                }
            }
        )*
    };
}

map_repository_error! {
    UserRepositoryError => "user",
    ParcelRepositoryError => "parcel",
    PaymentRepositoryError => "payment",
    RiderRepositoryError => "rider",
}
