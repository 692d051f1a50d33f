//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Email, RegistrationOutcome, User};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert `user` unless a row with the same email exists.
    ///
    /// Must be atomic: concurrent registrations of one email leave exactly
    /// one row and report [`RegistrationOutcome::AlreadyExists`] to the
    /// losers.
    async fn insert_if_absent(&self, user: &User)
    -> Result<RegistrationOutcome, UserRepositoryError>;

    /// Fetch a user by email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserRepositoryError>;
}
