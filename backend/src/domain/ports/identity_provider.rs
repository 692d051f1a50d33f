//! Port for the external identity provider that verifies ID tokens.
use async_trait::async_trait;

use crate::domain::{BearerToken, Claim};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity provider adapters.
    pub enum IdentityProviderError {
        /// The provider examined the token and refused it.
        Rejected { message: String } => "identity token rejected: {message}",
        /// The provider could not be reached or failed internally.
        Unavailable { message: String } => "identity provider unavailable: {message}",
    }
}

/// Verify a bearer token and return the identity it asserts.
///
/// Implementations must not cache verdicts across calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify(&self, token: &BearerToken) -> Result<Claim, IdentityProviderError>;
}

/// Prefix of tokens accepted by [`FixtureIdentityProvider`].
#[cfg(any(test, feature = "test-support"))]
pub const FIXTURE_TOKEN_PREFIX: &str = "fixture:";

/// Deterministic provider for tests. Only built with the `test-support`
/// feature.
///
/// Accepts tokens of the form `fixture:<email>` and rejects everything else.
///
/// # Examples
/// ```
/// use profast::domain::Email;
/// use profast::domain::ports::FixtureIdentityProvider;
///
/// let email = Email::parse("ada@example.com").expect("email");
/// assert_eq!(FixtureIdentityProvider::token_for(&email), "fixture:ada@example.com");
/// ```
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityProvider;

#[cfg(any(test, feature = "test-support"))]
impl FixtureIdentityProvider {
    /// Token that verifies as `email`.
    pub fn token_for(email: &crate::domain::Email) -> String {
        format!("{FIXTURE_TOKEN_PREFIX}{email}")
    }
}

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl IdentityProvider for FixtureIdentityProvider {
    async fn verify(&self, token: &BearerToken) -> Result<Claim, IdentityProviderError> {
        let raw = token
            .expose()
            .strip_prefix(FIXTURE_TOKEN_PREFIX)
            .ok_or_else(|| IdentityProviderError::rejected("unrecognised fixture token"))?;
        let email = crate::domain::Email::parse(raw)
            .map_err(|err| IdentityProviderError::rejected(err.to_string()))?;
        let uid = format!("fixture-{}", email.as_str());
        Ok(Claim::new(email, uid))
    }
}
