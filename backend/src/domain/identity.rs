//! Identity verification for inbound requests.
//!
//! Turns a raw `Authorization` header into a verified [`Claim`]. A missing
//! credential is `unauthorized`; a credential the provider refuses is
//! `forbidden`; a provider outage is `service_unavailable`.

use std::sync::Arc;

use tracing::{debug, warn};

use super::ports::{IdentityProvider, IdentityProviderError};
use super::{BearerToken, Claim, Error};

/// Verifies bearer credentials against an [`IdentityProvider`].
#[derive(Clone)]
pub struct IdentityVerifier {
    provider: Arc<dyn IdentityProvider>,
}

impl IdentityVerifier {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// Verify the raw `Authorization` header value of a request.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use profast::domain::{Email, ErrorCode, IdentityVerifier};
    /// use profast::domain::ports::FixtureIdentityProvider;
    ///
    /// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
    /// let verifier = IdentityVerifier::new(Arc::new(FixtureIdentityProvider));
    /// let email = Email::parse("ada@example.com").expect("email");
    /// let header = format!("Bearer {}", FixtureIdentityProvider::token_for(&email));
    ///
    /// let claim = verifier.verify(Some(&header)).await.expect("verified");
    /// assert_eq!(claim.email(), &email);
    ///
    /// let missing = verifier.verify(None).await.expect_err("no header");
    /// assert_eq!(missing.code(), ErrorCode::Unauthorized);
    /// # });
    /// ```
    pub async fn verify(&self, authorization: Option<&str>) -> Result<Claim, Error> {
        let token = BearerToken::from_authorization(authorization).map_err(|err| {
            debug!(reason = %err, "request carries no usable credential");
            Error::unauthorized("unauthorized access")
        })?;

        match self.provider.verify(&token).await {
            Ok(claim) => Ok(claim),
            Err(IdentityProviderError::Rejected { message }) => {
                warn!(
                    token_fingerprint = %token.fingerprint(),
                    %message,
                    "identity provider rejected credential"
                );
                Err(Error::forbidden("forbidden access"))
            }
            Err(IdentityProviderError::Unavailable { message }) => {
                warn!(%message, "identity provider unavailable");
                Err(Error::service_unavailable("identity provider unavailable"))
            }
        }
    }
}
