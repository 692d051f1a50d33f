//! Reqwest-backed identity provider adapter.
//!
//! Verifies Firebase ID tokens through the Google Identity Toolkit
//! `accounts:lookup` endpoint. The adapter owns transport details only:
//! request encoding, timeout, HTTP status mapping and response decoding.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use zeroize::Zeroizing;

use super::dto::{ErrorEnvelopeDto, LookupRequestDto, LookupResponseDto};
use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{BearerToken, Claim};

/// Production endpoint for token lookups.
pub const DEFAULT_IDENTITY_ENDPOINT: &str =
    "https://identitytoolkit.googleapis.com/v1/accounts:lookup";

/// Identity provider adapter calling one `accounts:lookup` endpoint.
pub struct IdentityToolkitProvider {
    client: Client,
    endpoint: Url,
    api_key: Zeroizing<String>,
}

impl IdentityToolkitProvider {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: Zeroizing<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    fn lookup_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("key", self.api_key.as_str());
        url
    }
}

#[async_trait]
impl IdentityProvider for IdentityToolkitProvider {
    async fn verify(&self, token: &BearerToken) -> Result<Claim, IdentityProviderError> {
        let response = self
            .client
            .post(self.lookup_url())
            .json(&LookupRequestDto {
                id_token: token.expose(),
            })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_claim(body.as_ref())
    }
}

fn parse_claim(body: &[u8]) -> Result<Claim, IdentityProviderError> {
    let decoded: LookupResponseDto = serde_json::from_slice(body).map_err(|error| {
        IdentityProviderError::unavailable(format!("invalid lookup payload: {error}"))
    })?;
    decoded
        .into_claim()
        .map_err(IdentityProviderError::rejected)
}

fn map_transport_error(error: reqwest::Error) -> IdentityProviderError {
    // The request URL carries the API key; never echo it.
    IdentityProviderError::unavailable(error.without_url().to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> IdentityProviderError {
    let reason = serde_json::from_slice::<ErrorEnvelopeDto>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_default();
    let message = if reason.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), reason)
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS | StatusCode::REQUEST_TIMEOUT => {
            IdentityProviderError::unavailable(message)
        }
        _ if status.is_client_error() => IdentityProviderError::rejected(message),
        _ => IdentityProviderError::unavailable(message),
    }
}
