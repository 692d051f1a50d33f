//! Reqwest-backed payment gateway adapter for Stripe payment intents.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use zeroize::Zeroizing;

use super::dto::{ErrorEnvelopeDto, PaymentIntentDto, intent_form};
use crate::domain::ports::{
    PaymentGateway, PaymentGatewayError, PaymentIntent, PaymentIntentRequest,
};

/// Production endpoint for creating payment intents.
pub const DEFAULT_PAYMENT_ENDPOINT: &str = "https://api.stripe.com/v1/payment_intents";

const BODY_PREVIEW_LIMIT: usize = 160;

/// Payment gateway adapter that creates one intent per call.
pub struct StripeGateway {
    client: Client,
    endpoint: Url,
    secret_key: Zeroizing<String>,
}

impl StripeGateway {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        secret_key: Zeroizing<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            secret_key,
        })
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentGatewayError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(self.secret_key.as_str())
            .form(&intent_form(request))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let decoded: PaymentIntentDto = serde_json::from_slice(body.as_ref()).map_err(|error| {
            PaymentGatewayError::unavailable(format!("invalid intent payload: {error}"))
        })?;
        decoded.into_intent().map_err(PaymentGatewayError::unavailable)
    }
}

fn map_transport_error(error: reqwest::Error) -> PaymentGatewayError {
    if error.is_timeout() {
        return PaymentGatewayError::unavailable("payment provider request timed out");
    }
    PaymentGatewayError::unavailable(error.to_string())
}

/// Any reply carrying the provider's error envelope is passed through with
/// its message, whatever the status. Bare 4xx replies are rejections; bare
/// 5xx replies usually come from a proxy and count as an outage.
fn map_status_error(status: StatusCode, body: &[u8]) -> PaymentGatewayError {
    let provider_message = serde_json::from_slice::<ErrorEnvelopeDto>(body)
        .ok()
        .and_then(|envelope| envelope.error.describe());

    match provider_message {
        Some(message) => PaymentGatewayError::rejected(message),
        None if status.is_client_error() => {
            PaymentGatewayError::rejected(format!("status {}", status.as_u16()))
        }
        None => PaymentGatewayError::unavailable(format!(
            "status {}: {}",
            status.as_u16(),
            body_preview(body)
        )),
    }
}

fn body_preview(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let compact = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if compact.chars().count() <= BODY_PREVIEW_LIMIT {
        return compact;
    }
    let truncated: String = compact.chars().take(BODY_PREVIEW_LIMIT).collect();
    format!("{truncated}...")
}
