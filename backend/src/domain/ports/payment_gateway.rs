//! Port for the card-payment provider that creates payment intents.
use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::Amount;

use super::define_port_error;

define_port_error! {
    /// Errors raised by payment gateway adapters.
    pub enum PaymentGatewayError {
        /// The provider answered and declined the request.
        Rejected { message: String } => "payment provider rejected the request: {message}",
        /// The provider could not be reached or answered with a server fault.
        Unavailable { message: String } => "payment provider unavailable: {message}",
    }
}

/// Parameters for a new payment intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntentRequest {
    pub amount: Amount,
    pub currency: String,
    pub payment_method_types: Vec<String>,
}

/// Intent created by the provider. The client secret authorises the browser
/// to confirm the charge and is zeroed on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: Zeroizing<String>,
}

impl std::fmt::Debug for PaymentIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentIntent")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment intent. Called at most once per request; never
    /// retried.
    async fn create_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentGatewayError>;
}

/// Gateway that fabricates intents locally, for tests. Only built with the
/// `test-support` feature.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePaymentGateway;

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl PaymentGateway for FixturePaymentGateway {
    async fn create_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentGatewayError> {
        let id = format!("pi_fixture_{}", uuid::Uuid::new_v4().simple());
        let client_secret = Zeroizing::new(format!("{id}_secret_{}", request.amount.get()));
        Ok(PaymentIntent { id, client_secret })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_gateway_embeds_intent_id_in_secret() {
        let request = PaymentIntentRequest {
            amount: Amount::new(1500).expect("positive"),
            currency: "usd".into(),
            payment_method_types: vec!["card".into()],
        };
        let intent = FixturePaymentGateway
            .create_intent(&request)
            .await
            .expect("fixture intent");
        assert!(intent.client_secret.starts_with(&intent.id));
    }
}
