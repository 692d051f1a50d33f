//! Wire types for the Stripe payment intents API.

use serde::Deserialize;
use zeroize::Zeroizing;

use crate::domain::ports::{PaymentIntent, PaymentIntentRequest};

#[derive(Deserialize)]
pub(super) struct PaymentIntentDto {
    pub(super) id: String,
    pub(super) client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorEnvelopeDto {
    pub(super) error: ErrorBodyDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorBodyDto {
    #[serde(default)]
    pub(super) message: Option<String>,
    #[serde(default)]
    pub(super) code: Option<String>,
}

impl ErrorBodyDto {
    pub(super) fn describe(self) -> Option<String> {
        self.message.or(self.code).filter(|text| !text.is_empty())
    }
}

impl PaymentIntentDto {
    pub(super) fn into_intent(self) -> Result<PaymentIntent, String> {
        let secret = self
            .client_secret
            .ok_or_else(|| format!("intent {} has no client secret", self.id))?;
        Ok(PaymentIntent {
            id: self.id,
            client_secret: Zeroizing::new(secret),
        })
    }
}

/// Form body for `POST /v1/payment_intents`.
pub(super) fn intent_form(request: &PaymentIntentRequest) -> Vec<(&'static str, String)> {
    let mut form = vec![
        ("amount", request.amount.get().to_string()),
        ("currency", request.currency.clone()),
    ];
    form.extend(
        request
            .payment_method_types
            .iter()
            .map(|method| ("payment_method_types[]", method.clone())),
    );
    form
}
