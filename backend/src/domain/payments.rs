//! Payment reconciliation workflow.
//!
//! Creating an intent talks to the payment provider only. Finalising a
//! payment is bookkeeping after the client confirmed the charge: first the
//! parcel moves to `paid`, then a ledger entry is appended. The two writes
//! are not atomic; when the second fails after the first committed the
//! caller receives a distinct `partial_reconciliation_failure` carrying the
//! identifiers needed to repair the ledger by hand.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{error, info, warn};

use super::ports::{
    CreateIntentRequest, CreateIntentResponse, FinalizePaymentRequest, FinalizePaymentResponse,
    ParcelRepository, PaymentCommand, PaymentGateway, PaymentGatewayError, PaymentIntentRequest,
    PaymentRepository,
};
use super::{Error, InsertAck, LedgerStatus, Payment, RecordId, authorize_owner};

/// Currency and method settings forwarded to the payment provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentSettings {
    pub currency: String,
    pub payment_method_types: Vec<String>,
}

impl Default for IntentSettings {
    fn default() -> Self {
        Self {
            currency: "usd".to_owned(),
            payment_method_types: vec!["card".to_owned()],
        }
    }
}

/// Implements [`PaymentCommand`] over the parcel and ledger repositories.
#[derive(Clone)]
pub struct PaymentReconciliationService<P, L> {
    parcels: Arc<P>,
    ledger: Arc<L>,
    gateway: Arc<dyn PaymentGateway>,
    clock: Arc<dyn Clock>,
    intent_settings: IntentSettings,
}

impl<P, L> PaymentReconciliationService<P, L> {
    pub fn new(
        parcels: Arc<P>,
        ledger: Arc<L>,
        gateway: Arc<dyn PaymentGateway>,
        clock: Arc<dyn Clock>,
        intent_settings: IntentSettings,
    ) -> Self {
        Self {
            parcels,
            ledger,
            gateway,
            clock,
            intent_settings,
        }
    }
}

fn map_gateway_error(error: PaymentGatewayError) -> Error {
    match error {
        PaymentGatewayError::Rejected { message } => {
            warn!(%message, "payment provider rejected intent");
            Error::payment_provider(message)
        }
        PaymentGatewayError::Unavailable { message } => {
            warn!(%message, "payment provider unavailable");
            Error::service_unavailable("payment provider unavailable")
        }
    }
}

#[async_trait]
impl<P, L> PaymentCommand for PaymentReconciliationService<P, L>
where
    P: ParcelRepository,
    L: PaymentRepository,
{
    async fn create_intent(
        &self,
        request: CreateIntentRequest,
    ) -> Result<CreateIntentResponse, Error> {
        let intent = self
            .gateway
            .create_intent(&PaymentIntentRequest {
                amount: request.amount,
                currency: self.intent_settings.currency.clone(),
                payment_method_types: self.intent_settings.payment_method_types.clone(),
            })
            .await
            .map_err(map_gateway_error)?;
        info!(intent_id = %intent.id, amount = request.amount.get(), "payment intent created");
        Ok(CreateIntentResponse {
            client_secret: intent.client_secret,
        })
    }

    async fn finalize(
        &self,
        request: FinalizePaymentRequest,
    ) -> Result<FinalizePaymentResponse, Error> {
        let FinalizePaymentRequest {
            caller,
            parcel_id,
            user_email,
            amount,
            payment_method,
            transaction_id,
        } = request;

        authorize_owner(&caller, &user_email)?;
        if payment_method.is_empty() {
            return Err(Error::invalid_request("paymentMethod must not be empty")
                .with_details(json!({ "field": "paymentMethod", "code": "missing_field" })));
        }

        let parcel = self
            .parcels
            .find_by_id(&parcel_id)
            .await?
            .ok_or_else(|| Error::not_found("parcel not found"))?;
        authorize_owner(&caller, &parcel.created_by)?;
        if parcel.payment.is_paid() {
            return Err(Error::invalid_request("parcel is already paid")
                .with_details(json!({ "parcelId": parcel_id, "code": "already_paid" })));
        }

        let paid_at = self.clock.utc();
        let parcel_result = self
            .parcels
            .mark_paid(&parcel_id, &transaction_id, paid_at)
            .await?;
        if !parcel_result.modified() {
            warn!(%parcel_id, "parcel changed before it could be marked paid");
            return Err(Error::invalid_request("parcel is no longer payable")
                .with_details(json!({ "parcelId": parcel_id, "parcelResult": parcel_result })));
        }

        let payment = Payment {
            id: RecordId::random(),
            parcel_id,
            user_email,
            amount,
            payment_method,
            transaction_id,
            status: LedgerStatus::Success,
            paid_at,
        };
        if let Err(ledger_error) = self.ledger.insert(&payment).await {
            error!(
                %parcel_id,
                transaction_id = %payment.transaction_id,
                matched = parcel_result.matched_count,
                modified = parcel_result.modified_count,
                error = %ledger_error,
                "parcel marked paid but ledger entry was not written"
            );
            return Err(Error::partial_reconciliation(
                "parcel marked paid but the payment record could not be written",
            )
            .with_details(json!({
                "parcelId": parcel_id,
                "transactionId": payment.transaction_id,
                "parcelResult": parcel_result,
            })));
        }

        info!(
            %parcel_id,
            payment_id = %payment.id,
            transaction_id = %payment.transaction_id,
            "payment reconciled"
        );
        Ok(FinalizePaymentResponse {
            success: true,
            message: "Payment successful".to_owned(),
            parcel_result,
            payment_result: InsertAck::new(payment.id),
        })
    }
}

#[cfg(test)]
mod tests;
