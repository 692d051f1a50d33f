//! Driving port for the payment reconciliation workflow.
use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::{
    Amount, Claim, Email, Error, InsertAck, PaymentMethod, RecordId, TransactionId, UpdateAck,
};

/// Request to open a payment intent for `amount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateIntentRequest {
    pub amount: Amount,
}

/// Client secret returned verbatim from the provider.
#[derive(Clone, PartialEq, Eq)]
pub struct CreateIntentResponse {
    pub client_secret: Zeroizing<String>,
}

impl std::fmt::Debug for CreateIntentResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateIntentResponse")
            .finish_non_exhaustive()
    }
}

/// Bookkeeping request sent after the client confirmed a charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizePaymentRequest {
    /// Verified identity of the caller.
    pub caller: Claim,
    pub parcel_id: RecordId,
    /// Email the client claims paid; must equal `caller`.
    pub user_email: Email,
    pub amount: Amount,
    pub payment_method: PaymentMethod,
    pub transaction_id: TransactionId,
}

/// Both steps committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinalizePaymentResponse {
    pub success: bool,
    pub message: String,
    pub parcel_result: UpdateAck,
    pub payment_result: InsertAck,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentCommand: Send + Sync {
    async fn create_intent(&self, request: CreateIntentRequest)
    -> Result<CreateIntentResponse, Error>;

    /// Mark the parcel paid, then append the ledger entry.
    ///
    /// A failure after the parcel update is reported as
    /// [`crate::domain::ErrorCode::PartialReconciliationFailure`].
    async fn finalize(&self, request: FinalizePaymentRequest)
    -> Result<FinalizePaymentResponse, Error>;
}
