//! Payment handlers: intent creation, finalisation and payment history.
//!
//! ```text
//! POST /create-payment-intent {"amountInCents":1500}
//! POST /payments {"parcelId":"…","userEmail":"ada@example.com","amount":1500,
//!                 "paymentMethod":["card"],"transactionId":"pi_…"}
//! GET  /payments?email=ada@example.com
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ApiResult;
use super::access::Caller;
use super::parcels::OwnerQuery;
use super::state::HttpState;
use super::validation::{
    FieldName, parse_amount, parse_email, parse_record_id,
    parse_transaction_id, require,
};
use crate::domain::ports::{CreateIntentRequest, FinalizePaymentRequest, FinalizePaymentResponse};
use crate::domain::{Error, Payment, PaymentMethod, owner_filter};

const AMOUNT_IN_CENTS: FieldName = FieldName::new("amountInCents");
const PARCEL_ID: FieldName = FieldName::new("parcelId");
const USER_EMAIL: FieldName = FieldName::new("userEmail");
const AMOUNT: FieldName = FieldName::new("amount");
const PAYMENT_METHOD: FieldName = FieldName::new("paymentMethod");
const TRANSACTION_ID: FieldName = FieldName::new("transactionId");

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentBody {
    /// Charge in the smallest currency unit.
    pub amount_in_cents: Option<i64>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    /// Secret the browser uses to confirm the charge with the provider.
    pub client_secret: String,
}

/// Bookkeeping request sent after the browser confirmed the charge.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinalizePaymentBody {
    pub parcel_id: Option<String>,
    pub user_email: Option<String>,
    pub amount: Option<i64>,
    pub payment_method: Option<PaymentMethod>,
    pub transaction_id: Option<String>,
}

/// Open a payment intent with the card-payment provider.
#[utoipa::path(
    post,
    path = "/create-payment-intent",
    request_body = CreatePaymentIntentBody,
    responses(
        (status = 200, description = "Intent created", body = PaymentIntentResponse),
        (status = 400, description = "Invalid amount", body = Error),
        (status = 502, description = "Provider rejected the request", body = Error),
        (status = 503, description = "Provider unavailable", body = Error)
    ),
    tags = ["payments"],
    operation_id = "createPaymentIntent"
)]
#[post("/create-payment-intent")]
pub async fn create_payment_intent(
    state: web::Data<HttpState>,
    _caller: Caller,
    payload: web::Json<CreatePaymentIntentBody>,
) -> ApiResult<web::Json<PaymentIntentResponse>> {
    let raw = require(payload.into_inner().amount_in_cents, AMOUNT_IN_CENTS)?;
    let amount = parse_amount(raw, AMOUNT_IN_CENTS)?;
    let intent = state
        .payments
        .create_intent(CreateIntentRequest { amount })
        .await?;
    Ok(web::Json(PaymentIntentResponse {
        client_secret: intent.client_secret.as_str().to_owned(),
    }))
}

/// Mark the parcel paid and append the ledger entry.
#[utoipa::path(
    post,
    path = "/payments",
    request_body = FinalizePaymentBody,
    responses(
        (status = 200, description = "Both steps committed", body = FinalizePaymentResponse),
        (status = 400, description = "Invalid request or parcel already paid", body = Error),
        (status = 403, description = "Caller does not own the parcel", body = Error),
        (status = 404, description = "Parcel not found", body = Error),
        (status = 500, description = "Parcel marked paid but ledger entry missing", body = Error)
    ),
    tags = ["payments"],
    operation_id = "finalizePayment"
)]
#[post("/payments")]
pub async fn finalize_payment(
    state: web::Data<HttpState>,
    caller: Caller,
    payload: web::Json<FinalizePaymentBody>,
) -> ApiResult<web::Json<FinalizePaymentResponse>> {
    let body = payload.into_inner();
    let request = FinalizePaymentRequest {
        parcel_id: parse_record_id(&require(body.parcel_id, PARCEL_ID)?, PARCEL_ID)?,
        user_email: parse_email(require(body.user_email, USER_EMAIL)?, USER_EMAIL)?,
        amount: parse_amount(require(body.amount, AMOUNT)?, AMOUNT)?,
        payment_method: require(body.payment_method, PAYMENT_METHOD)?,
        transaction_id: parse_transaction_id(
            require(body.transaction_id, TRANSACTION_ID)?,
            TRANSACTION_ID,
        )?,
        caller: caller.into_claim(),
    };
    let response = state.payments.finalize(request).await?;
    Ok(web::Json(response))
}

/// The caller's payment history, newest first. `email` is required.
#[utoipa::path(
    get,
    path = "/payments",
    params(OwnerQuery),
    responses(
        (status = 200, description = "Ledger entries", body = [Payment]),
        (status = 403, description = "Email missing or not the credential's", body = Error)
    ),
    tags = ["payments"],
    operation_id = "listPayments"
)]
#[get("/payments")]
pub async fn list_payments(
    state: web::Data<HttpState>,
    caller: Caller,
    query: web::Query<OwnerQuery>,
) -> ApiResult<web::Json<Vec<Payment>>> {
    let owner = owner_filter(caller.claim(), query.email.as_deref(), true, false)?
        .into_owner()
        .ok_or_else(|| Error::internal("required owner filter resolved to every owner"))?;
    let payments = state.ledger.list_for_owner(&owner).await?;
    Ok(web::Json(payments))
}
