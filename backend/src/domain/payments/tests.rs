//! Tests for the payment reconciliation workflow.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use mockall::Sequence;
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::ports::{
    MockParcelRepository, MockPaymentGateway, MockPaymentRepository, ParcelRepositoryError,
    PaymentIntent, PaymentRepositoryError,
};
use crate::domain::{
    Amount, Claim, Details, Email, ErrorCode, NewParcel, Parcel, PaymentMethod, PaymentState,
    TransactionId, UpdateAck,
};

fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock;

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        fixture_timestamp().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        fixture_timestamp()
    }
}

fn email(raw: &str) -> Email {
    Email::parse(raw).expect("fixture email")
}

#[fixture]
fn owner() -> Email {
    email("ada@example.com")
}

#[fixture]
fn parcel(owner: Email) -> Parcel {
    NewParcel::new(owner, Details::new()).into_parcel(RecordId::random(), fixture_timestamp())
}

fn finalize_request(parcel: &Parcel, caller: &Email, user_email: &Email) -> FinalizePaymentRequest {
    FinalizePaymentRequest {
        caller: Claim::new(caller.clone(), "uid"),
        parcel_id: parcel.id,
        user_email: user_email.clone(),
        amount: Amount::new(1500).expect("positive"),
        payment_method: PaymentMethod::Single("card".into()),
        transaction_id: TransactionId::parse("pi_123").expect("valid"),
    }
}

fn make_service(
    parcels: MockParcelRepository,
    ledger: MockPaymentRepository,
    gateway: MockPaymentGateway,
) -> PaymentReconciliationService<MockParcelRepository, MockPaymentRepository> {
    PaymentReconciliationService::new(
        Arc::new(parcels),
        Arc::new(ledger),
        Arc::new(gateway),
        Arc::new(FixtureClock),
        IntentSettings::default(),
    )
}

fn parcels_returning(parcel: Parcel) -> MockParcelRepository {
    let mut parcels = MockParcelRepository::new();
    parcels
        .expect_find_by_id()
        .returning(move |_| Ok(Some(parcel.clone())));
    parcels
}

#[rstest]
#[tokio::test]
async fn finalize_marks_parcel_then_writes_ledger(parcel: Parcel, owner: Email) {
    let mut seq = Sequence::new();
    let mut parcels = MockParcelRepository::new();
    let stored = parcel.clone();
    parcels
        .expect_find_by_id()
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |_| Ok(Some(stored.clone())));
    let parcel_id = parcel.id;
    parcels
        .expect_mark_paid()
        .withf(move |id, transaction_id, paid_at| {
            *id == parcel_id
                && transaction_id.as_str() == "pi_123"
                && *paid_at == fixture_timestamp()
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(UpdateAck::new(1, 1)));
    let mut ledger = MockPaymentRepository::new();
    ledger
        .expect_insert()
        .withf(move |payment| {
            payment.parcel_id == parcel_id
                && payment.transaction_id.as_str() == "pi_123"
                && payment.status == LedgerStatus::Success
                && payment.paid_at == fixture_timestamp()
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));

    let response = make_service(parcels, ledger, MockPaymentGateway::new())
        .finalize(finalize_request(&parcel, &owner, &owner))
        .await
        .expect("finalize succeeds");

    assert!(response.success);
    assert_eq!(response.message, "Payment successful");
    assert_eq!(response.parcel_result, UpdateAck::new(1, 1));
    assert!(response.payment_result.acknowledged);
}

#[rstest]
#[tokio::test]
async fn ledger_failure_after_parcel_update_is_partial(parcel: Parcel, owner: Email) {
    let mut parcels = parcels_returning(parcel.clone());
    parcels
        .expect_mark_paid()
        .times(1)
        .returning(|_, _, _| Ok(UpdateAck::new(1, 1)));
    let mut ledger = MockPaymentRepository::new();
    ledger
        .expect_insert()
        .times(1)
        .returning(|_| Err(PaymentRepositoryError::connection("connection reset")));

    let err = make_service(parcels, ledger, MockPaymentGateway::new())
        .finalize(finalize_request(&parcel, &owner, &owner))
        .await
        .expect_err("ledger write fails");

    assert_eq!(err.code(), ErrorCode::PartialReconciliationFailure);
    let details = err.details().expect("partial failure details");
    assert_eq!(details["parcelId"], json!(parcel.id.to_string()));
    assert_eq!(details["transactionId"], json!("pi_123"));
    assert_eq!(details["parcelResult"]["modifiedCount"], json!(1));
}

#[rstest]
#[case(UpdateAck::new(0, 0))]
#[case(UpdateAck::new(1, 0))]
#[tokio::test]
async fn unmodified_parcel_aborts_before_ledger(
    parcel: Parcel,
    owner: Email,
    #[case] ack: UpdateAck,
) {
    let mut parcels = parcels_returning(parcel.clone());
    parcels
        .expect_mark_paid()
        .times(1)
        .returning(move |_, _, _| Ok(ack));
    let mut ledger = MockPaymentRepository::new();
    ledger.expect_insert().never();

    let err = make_service(parcels, ledger, MockPaymentGateway::new())
        .finalize(finalize_request(&parcel, &owner, &owner))
        .await
        .expect_err("nothing modified");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn parcel_update_failure_aborts_before_ledger(parcel: Parcel, owner: Email) {
    let mut parcels = parcels_returning(parcel.clone());
    parcels
        .expect_mark_paid()
        .returning(|_, _, _| Err(ParcelRepositoryError::query("deadlock detected")));
    let mut ledger = MockPaymentRepository::new();
    ledger.expect_insert().never();

    let err = make_service(parcels, ledger, MockPaymentGateway::new())
        .finalize(finalize_request(&parcel, &owner, &owner))
        .await
        .expect_err("update fails");

    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn finalize_for_another_email_is_forbidden_without_reads(parcel: Parcel, owner: Email) {
    let mut parcels = MockParcelRepository::new();
    parcels.expect_find_by_id().never();
    let mut ledger = MockPaymentRepository::new();
    ledger.expect_insert().never();

    let err = make_service(parcels, ledger, MockPaymentGateway::new())
        .finalize(finalize_request(&parcel, &owner, &email("bob@example.com")))
        .await
        .expect_err("mismatched user email");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn finalize_on_someone_elses_parcel_is_forbidden(parcel: Parcel) {
    let intruder = email("mallory@example.com");
    let mut parcels = parcels_returning(parcel.clone());
    parcels.expect_mark_paid().never();

    let err = make_service(parcels, MockPaymentRepository::new(), MockPaymentGateway::new())
        .finalize(finalize_request(&parcel, &intruder, &intruder))
        .await
        .expect_err("not the owner");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn finalize_on_missing_parcel_is_not_found(parcel: Parcel, owner: Email) {
    let mut parcels = MockParcelRepository::new();
    parcels.expect_find_by_id().returning(|_| Ok(None));
    parcels.expect_mark_paid().never();

    let err = make_service(parcels, MockPaymentRepository::new(), MockPaymentGateway::new())
        .finalize(finalize_request(&parcel, &owner, &owner))
        .await
        .expect_err("missing parcel");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn finalize_on_paid_parcel_is_refused(mut parcel: Parcel, owner: Email) {
    parcel.payment = PaymentState::Paid {
        transaction_id: TransactionId::parse("pi_old").expect("valid"),
        paid_at: fixture_timestamp(),
    };
    let mut parcels = parcels_returning(parcel.clone());
    parcels.expect_mark_paid().never();

    let err = make_service(parcels, MockPaymentRepository::new(), MockPaymentGateway::new())
        .finalize(finalize_request(&parcel, &owner, &owner))
        .await
        .expect_err("already paid");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.details().expect("details")["code"], json!("already_paid"));
}

#[rstest]
#[tokio::test]
async fn create_intent_forwards_configured_currency() {
    let mut gateway = MockPaymentGateway::new();
    gateway
        .expect_create_intent()
        .withf(|request| {
            request.amount.get() == 2500
                && request.currency == "usd"
                && request.payment_method_types == vec!["card".to_owned()]
        })
        .times(1)
        .returning(|_| {
            Ok(PaymentIntent {
                id: "pi_1".into(),
                client_secret: zeroize::Zeroizing::new("pi_1_secret_abc".into()),
            })
        });

    let response = make_service(MockParcelRepository::new(), MockPaymentRepository::new(), gateway)
        .create_intent(CreateIntentRequest {
            amount: Amount::new(2500).expect("positive"),
        })
        .await
        .expect("intent created");

    assert_eq!(response.client_secret.as_str(), "pi_1_secret_abc");
}

#[rstest]
#[case(PaymentGatewayError::rejected("amount_too_small"), ErrorCode::PaymentProviderError)]
#[case(PaymentGatewayError::unavailable("timeout"), ErrorCode::ServiceUnavailable)]
#[tokio::test]
async fn gateway_failures_map_to_domain_codes(
    #[case] failure: PaymentGatewayError,
    #[case] expected: ErrorCode,
) {
    let mut gateway = MockPaymentGateway::new();
    gateway
        .expect_create_intent()
        .times(1)
        .returning(move |_| Err(failure.clone()));

    let err = make_service(MockParcelRepository::new(), MockPaymentRepository::new(), gateway)
        .create_intent(CreateIntentRequest {
            amount: Amount::new(100).expect("positive"),
        })
        .await
        .expect_err("gateway fails");

    assert_eq!(err.code(), expected);
}

#[rstest]
fn provider_rejection_message_is_preserved() {
    let err = map_gateway_error(PaymentGatewayError::rejected("Your card was declined."));
    assert_eq!(err.message(), "Your card was declined.");
}

#[rstest]
fn intent_response_debug_hides_the_client_secret() {
    let response = CreateIntentResponse {
        client_secret: zeroize::Zeroizing::new("pi_1_secret_x".to_owned()),
    };

    let rendered = format!("{response:?}");

    assert!(rendered.starts_with("CreateIntentResponse"));
    assert!(!rendered.contains("pi_1_secret_x"));
}
