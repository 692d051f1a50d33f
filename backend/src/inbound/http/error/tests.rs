//! Tests for HTTP error mapping.

use super::*;
use crate::domain::Error;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[fixture]
fn storage_fault(expected_trace_id: String) -> Error {
    Error::internal("parcel repository error: relation \"parcels\" does not exist")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"table": "parcels"}))
}

#[fixture]
fn partial_failure(expected_trace_id: String) -> Error {
    Error::partial_reconciliation("parcel marked paid but the payment record could not be written")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"parcelId": "p-1", "transactionId": "pi_1"}))
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no auth"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::payment_provider("card declined"), StatusCode::BAD_GATEWAY)]
#[case(Error::partial_reconciliation("half done"), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(Error::service_unavailable("db down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

async fn decode_error_response(
    error: Error,
    expected_status: StatusCode,
    expected_trace_id: Option<&str>,
) -> Error {
    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), expected_status);

    let header = response.headers().get(TRACE_ID_HEADER);
    match expected_trace_id {
        Some(expected) => {
            let trace_id = header
                .expect("trace-id header is set by error_response")
                .to_str()
                .expect("trace-id is valid UTF-8");
            assert_eq!(trace_id, expected);
        }
        None => assert!(header.is_none(), "trace-id header should not be present"),
    }

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("Error JSON deserialisation succeeds")
}

#[rstest]
#[actix_web::test]
async fn storage_faults_are_redacted(storage_fault: Error, expected_trace_id: String) {
    let payload = decode_error_response(
        storage_fault,
        StatusCode::INTERNAL_SERVER_ERROR,
        Some(expected_trace_id.as_str()),
    )
    .await;

    assert_eq!(payload.code(), ErrorCode::InternalError);
    assert_eq!(payload.message(), "Internal server error");
    assert!(payload.details().is_none());
}

#[rstest]
#[actix_web::test]
async fn partial_failures_keep_repair_details(partial_failure: Error, expected_trace_id: String) {
    let payload = decode_error_response(
        partial_failure,
        StatusCode::INTERNAL_SERVER_ERROR,
        Some(expected_trace_id.as_str()),
    )
    .await;

    assert_eq!(payload.code(), ErrorCode::PartialReconciliationFailure);
    assert_eq!(
        payload.details(),
        Some(&json!({"parcelId": "p-1", "transactionId": "pi_1"}))
    );
}

#[rstest]
#[actix_web::test]
async fn error_without_trace_id_omits_trace_header() {
    let error = Error::invalid_request("bad").with_details(json!({"field": "email"}));

    let payload = decode_error_response(error, StatusCode::BAD_REQUEST, None).await;
    assert_eq!(payload.message(), "bad");
    assert_eq!(payload.trace_id(), None);
    assert_eq!(payload.details(), Some(&json!({"field": "email"})));
}

#[given("a payment provider error code")]
fn a_payment_provider_error_code() -> ErrorCode {
    ErrorCode::PaymentProviderError
}

#[when("the adapter maps the code to an HTTP status")]
fn the_adapter_maps_the_code_to_http_status(code: ErrorCode) -> StatusCode {
    super::status_for(code)
}

#[then("the status is 502 Bad Gateway")]
fn the_status_is_502_bad_gateway(status: StatusCode) {
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[test]
fn payment_provider_errors_map_to_bad_gateway() {
    let code = a_payment_provider_error_code();
    let status = the_adapter_maps_the_code_to_http_status(code);
    the_status_is_502_bad_gateway(status);
}

#[test]
fn from_actix_error_is_redacted_internal_error() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert_eq!(err.details(), None);
}
