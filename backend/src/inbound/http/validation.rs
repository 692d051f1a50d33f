//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every malformed input ends as `invalid_request` with a `details` object
//! naming the field and a stable code, never as a storage error.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, web};
use serde_json::json;
use tracing::debug;

use crate::domain::{Amount, Email, Error, RecordId, TransactionId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidId,
    InvalidEmail,
    InvalidAmount,
    InvalidValue,
    MalformedBody,
    MalformedQuery,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::InvalidAmount => "invalid_amount",
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::MalformedBody => "malformed_body",
            ErrorCode::MalformedQuery => "malformed_query",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

fn field_value_error(field: FieldName, code: ErrorCode, message: String, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {}", field.as_str()),
    )
}

pub(crate) fn invalid_value_error(field: FieldName, reason: impl std::fmt::Display) -> Error {
    field_error(
        field,
        ErrorCode::InvalidValue,
        format!("{} is invalid: {reason}", field.as_str()),
    )
}

/// Parse a record identifier from a path or body field.
pub(crate) fn parse_record_id(value: &str, field: FieldName) -> Result<RecordId, Error> {
    value.parse().map_err(|_| {
        field_value_error(
            field,
            ErrorCode::InvalidId,
            format!("{} must be a valid identifier", field.as_str()),
            value,
        )
    })
}

pub(crate) fn parse_email(value: String, field: FieldName) -> Result<Email, Error> {
    Email::parse(value.clone()).map_err(|err| {
        field_value_error(
            field,
            ErrorCode::InvalidEmail,
            format!("{}: {err}", field.as_str()),
            &value,
        )
    })
}

pub(crate) fn parse_amount(value: i64, field: FieldName) -> Result<Amount, Error> {
    Amount::new(value).map_err(|err| {
        field_error(
            field,
            ErrorCode::InvalidAmount,
            format!("{}: {err}", field.as_str()),
        )
    })
}

pub(crate) fn parse_transaction_id(value: String, field: FieldName) -> Result<TransactionId, Error> {
    TransactionId::parse(value).map_err(|err| invalid_value_error(field, err))
}

/// Reject a body field that is absent.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// A body that is valid JSON but not the expected shape.
pub(crate) fn malformed_body_error(reason: impl std::fmt::Display) -> Error {
    Error::invalid_request(format!("malformed request body: {reason}"))
        .with_details(json!({ "code": ErrorCode::MalformedBody.as_str() }))
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejecting malformed JSON body");
    malformed_body_error(err).into()
}

fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejecting malformed query string");
    Error::invalid_request(format!("malformed query string: {err}"))
        .with_details(json!({ "code": ErrorCode::MalformedQuery.as_str() }))
        .into()
}

/// JSON extractor configuration mapping parse failures to `invalid_request`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

/// Query extractor configuration mapping parse failures to `invalid_request`.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error_handler)
}
