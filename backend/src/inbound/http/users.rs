//! User registration handler.
//!
//! ```text
//! POST /users {"email":"ada@example.com","displayName":"Ada","last_log_in":"..."}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;
use utoipa::ToSchema;

use super::ApiResult;
use super::access::Caller;
use super::state::HttpState;
use super::validation::{FieldName, malformed_body_error, parse_email, require};
use crate::domain::{
    Details, Error, NewUser, RecordId, RegistrationOutcome, UserValidationError, authorize_owner,
};

const EMAIL: FieldName = FieldName::new("email");

/// Typed fields of a registration body.
///
/// Other profile fields are stored as sent; a `role` is always dropped.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub email: Option<String>,
    #[serde(default, alias = "name")]
    pub display_name: Option<String>,
    #[serde(default, alias = "photoURL")]
    pub photo_url: Option<String>,
}

/// Result of a registration attempt.
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acknowledged: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_id: Option<RecordId>,
    pub inserted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RegistrationResponse {
    fn inserted(id: RecordId) -> Self {
        Self {
            acknowledged: Some(true),
            inserted_id: Some(id),
            inserted: true,
            message: None,
        }
    }

    fn already_exists() -> Self {
        Self {
            acknowledged: None,
            inserted_id: None,
            inserted: false,
            message: Some("user already exists".to_owned()),
        }
    }
}

fn map_user_validation_error(err: UserValidationError) -> Error {
    let (field, code) = match &err {
        UserValidationError::BlankField { field } => (*field, "blank_field"),
        UserValidationError::FieldTooLong { field, .. } => (*field, "field_too_long"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Record the caller on first sign-in. Repeat calls are harmless.
#[utoipa::path(
    post,
    path = "/users",
    request_body = RegisterUserRequest,
    responses(
        (status = 200, description = "Inserted, or already registered", body = RegistrationResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Missing credential", body = Error),
        (status = 403, description = "Email does not match the credential", body = Error),
        (status = 503, description = "Dependency unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "registerUser"
)]
#[post("/users")]
pub async fn register_user(
    state: web::Data<HttpState>,
    caller: Caller,
    payload: web::Json<Details>,
) -> ApiResult<web::Json<RegistrationResponse>> {
    let details = payload.into_inner();
    let RegisterUserRequest {
        email,
        display_name,
        photo_url,
    } = serde_json::from_value::<RegisterUserRequest>(Value::Object(details.clone()))
        .map_err(malformed_body_error)?;
    let email = parse_email(require(email, EMAIL)?, EMAIL)?;
    authorize_owner(caller.claim(), &email)?;

    let user = NewUser::try_new(email, display_name, photo_url, details)
        .map_err(map_user_validation_error)?
        .into_user(RecordId::random(), state.clock.utc());

    match state.users.insert_if_absent(&user).await? {
        RegistrationOutcome::Inserted(user) => {
            info!(user_id = %user.id, email = %user.email, "user registered");
            Ok(web::Json(RegistrationResponse::inserted(user.id)))
        }
        RegistrationOutcome::AlreadyExists => Ok(web::Json(RegistrationResponse::already_exists())),
    }
}
