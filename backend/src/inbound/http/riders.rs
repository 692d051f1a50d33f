//! Rider application handlers.
//!
//! ```text
//! POST   /riders {"name":"Rahim","region":"Dhaka"}
//! GET    /riders?status=pending
//! DELETE /riders/{id}
//! PATCH  /riders/{id}
//! ```
//!
//! Removing and activating riders is reserved for administrators; the route
//! table enforces that before these handlers run.

use actix_web::{delete, get, patch, post, web};
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;

use super::ApiResult;
use super::access::Caller;
use super::state::HttpState;
use super::validation::{FieldName, invalid_value_error, parse_record_id};
use crate::domain::{
    DeleteAck, Details, Error, InsertAck, RecordId, Rider, RiderApplication, RiderStatus, UpdateAck,
};

const ID: FieldName = FieldName::new("id");
const STATUS: FieldName = FieldName::new("status");

#[derive(Debug, Deserialize, IntoParams)]
pub struct RiderQuery {
    /// `pending` or `active`; omit to list every rider.
    pub status: Option<String>,
}

/// Submit a rider application. The rider is stored `pending`.
#[utoipa::path(
    post,
    path = "/riders",
    request_body = Object,
    responses(
        (status = 200, description = "Application stored", body = InsertAck),
        (status = 400, description = "Malformed body", body = Error),
        (status = 401, description = "Missing credential", body = Error)
    ),
    tags = ["riders"],
    operation_id = "applyRider"
)]
#[post("/riders")]
pub async fn apply_rider(
    state: web::Data<HttpState>,
    caller: Caller,
    payload: web::Json<Details>,
) -> ApiResult<web::Json<InsertAck>> {
    let rider = RiderApplication::new(payload.into_inner())
        .into_rider(RecordId::random(), state.clock.utc());
    state.riders.insert(&rider).await?;
    info!(rider_id = %rider.id, applicant = %caller.claim().email(), "rider application stored");
    Ok(web::Json(InsertAck::new(rider.id)))
}

/// List riders, newest first.
#[utoipa::path(
    get,
    path = "/riders",
    params(RiderQuery),
    responses(
        (status = 200, description = "Riders, newest first"),
        (status = 400, description = "Unknown status", body = Error)
    ),
    tags = ["riders"],
    operation_id = "listRiders"
)]
#[get("/riders")]
pub async fn list_riders(
    state: web::Data<HttpState>,
    _caller: Caller,
    query: web::Query<RiderQuery>,
) -> ApiResult<web::Json<Vec<Rider>>> {
    let status = query
        .into_inner()
        .status
        .map(|raw| {
            raw.parse::<RiderStatus>()
                .map_err(|err| invalid_value_error(STATUS, err))
        })
        .transpose()?;
    let riders = state.riders.list(status).await?;
    Ok(web::Json(riders))
}

#[utoipa::path(
    delete,
    path = "/riders/{id}",
    params(("id" = String, Path, description = "Rider identifier")),
    responses(
        (status = 200, description = "Deletion result; 0 when nothing matched", body = DeleteAck),
        (status = 403, description = "Caller is not an administrator", body = Error)
    ),
    tags = ["riders"],
    operation_id = "deleteRider"
)]
#[delete("/riders/{id}")]
pub async fn delete_rider(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeleteAck>> {
    let id = parse_record_id(&path.into_inner(), ID)?;
    let deleted = state.riders.delete_by_id(&id).await?;
    info!(rider_id = %id, deleted, admin = %caller.claim().email(), "rider deleted");
    Ok(web::Json(DeleteAck::new(deleted)))
}

/// Approve a rider. Activating an active rider matches without modifying.
#[utoipa::path(
    patch,
    path = "/riders/{id}",
    params(("id" = String, Path, description = "Rider identifier")),
    responses(
        (status = 200, description = "Update result", body = UpdateAck),
        (status = 403, description = "Caller is not an administrator", body = Error)
    ),
    tags = ["riders"],
    operation_id = "activateRider"
)]
#[patch("/riders/{id}")]
pub async fn activate_rider(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<String>,
) -> ApiResult<web::Json<UpdateAck>> {
    let id = parse_record_id(&path.into_inner(), ID)?;
    let ack = state.riders.activate(&id).await?;
    info!(
        rider_id = %id,
        matched = ack.matched_count,
        modified = ack.modified_count,
        admin = %caller.claim().email(),
        "rider activation"
    );
    Ok(web::Json(ack))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{TestContext, bearer, init_app};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::{Value, json};

    const ADMIN: &str = "root@example.com";

    async fn apply(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
        >,
        body: Value,
    ) -> InsertAck {
        let req = test::TestRequest::post()
            .uri("/riders")
            .insert_header(bearer("rahim@example.com"))
            .set_json(body)
            .to_request();
        test::call_and_read_body_json(app, req).await
    }

    #[actix_web::test]
    async fn applications_are_stored_pending_whatever_the_body_says() {
        let ctx = TestContext::new();
        let app = init_app(&ctx).await;

        let ack = apply(&app, json!({ "name": "Rahim", "status": "active" })).await;

        let req = test::TestRequest::get()
            .uri("/riders")
            .insert_header(bearer("rahim@example.com"))
            .to_request();
        let riders: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(riders.len(), 1);
        assert_eq!(riders[0]["id"], ack.inserted_id.to_string());
        assert_eq!(riders[0]["status"], "pending");
        assert_eq!(riders[0]["name"], "Rahim");
    }

    #[rstest]
    #[case("/riders?status=pending", 1)]
    #[case("/riders?status=active", 1)]
    #[case("/riders", 2)]
    #[actix_web::test]
    async fn listing_filters_by_status(#[case] uri: &str, #[case] expected: usize) {
        let ctx = TestContext::new().with_admin(ADMIN);
        let app = init_app(&ctx).await;
        apply(&app, json!({ "name": "Rahim" })).await;
        let approved = apply(&app, json!({ "name": "Karim" })).await;
        let req = test::TestRequest::patch()
            .uri(&format!("/riders/{}", approved.inserted_id))
            .insert_header(bearer(ADMIN))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(bearer("rahim@example.com"))
            .to_request();
        let riders: Vec<Value> = test::call_and_read_body_json(&app, req).await;

        assert_eq!(riders.len(), expected);
    }

    #[actix_web::test]
    async fn unknown_status_filter_is_a_bad_request() {
        let ctx = TestContext::new();
        let app = init_app(&ctx).await;
        let req = test::TestRequest::get()
            .uri("/riders?status=retired")
            .insert_header(bearer("rahim@example.com"))
            .to_request();

        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn activation_is_idempotent() {
        let ctx = TestContext::new().with_admin(ADMIN);
        let app = init_app(&ctx).await;
        let ack = apply(&app, json!({ "name": "Rahim" })).await;
        let uri = format!("/riders/{}", ack.inserted_id);

        let mut results = Vec::new();
        for _ in 0..2 {
            let req = test::TestRequest::patch()
                .uri(&uri)
                .insert_header(bearer(ADMIN))
                .to_request();
            let body: UpdateAck = test::call_and_read_body_json(&app, req).await;
            results.push(body);
        }

        assert_eq!(results, vec![UpdateAck::new(1, 1), UpdateAck::new(1, 0)]);
    }

    #[rstest]
    #[case(test::TestRequest::patch())]
    #[case(test::TestRequest::delete())]
    #[actix_web::test]
    async fn non_admins_cannot_manage_riders(#[case] request: test::TestRequest) {
        let ctx = TestContext::new().with_admin(ADMIN);
        let app = init_app(&ctx).await;
        let ack = apply(&app, json!({ "name": "Rahim" })).await;

        let req = request
            .uri(&format!("/riders/{}", ack.inserted_id))
            .insert_header(bearer("rahim@example.com"))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert_eq!(ctx.riders.len().expect("riders"), 1);
    }

    #[actix_web::test]
    async fn admins_delete_riders() {
        let ctx = TestContext::new().with_admin(ADMIN);
        let app = init_app(&ctx).await;
        let ack = apply(&app, json!({ "name": "Rahim" })).await;
        let uri = format!("/riders/{}", ack.inserted_id);

        let mut counts = Vec::new();
        for _ in 0..2 {
            let req = test::TestRequest::delete()
                .uri(&uri)
                .insert_header(bearer(ADMIN))
                .to_request();
            let body: DeleteAck = test::call_and_read_body_json(&app, req).await;
            counts.push(body);
        }

        assert_eq!(counts, vec![DeleteAck::new(1), DeleteAck::new(0)]);
    }
}
