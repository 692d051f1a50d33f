//! Parcel handlers.
//!
//! ```text
//! GET    /parcels?email=ada@example.com
//! GET    /parcels/{id}
//! POST   /parcels {"title":"Books","weight":2.5}
//! DELETE /parcels/{id}
//! ```
//!
//! Every read and write is checked against the verified caller. A listing
//! without `email` shows the caller's own parcels, or every parcel to an
//! admin.

use actix_web::{delete, get, post, web};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use utoipa::IntoParams;

use super::ApiResult;
use super::access::Caller;
use super::state::HttpState;
use super::validation::{
    FieldName, invalid_value_error, parse_email, parse_record_id,
};
use crate::domain::{
    DeleteAck, Details, Email, Error, InsertAck, NewParcel, Parcel, ParcelQuery, RecordId,
    authorize_owner, owner_filter,
};

const CREATED_BY: FieldName = FieldName::new("createdBy");
const ID: FieldName = FieldName::new("id");

/// Owner filter accepted by owner-scoped listings.
#[derive(Debug, Deserialize, IntoParams)]
pub struct OwnerQuery {
    /// Owner email; must equal the caller's verified email.
    pub email: Option<String>,
}

/// Resolve the owner of a submission: the caller, unless `createdBy` names
/// the caller explicitly.
fn resolve_creator(caller: &Caller, details: &Details) -> Result<Email, Error> {
    match details.get("createdBy") {
        None | Some(Value::Null) => Ok(caller.claim().email().clone()),
        Some(Value::String(raw)) => {
            let requested = parse_email(raw.clone(), CREATED_BY)?;
            authorize_owner(caller.claim(), &requested)?;
            Ok(requested)
        }
        Some(_) => Err(invalid_value_error(CREATED_BY, "expected an email string")),
    }
}

/// List parcels, newest first.
#[utoipa::path(
    get,
    path = "/parcels",
    params(OwnerQuery),
    responses(
        (status = 200, description = "Parcels owned by the caller, newest first"),
        (status = 401, description = "Missing credential", body = Error),
        (status = 403, description = "Email does not match the credential", body = Error)
    ),
    tags = ["parcels"],
    operation_id = "listParcels"
)]
#[get("/parcels")]
pub async fn list_parcels(
    state: web::Data<HttpState>,
    caller: Caller,
    query: web::Query<OwnerQuery>,
) -> ApiResult<web::Json<Vec<Parcel>>> {
    let requested = query.email.as_deref();
    let privileged = match requested {
        Some(_) => false,
        None => state.privileges.is_privileged(caller.claim().email()).await?,
    };
    let filter = owner_filter(caller.claim(), requested, false, privileged)?;
    let parcels = state
        .parcels
        .list(&ParcelQuery {
            created_by: filter.into_owner(),
        })
        .await?;
    Ok(web::Json(parcels))
}

/// Fetch one parcel. A missing parcel is a `null` body.
#[utoipa::path(
    get,
    path = "/parcels/{id}",
    params(("id" = String, Path, description = "Parcel identifier")),
    responses(
        (status = 200, description = "The parcel, or null"),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 403, description = "Parcel belongs to someone else", body = Error)
    ),
    tags = ["parcels"],
    operation_id = "getParcel"
)]
#[get("/parcels/{id}")]
pub async fn get_parcel(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<String>,
) -> ApiResult<web::Json<Option<Parcel>>> {
    let id = parse_record_id(&path.into_inner(), ID)?;
    let Some(parcel) = state.parcels.find_by_id(&id).await? else {
        return Ok(web::Json(None));
    };
    if !parcel.is_owned_by(caller.claim().email())
        && !state.privileges.is_privileged(caller.claim().email()).await?
    {
        authorize_owner(caller.claim(), &parcel.created_by)?;
    }
    Ok(web::Json(Some(parcel)))
}

/// Create a parcel owned by the caller. Payment fields are server-owned.
#[utoipa::path(
    post,
    path = "/parcels",
    request_body = Object,
    responses(
        (status = 200, description = "Parcel stored", body = InsertAck),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "createdBy does not match the credential", body = Error)
    ),
    tags = ["parcels"],
    operation_id = "createParcel"
)]
#[post("/parcels")]
pub async fn create_parcel(
    state: web::Data<HttpState>,
    caller: Caller,
    payload: web::Json<Details>,
) -> ApiResult<web::Json<InsertAck>> {
    let details = payload.into_inner();
    let creator = resolve_creator(&caller, &details)?;
    let parcel =
        NewParcel::new(creator, details).into_parcel(RecordId::random(), state.clock.utc());
    state.parcels.insert(&parcel).await?;
    info!(parcel_id = %parcel.id, owner = %parcel.created_by, "parcel created");
    Ok(web::Json(InsertAck::new(parcel.id)))
}

/// Delete one of the caller's parcels.
#[utoipa::path(
    delete,
    path = "/parcels/{id}",
    params(("id" = String, Path, description = "Parcel identifier")),
    responses(
        (status = 200, description = "Deletion result; 0 when nothing matched", body = DeleteAck),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 403, description = "Parcel belongs to someone else", body = Error)
    ),
    tags = ["parcels"],
    operation_id = "deleteParcel"
)]
#[delete("/parcels/{id}")]
pub async fn delete_parcel(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeleteAck>> {
    let id = parse_record_id(&path.into_inner(), ID)?;
    let Some(parcel) = state.parcels.find_by_id(&id).await? else {
        return Ok(web::Json(DeleteAck::new(0)));
    };
    authorize_owner(caller.claim(), &parcel.created_by)?;
    let deleted = state.parcels.delete_by_id(&id).await?;
    info!(parcel_id = %id, deleted, "parcel deleted");
    Ok(web::Json(DeleteAck::new(deleted)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ParcelRepository;
    use crate::inbound::http::test_utils::{TestContext, bearer, email, init_app};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::{Duration, Utc};
    use rstest::rstest;
    use serde_json::json;

    async fn seed(ctx: &TestContext, owner: &str, title: &str, age_minutes: i64) -> Parcel {
        let details = json!({ "title": title })
            .as_object()
            .cloned()
            .expect("object");
        let parcel = NewParcel::new(email(owner), details).into_parcel(
            RecordId::random(),
            Utc::now() - Duration::minutes(age_minutes),
        );
        ctx.parcels.insert(&parcel).await.expect("seed parcel");
        parcel
    }

    fn get_as(address: &str, uri: &str) -> actix_http::Request {
        test::TestRequest::get()
            .uri(uri)
            .insert_header(bearer(address))
            .to_request()
    }

    #[actix_web::test]
    async fn listing_is_limited_to_the_caller_newest_first() {
        let ctx = TestContext::new();
        seed(&ctx, "ada@example.com", "older", 10).await;
        seed(&ctx, "bob@example.com", "bob's", 5).await;
        seed(&ctx, "ada@example.com", "newer", 1).await;
        let app = init_app(&ctx).await;

        for uri in ["/parcels?email=ada@example.com", "/parcels"] {
            let body: Vec<Value> =
                test::call_and_read_body_json(&app, get_as("ada@example.com", uri)).await;
            let titles: Vec<_> = body.iter().map(|p| p["title"].clone()).collect();
            assert_eq!(titles, vec![json!("newer"), json!("older")], "uri {uri}");
            assert!(body.iter().all(|p| p["createdBy"] == "ada@example.com"));
        }
    }

    #[actix_web::test]
    async fn admins_list_every_parcel() {
        let ctx = TestContext::new().with_admin("root@example.com");
        seed(&ctx, "ada@example.com", "a", 2).await;
        seed(&ctx, "bob@example.com", "b", 1).await;
        let app = init_app(&ctx).await;

        let body: Vec<Value> =
            test::call_and_read_body_json(&app, get_as("root@example.com", "/parcels")).await;

        assert_eq!(body.len(), 2);
    }

    #[rstest]
    #[case("ada@example.com", "/parcels?email=bob@example.com")]
    #[case("root@example.com", "/parcels?email=bob@example.com")]
    #[case("ada@example.com", "/parcels?email=not-an-email")]
    #[case("root@example.com", "/parcels?email=root")]
    #[actix_web::test]
    async fn mismatched_email_query_is_forbidden(#[case] caller: &str, #[case] uri: &str) {
        let ctx = TestContext::new().with_admin("root@example.com");
        seed(&ctx, "bob@example.com", "b", 1).await;
        let app = init_app(&ctx).await;

        let res = test::call_service(&app, get_as(caller, uri)).await;

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn missing_parcel_reads_as_null() {
        let ctx = TestContext::new();
        let app = init_app(&ctx).await;
        let uri = format!("/parcels/{}", RecordId::random());

        let res = test::call_service(&app, get_as("ada@example.com", &uri)).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await.as_ref(), b"null");
    }

    #[actix_web::test]
    async fn someone_elses_parcel_is_forbidden() {
        let ctx = TestContext::new();
        let parcel = seed(&ctx, "bob@example.com", "b", 1).await;
        let app = init_app(&ctx).await;

        let res = test::call_service(
            &app,
            get_as("ada@example.com", &format!("/parcels/{}", parcel.id)),
        )
        .await;

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[rstest]
    #[case("/parcels/not-an-id")]
    #[case("/parcels/507f1f77bcf86cd799439011")]
    #[actix_web::test]
    async fn malformed_ids_are_bad_requests(#[case] uri: &str) {
        let ctx = TestContext::new();
        let app = init_app(&ctx).await;

        let res = test::call_service(&app, get_as("ada@example.com", uri)).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn created_parcels_belong_to_the_caller_and_start_unpaid() {
        let ctx = TestContext::new();
        let app = init_app(&ctx).await;
        let req = test::TestRequest::post()
            .uri("/parcels")
            .insert_header(bearer("ada@example.com"))
            .set_json(json!({ "title": "Books", "payment_status": "paid", "weight": 2.5 }))
            .to_request();

        let ack: InsertAck = test::call_and_read_body_json(&app, req).await;

        let stored = ctx
            .parcels
            .find_by_id(&ack.inserted_id)
            .await
            .expect("lookup")
            .expect("stored");
        assert_eq!(stored.created_by, email("ada@example.com"));
        assert!(!stored.payment.is_paid());
        assert_eq!(stored.details.get("weight"), Some(&json!(2.5)));
    }

    #[actix_web::test]
    async fn forged_creator_is_forbidden() {
        let ctx = TestContext::new();
        let app = init_app(&ctx).await;
        let req = test::TestRequest::post()
            .uri("/parcels")
            .insert_header(bearer("ada@example.com"))
            .set_json(json!({ "title": "Books", "createdBy": "bob@example.com" }))
            .to_request();

        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert!(
            ctx.parcels
                .list(&ParcelQuery::default())
                .await
                .expect("list")
                .is_empty()
        );
    }

    #[actix_web::test]
    async fn deleting_checks_the_owner() {
        let ctx = TestContext::new();
        let parcel = seed(&ctx, "bob@example.com", "b", 1).await;
        let app = init_app(&ctx).await;
        let uri = format!("/parcels/{}", parcel.id);

        let refused = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&uri)
                .insert_header(bearer("ada@example.com"))
                .to_request(),
        )
        .await;
        let accepted: DeleteAck = test::call_and_read_body_json(
            &app,
            test::TestRequest::delete()
                .uri(&uri)
                .insert_header(bearer("bob@example.com"))
                .to_request(),
        )
        .await;
        let repeated: DeleteAck = test::call_and_read_body_json(
            &app,
            test::TestRequest::delete()
                .uri(&uri)
                .insert_header(bearer("bob@example.com"))
                .to_request(),
        )
        .await;

        assert_eq!(refused.status(), StatusCode::FORBIDDEN);
        assert_eq!(accepted, DeleteAck::new(1));
        assert_eq!(repeated, DeleteAck::new(0));
    }
}
