//! Access-control middleware and the verified-caller extractor.
//!
//! [`AccessControl`] looks up the policy of the matched route in
//! [`ROUTE_POLICIES`], verifies the bearer credential once, checks the admin
//! role where required and stores the resulting [`Claim`] in the request
//! extensions. Handlers read it back with [`Caller`]; ownership checks
//! against query, body or stored owners stay in the handlers.

use std::future::{Ready, ready as ready_result};
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpMessage, HttpRequest, web};
use futures_util::future::{LocalBoxFuture, Ready as FutReady, ready};
use tracing::{debug, error, warn};

use super::routes::policy_for;
use super::state::HttpState;
use crate::domain::{Claim, Error};

/// Middleware enforcing the declared policy of every matched route.
///
/// Requests whose path matches no registered route pass through untouched so
/// the router can answer 404. A registered pattern without a policy for the
/// request method is refused with `forbidden`.
#[derive(Clone, Copy, Default)]
pub struct AccessControl;

impl<S, B> Transform<S, ServiceRequest> for AccessControl
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = AccessControlMiddleware<S>;
    type Future = FutReady<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessControlMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Service wrapper produced by [`AccessControl`].
pub struct AccessControlMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AccessControlMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        Box::pin(async move {
            match admit(&req).await {
                Ok(Some(claim)) => {
                    req.extensions_mut().insert(claim);
                }
                Ok(None) => {}
                Err(error) => return Ok(req.error_response(error).map_into_right_body()),
            }
            service
                .call(req)
                .await
                .map(ServiceResponse::map_into_left_body)
        })
    }
}

/// Decide whether `req` may reach its handler, returning the verified claim
/// for non-public routes.
async fn admit(req: &ServiceRequest) -> Result<Option<Claim>, Error> {
    let Some(pattern) = req.match_pattern() else {
        return Ok(None);
    };
    let Some(policy) = policy_for(req.method(), &pattern) else {
        warn!(method = %req.method(), %pattern, "route has no access policy");
        return Err(Error::forbidden("forbidden access"));
    };
    if !policy.requires_identity() {
        return Ok(None);
    }

    let state = req.app_data::<web::Data<HttpState>>().ok_or_else(|| {
        error!("HTTP state missing from application data");
        Error::internal("HTTP state is not configured")
    })?;
    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let claim = state.identity.verify(authorization).await?;
    if policy.requires_privilege() {
        state.privileges.require_privileged(&claim).await?;
    }
    debug!(caller = %claim.email(), ?policy, %pattern, "request admitted");
    Ok(Some(claim))
}

/// Verified identity of the caller, extracted from the request extensions.
///
/// Only available on routes whose policy requires identity; elsewhere the
/// extractor fails with `unauthorized`.
#[derive(Debug, Clone)]
pub struct Caller(pub Claim);

impl Caller {
    pub fn claim(&self) -> &Claim {
        &self.0
    }

    pub fn into_claim(self) -> Claim {
        self.0
    }
}

impl FromRequest for Caller {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready_result(
            req.extensions()
                .get::<Claim>()
                .cloned()
                .map(Caller)
                .ok_or_else(|| Error::unauthorized("unauthorized access")),
        )
    }
}
