//! Test helpers for inbound HTTP components.

use std::collections::HashSet;
use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test, web};
use mockable::DefaultClock;

use super::health::HealthState;
use super::routes::configure;
use super::state::{HttpState, HttpStatePorts};
use crate::Trace;
use crate::domain::ports::{FixtureIdentityProvider, FixturePaymentGateway, PaymentGateway};
use crate::domain::{Email, IntentSettings, PaymentReconciliationService};
use crate::outbound::memory::{
    MemoryParcelRepository, MemoryPaymentRepository, MemoryRiderRepository, MemoryUserRepository,
};

pub fn email(raw: &str) -> Email {
    Email::parse(raw).expect("fixture email")
}

/// `Authorization` header that the fixture identity provider verifies as
/// `address`.
pub fn bearer(address: &str) -> (actix_web::http::header::HeaderName, String) {
    (
        AUTHORIZATION,
        format!("Bearer {}", FixtureIdentityProvider::token_for(&email(address))),
    )
}

/// In-memory collaborators behind one test application.
pub struct TestContext {
    pub users: Arc<MemoryUserRepository>,
    pub parcels: Arc<MemoryParcelRepository>,
    pub ledger: Arc<MemoryPaymentRepository>,
    pub riders: Arc<MemoryRiderRepository>,
    gateway: Arc<dyn PaymentGateway>,
    admin_emails: HashSet<Email>,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            users: Arc::new(MemoryUserRepository::new()),
            parcels: Arc::new(MemoryParcelRepository::new()),
            ledger: Arc::new(MemoryPaymentRepository::new()),
            riders: Arc::new(MemoryRiderRepository::new()),
            gateway: Arc::new(FixturePaymentGateway),
            admin_emails: HashSet::new(),
        }
    }

    pub fn with_admin(mut self, address: &str) -> Self {
        self.admin_emails.insert(email(address));
        self
    }

    pub fn with_gateway(mut self, gateway: Arc<dyn PaymentGateway>) -> Self {
        self.gateway = gateway;
        self
    }

    pub fn state(&self) -> web::Data<HttpState> {
        let payments = PaymentReconciliationService::new(
            self.parcels.clone(),
            self.ledger.clone(),
            self.gateway.clone(),
            Arc::new(DefaultClock),
            IntentSettings::default(),
        );
        web::Data::new(HttpState::new(
            HttpStatePorts {
                users: self.users.clone(),
                parcels: self.parcels.clone(),
                ledger: self.ledger.clone(),
                riders: self.riders.clone(),
                payments: Arc::new(payments),
                identity: Arc::new(FixtureIdentityProvider),
            },
            self.admin_emails.clone(),
            Arc::new(DefaultClock),
        ))
    }
}

/// Initialise the full routed application over `ctx`.
pub async fn init_app(
    ctx: &TestContext,
) -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    let health = web::Data::new(HealthState::new());
    health.mark_ready();
    test::init_service(
        App::new()
            .app_data(ctx.state())
            .app_data(health)
            .wrap(Trace)
            .configure(configure),
    )
    .await
}
