//! Shared harness driving the full routed application over in-memory
//! adapters and the fixture identity and payment providers.

use std::collections::HashSet;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::{AUTHORIZATION, HeaderName};
use actix_web::{App, test, web};
use mockable::DefaultClock;
use serde_json::Value;

use profast::Trace;
use profast::domain::ports::{FixtureIdentityProvider, FixturePaymentGateway};
use profast::domain::{Email, IntentSettings, PaymentReconciliationService};
use profast::inbound::http::health::HealthState;
use profast::inbound::http::routes::configure;
use profast::inbound::http::state::{HttpState, HttpStatePorts};
use profast::outbound::memory::{
    MemoryParcelRepository, MemoryPaymentRepository, MemoryRiderRepository, MemoryUserRepository,
};

pub fn email(raw: &str) -> Email {
    Email::parse(raw).expect("fixture email")
}

/// `Authorization` header the fixture identity provider accepts for
/// `address`.
pub fn bearer(address: &str) -> (HeaderName, String) {
    (
        AUTHORIZATION,
        format!("Bearer {}", FixtureIdentityProvider::token_for(&email(address))),
    )
}

/// Status and decoded body of one call.
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
}

/// In-memory stores shared by every request sent through [`Harness::send`].
pub struct Harness {
    pub users: Arc<MemoryUserRepository>,
    pub parcels: Arc<MemoryParcelRepository>,
    pub ledger: Arc<MemoryPaymentRepository>,
    pub riders: Arc<MemoryRiderRepository>,
    admin_emails: HashSet<Email>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            users: Arc::new(MemoryUserRepository::new()),
            parcels: Arc::new(MemoryParcelRepository::new()),
            ledger: Arc::new(MemoryPaymentRepository::new()),
            riders: Arc::new(MemoryRiderRepository::new()),
            admin_emails: HashSet::new(),
        }
    }

    pub fn with_admin(mut self, address: &str) -> Self {
        self.admin_emails.insert(email(address));
        self
    }

    fn state(&self) -> web::Data<HttpState> {
        let payments = PaymentReconciliationService::new(
            self.parcels.clone(),
            self.ledger.clone(),
            Arc::new(FixturePaymentGateway),
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

    /// Build a fresh application over the shared stores and send `request`.
    pub fn send(&self, request: test::TestRequest) -> Reply {
        let state = self.state();
        actix_rt::System::new().block_on(async move {
            let health = web::Data::new(HealthState::new());
            health.mark_ready();
            let app = test::init_service(
                App::new()
                    .app_data(state)
                    .app_data(health)
                    .wrap(Trace)
                    .configure(configure),
            )
            .await;
            let response = test::call_service(&app, request.to_request()).await;
            let status = response.status();
            let bytes = test::read_body(response).await;
            let body = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes)
                    .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
            };
            Reply { status, body }
        })
    }
}
