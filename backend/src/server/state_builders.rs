//! Builders wiring the Diesel adapters and providers into [`HttpState`].

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use profast::domain::PaymentReconciliationService;
use profast::inbound::http::state::{HttpState, HttpStatePorts};
use profast::outbound::persistence::{
    DieselParcelRepository, DieselPaymentRepository, DieselRiderRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Build the shared handler state over PostgreSQL-backed repositories.
///
/// The reconciliation service and the handlers share one parcel repository
/// and one ledger repository so both see the same pool.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let pool = &config.db_pool;
    let parcels = Arc::new(DieselParcelRepository::new(pool.clone()));
    let ledger = Arc::new(DieselPaymentRepository::new(pool.clone()));
    let clock = Arc::new(DefaultClock);

    let payments = PaymentReconciliationService::new(
        parcels.clone(),
        ledger.clone(),
        config.gateway.clone(),
        clock.clone(),
        config.intent_settings.clone(),
    );

    web::Data::new(HttpState::new(
        HttpStatePorts {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            parcels,
            ledger,
            riders: Arc::new(DieselRiderRepository::new(pool.clone())),
            payments: Arc::new(payments),
            identity: config.identity.clone(),
        },
        config.admin_emails.clone(),
        clock,
    ))
}
