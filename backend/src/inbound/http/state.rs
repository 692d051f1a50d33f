//! Shared HTTP adapter state.
//!
//! Handlers and the access-control middleware receive this state via
//! `actix_web::web::Data`, so they depend only on domain ports and services
//! and stay testable without I/O.

use std::collections::HashSet;
use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    IdentityProvider, ParcelRepository, PaymentCommand, PaymentRepository, RiderRepository,
    UserRepository,
};
use crate::domain::{Email, IdentityVerifier, PrivilegeDirectory};

/// Parameter object bundling the port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub users: Arc<dyn UserRepository>,
    pub parcels: Arc<dyn ParcelRepository>,
    pub ledger: Arc<dyn PaymentRepository>,
    pub riders: Arc<dyn RiderRepository>,
    pub payments: Arc<dyn PaymentCommand>,
    pub identity: Arc<dyn IdentityProvider>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserRepository>,
    pub parcels: Arc<dyn ParcelRepository>,
    pub ledger: Arc<dyn PaymentRepository>,
    pub riders: Arc<dyn RiderRepository>,
    pub payments: Arc<dyn PaymentCommand>,
    pub identity: IdentityVerifier,
    pub privileges: PrivilegeDirectory,
    /// Source of creation timestamps for new records.
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::collections::HashSet;
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use profast::domain::ports::{FixtureIdentityProvider, FixturePaymentGateway};
    /// use profast::domain::{IntentSettings, PaymentReconciliationService};
    /// use profast::inbound::http::state::{HttpState, HttpStatePorts};
    /// use profast::outbound::memory::{
    ///     MemoryParcelRepository, MemoryPaymentRepository, MemoryRiderRepository,
    ///     MemoryUserRepository,
    /// };
    ///
    /// let parcels = Arc::new(MemoryParcelRepository::new());
    /// let ledger = Arc::new(MemoryPaymentRepository::new());
    /// let payments = PaymentReconciliationService::new(
    ///     parcels.clone(),
    ///     ledger.clone(),
    ///     Arc::new(FixturePaymentGateway),
    ///     Arc::new(DefaultClock),
    ///     IntentSettings::default(),
    /// );
    /// let state = HttpState::new(
    ///     HttpStatePorts {
    ///         users: Arc::new(MemoryUserRepository::new()),
    ///         parcels,
    ///         ledger,
    ///         riders: Arc::new(MemoryRiderRepository::new()),
    ///         payments: Arc::new(payments),
    ///         identity: Arc::new(FixtureIdentityProvider),
    ///     },
    ///     HashSet::new(),
    ///     Arc::new(DefaultClock),
    /// );
    /// let _riders = state.riders.clone();
    /// ```
    pub fn new(ports: HttpStatePorts, admin_emails: HashSet<Email>, clock: Arc<dyn Clock>) -> Self {
        let HttpStatePorts {
            users,
            parcels,
            ledger,
            riders,
            payments,
            identity,
        } = ports;
        Self {
            privileges: PrivilegeDirectory::new(users.clone(), admin_emails),
            identity: IdentityVerifier::new(identity),
            users,
            parcels,
            ledger,
            riders,
            payments,
            clock,
        }
    }
}
