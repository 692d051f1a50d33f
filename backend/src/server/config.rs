//! HTTP server configuration object and helpers.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;

use profast::domain::ports::{IdentityProvider, PaymentGateway};
use profast::domain::{Email, IntentSettings};
use profast::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) identity: Arc<dyn IdentityProvider>,
    pub(crate) gateway: Arc<dyn PaymentGateway>,
    pub(crate) intent_settings: IntentSettings,
    pub(crate) admin_emails: HashSet<Email>,
}

impl ServerConfig {
    /// Construct a server configuration around the persistence pool and the
    /// two external providers.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        db_pool: DbPool,
        identity: Arc<dyn IdentityProvider>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            bind_addr,
            db_pool,
            identity,
            gateway,
            intent_settings: IntentSettings::default(),
            admin_emails: HashSet::new(),
        }
    }

    #[must_use]
    pub fn with_intent_settings(mut self, intent_settings: IntentSettings) -> Self {
        self.intent_settings = intent_settings;
        self
    }

    /// Grant the admin role to `admin_emails` on top of stored user roles.
    #[must_use]
    pub fn with_admin_emails(mut self, admin_emails: HashSet<Email>) -> Self {
        self.admin_emails = admin_emails;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
