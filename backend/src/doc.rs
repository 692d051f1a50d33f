//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every route served by the inbound layer, the request
//! and response bodies that carry a fixed shape, and the bearer credential
//! scheme. Parcel and rider documents are free-form and have no schema.
//!
//! Swagger UI serves the document in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::FinalizePaymentResponse;
use crate::domain::{
    DeleteAck, Error, ErrorCode, InsertAck, LedgerStatus, Payment, PaymentMethod, RiderStatus,
    UpdateAck,
};
use crate::inbound::http::payments::{
    CreatePaymentIntentBody, FinalizePaymentBody, PaymentIntentResponse,
};
use crate::inbound::http::users::{RegisterUserRequest, RegistrationResponse};

/// Enrich the generated document with the bearer credential scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some(
                        "ID token issued by the identity provider to the signed-in user.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Profast backend API",
        description = "Parcel booking, payment reconciliation and rider management."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::health::index,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::users::register_user,
        crate::inbound::http::parcels::list_parcels,
        crate::inbound::http::parcels::get_parcel,
        crate::inbound::http::parcels::create_parcel,
        crate::inbound::http::parcels::delete_parcel,
        crate::inbound::http::payments::create_payment_intent,
        crate::inbound::http::payments::finalize_payment,
        crate::inbound::http::payments::list_payments,
        crate::inbound::http::riders::apply_rider,
        crate::inbound::http::riders::list_riders,
        crate::inbound::http::riders::delete_rider,
        crate::inbound::http::riders::activate_rider,
    ),
    components(schemas(
        Error,
        ErrorCode,
        InsertAck,
        DeleteAck,
        UpdateAck,
        Payment,
        PaymentMethod,
        LedgerStatus,
        RiderStatus,
        FinalizePaymentResponse,
        RegisterUserRequest,
        RegistrationResponse,
        CreatePaymentIntentBody,
        PaymentIntentResponse,
        FinalizePaymentBody,
    )),
    tags(
        (name = "health", description = "Liveness and readiness probes"),
        (name = "users", description = "User registration"),
        (name = "parcels", description = "Owner-scoped parcel bookings"),
        (name = "payments", description = "Payment intents and the payment ledger"),
        (name = "riders", description = "Rider applications and approval")
    )
)]
pub struct ApiDoc;
