//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod identity_provider;
mod parcel_repository;
mod payment_command;
mod payment_gateway;
mod payment_repository;
mod rider_repository;
mod user_repository;

#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{IdentityProvider, IdentityProviderError};
#[cfg(any(test, feature = "test-support"))]
pub use identity_provider::{FIXTURE_TOKEN_PREFIX, FixtureIdentityProvider};
#[cfg(test)]
pub use parcel_repository::MockParcelRepository;
pub use parcel_repository::{ParcelRepository, ParcelRepositoryError};
#[cfg(test)]
pub use payment_command::MockPaymentCommand;
pub use payment_command::{
    CreateIntentRequest, CreateIntentResponse, FinalizePaymentRequest, FinalizePaymentResponse,
    PaymentCommand,
};
#[cfg(test)]
pub use payment_gateway::MockPaymentGateway;
#[cfg(any(test, feature = "test-support"))]
pub use payment_gateway::FixturePaymentGateway;
pub use payment_gateway::{
    PaymentGateway, PaymentGatewayError, PaymentIntent, PaymentIntentRequest,
};
#[cfg(test)]
pub use payment_repository::MockPaymentRepository;
pub use payment_repository::{PaymentRepository, PaymentRepositoryError};
#[cfg(test)]
pub use rider_repository::MockRiderRepository;
pub use rider_repository::{RiderRepository, RiderRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
