//! Domain primitives, aggregates and services.
//!
//! Purpose: hold the strongly typed records (users, parcels, payments,
//! riders), the ownership and identity rules, and the payment reconciliation
//! workflow. Nothing in here knows about HTTP or SQL; adapters talk to it
//! through [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: error payload shared by every driving adapter.
//! - Email, RecordId: ownership key and record identifier newtypes.
//! - Claim, BearerToken: verified identity and the credential it came from.
//! - IdentityVerifier, PrivilegeDirectory, authorize_owner, owner_filter:
//!   access control.
//! - PaymentReconciliationService: the two-step payment workflow.

pub mod access;
pub mod auth;
pub mod details;
pub mod email;
pub mod error;
pub mod identity;
pub mod outcome;
pub mod parcel;
pub mod payment;
pub mod payments;
pub mod ports;
mod repository_errors;
pub mod record_id;
pub mod rider;
pub mod trace_id;
pub mod user;

pub use self::access::{AccessPolicy, OwnerFilter, PrivilegeDirectory, authorize_owner, owner_filter};
pub use self::auth::{BearerToken, Claim, CredentialError};
pub use self::details::Details;
pub use self::email::{Email, EmailValidationError};
pub use self::error::{Error, ErrorCode};
pub use self::identity::IdentityVerifier;
pub use self::outcome::{DeleteAck, InsertAck, UpdateAck};
pub use self::parcel::{
    NewParcel, Parcel, ParcelQuery, PaymentState, PaymentStatus, TransactionId,
    TransactionIdError,
};
pub use self::payment::{Amount, AmountError, LedgerStatus, Payment, PaymentMethod};
pub use self::payments::{IntentSettings, PaymentReconciliationService};
pub use self::record_id::{RecordId, RecordIdError};
pub use self::rider::{Rider, RiderApplication, RiderStatus, UnknownRiderStatus};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{NewUser, RegistrationOutcome, User, UserRole, UserValidationError};
