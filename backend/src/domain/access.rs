//! Ownership and privilege checks.
//!
//! Every owner-scoped operation compares the verified claim against the
//! owner key it is about to read or write. Comparison is exact.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};

use super::ports::UserRepository;
use super::{Claim, Email, Error, UserRole};

/// Per-route access requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessPolicy {
    /// No credential needed.
    Public,
    /// Any verified caller.
    Authenticated,
    /// A verified caller; the handler compares the claim with the owner of
    /// the data it touches.
    OwnerScoped,
    /// A verified caller holding the admin role.
    Privileged,
}

impl AccessPolicy {
    pub fn requires_identity(self) -> bool {
        !matches!(self, Self::Public)
    }

    pub fn requires_privilege(self) -> bool {
        matches!(self, Self::Privileged)
    }
}

/// Allow only when `owner` is the caller.
///
/// # Examples
/// ```
/// use profast::domain::{Claim, Email, ErrorCode, authorize_owner};
///
/// let ada = Email::parse("ada@example.com").expect("email");
/// let bob = Email::parse("bob@example.com").expect("email");
/// let claim = Claim::new(ada.clone(), "uid");
///
/// assert!(authorize_owner(&claim, &ada).is_ok());
/// let err = authorize_owner(&claim, &bob).expect_err("other owner");
/// assert_eq!(err.code(), ErrorCode::Forbidden);
/// ```
pub fn authorize_owner(claim: &Claim, owner: &Email) -> Result<(), Error> {
    if claim.email() == owner {
        return Ok(());
    }
    warn!(
        caller = %claim.email(),
        owner = %owner,
        "ownership check failed"
    );
    Err(Error::forbidden("forbidden access"))
}

/// Owner restriction applied to a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerFilter {
    Owner(Email),
    /// Unrestricted; only reachable by privileged callers.
    Everyone,
}

impl OwnerFilter {
    pub fn into_owner(self) -> Option<Email> {
        match self {
            Self::Owner(email) => Some(email),
            Self::Everyone => None,
        }
    }
}

/// Resolve the owner filter of a listing request.
///
/// `requested` is the raw query value. Anything other than the caller's own
/// email is refused before any data is read, even for privileged callers; a
/// malformed address can never match. When no email is requested, `required`
/// listings are refused too; otherwise the caller sees their own records, or
/// everything when `privileged`.
pub fn owner_filter(
    claim: &Claim,
    requested: Option<&str>,
    required: bool,
    privileged: bool,
) -> Result<OwnerFilter, Error> {
    match requested {
        Some(raw) if raw == claim.email().as_str() => Ok(OwnerFilter::Owner(claim.email().clone())),
        Some(raw) => {
            warn!(caller = %claim.email(), requested = raw, "owner filter mismatch");
            Err(Error::forbidden("forbidden access"))
        }
        None if required => {
            info!(caller = %claim.email(), "owner filter missing on scoped listing");
            Err(Error::forbidden("forbidden access"))
        }
        None if privileged => Ok(OwnerFilter::Everyone),
        None => Ok(OwnerFilter::Owner(claim.email().clone())),
    }
}

/// Decides whether a caller holds the admin role.
///
/// A caller is privileged when their user row has role `admin` or their
/// email appears in the configured allow-list.
#[derive(Clone)]
pub struct PrivilegeDirectory {
    users: Arc<dyn UserRepository>,
    admin_emails: Arc<HashSet<Email>>,
}

impl PrivilegeDirectory {
    pub fn new(users: Arc<dyn UserRepository>, admin_emails: HashSet<Email>) -> Self {
        Self {
            users,
            admin_emails: Arc::new(admin_emails),
        }
    }

    pub async fn is_privileged(&self, email: &Email) -> Result<bool, Error> {
        if self.admin_emails.contains(email) {
            return Ok(true);
        }
        let user = self.users.find_by_email(email).await?;
        Ok(user.is_some_and(|user| user.role == UserRole::Admin))
    }

    /// Fail with `forbidden` unless the caller is privileged.
    pub async fn require_privileged(&self, claim: &Claim) -> Result<(), Error> {
        if self.is_privileged(claim.email()).await? {
            return Ok(());
        }
        info!(caller = %claim.email(), "privileged route refused");
        Err(Error::forbidden("admin access required"))
    }
}
