//! Registered customer accounts.
//!
//! A user row is created once, on first sign-in, and keyed by the verified
//! email. Roles are never taken from client input. Profile fields without a
//! typed column are kept as free-form details.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use super::details::{Details, strip_reserved};
use super::{Email, RecordId};

/// Maximum accepted length for free-text profile fields.
pub const PROFILE_FIELD_MAX: usize = 512;

/// Keys never kept in a user's details: server-owned fields and the typed
/// profile fields under every accepted spelling.
pub const USER_RESERVED_FIELDS: &[&str] = &[
    "_id",
    "id",
    "role",
    "createdAt",
    "email",
    "displayName",
    "name",
    "photoUrl",
    "photoURL",
];

/// Privilege level attached to a user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored role string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown user role: {0}")]
pub struct UnknownUserRole(pub String);

impl FromStr for UserRole {
    type Err = UnknownUserRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownUserRole(other.to_owned())),
        }
    }
}

/// Validation errors for registration payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("{field} must not be blank")]
    BlankField { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    FieldTooLong { field: &'static str, max: usize },
}

/// Stored user record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: RecordId,
    pub email: Email,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub details: Details,
}

/// Validated registration request.
///
/// # Examples
/// ```
/// use profast::domain::{Email, NewUser};
///
/// let email = Email::parse("ada@example.com").expect("email");
/// let user = NewUser::try_new(email, Some("  Ada  ".into()), None, Default::default())
///     .expect("valid");
/// assert_eq!(user.display_name(), Some("Ada"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    email: Email,
    display_name: Option<String>,
    photo_url: Option<String>,
    details: Details,
}

impl NewUser {
    /// Validate the typed profile fields. Reserved keys are dropped from
    /// `details`; everything else is kept as sent.
    pub fn try_new(
        email: Email,
        display_name: Option<String>,
        photo_url: Option<String>,
        mut details: Details,
    ) -> Result<Self, UserValidationError> {
        let removed = strip_reserved(&mut details, USER_RESERVED_FIELDS);
        if !removed.is_empty() {
            debug!(fields = ?removed, "ignoring reserved user fields");
        }
        Ok(Self {
            email,
            display_name: normalise_optional("displayName", display_name)?,
            photo_url: normalise_optional("photoUrl", photo_url)?,
            details,
        })
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn photo_url(&self) -> Option<&str> {
        self.photo_url.as_deref()
    }

    /// Materialise the row written on first registration.
    pub fn into_user(self, id: RecordId, created_at: DateTime<Utc>) -> User {
        User {
            id,
            email: self.email,
            display_name: self.display_name,
            photo_url: self.photo_url,
            role: UserRole::User,
            created_at,
            details: self.details,
        }
    }
}

fn normalise_optional(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<String>, UserValidationError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UserValidationError::BlankField { field });
    }
    if trimmed.chars().count() > PROFILE_FIELD_MAX {
        return Err(UserValidationError::FieldTooLong {
            field,
            max: PROFILE_FIELD_MAX,
        });
    }
    Ok(Some(trimmed.to_owned()))
}

/// Result of an idempotent registration.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationOutcome {
    Inserted(User),
    AlreadyExists,
}
