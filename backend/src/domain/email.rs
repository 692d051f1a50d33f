//! Email address newtype used as the ownership key across aggregates.
//!
//! Comparison is exact: the stored value is the identity provider's claim,
//! so two addresses differing only in case belong to different owners.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Validation errors returned by [`Email::parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailValidationError {
    #[error("email must not be empty")]
    Empty,
    #[error("email must not contain whitespace")]
    ContainsWhitespace,
    #[error("email must contain a single '@' between a local part and a domain")]
    Malformed,
    #[error("email must be at most {max} characters")]
    TooLong { max: usize },
}

/// Maximum accepted address length (RFC 5321 path limit).
pub const EMAIL_MAX: usize = 254;

/// A syntactically plausible email address.
///
/// # Examples
/// ```
/// use profast::domain::Email;
///
/// let email = Email::parse("ada@example.com").expect("valid email");
/// assert_eq!(email.as_str(), "ada@example.com");
/// assert!(Email::parse("not-an-email").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "ada@example.com")]
pub struct Email(String);

impl Email {
    pub fn parse(raw: impl Into<String>) -> Result<Self, EmailValidationError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(EmailValidationError::Empty);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(EmailValidationError::ContainsWhitespace);
        }
        if raw.chars().count() > EMAIL_MAX {
            return Err(EmailValidationError::TooLong { max: EMAIL_MAX });
        }
        match raw.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(raw))
            }
            _ => Err(EmailValidationError::Malformed),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = EmailValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}
