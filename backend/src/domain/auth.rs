//! Bearer credentials and the verified identity claim derived from them.
//!
//! Keep header parsing outside handlers: [`BearerToken::from_authorization`]
//! validates the raw `Authorization` value before anything talks to the
//! identity provider.

use std::fmt;

use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::Email;

/// Reasons a request carries no usable bearer credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("authorization header is missing")]
    Missing,
    #[error("authorization scheme must be Bearer")]
    UnsupportedScheme,
    #[error("bearer token is empty")]
    EmptyToken,
}

/// Opaque bearer token. The raw value is zeroed on drop and never printed.
///
/// # Examples
/// ```
/// use profast::domain::BearerToken;
///
/// let token = BearerToken::from_authorization(Some("Bearer abc.def")).expect("token");
/// assert_eq!(token.expose(), "abc.def");
/// assert!(BearerToken::from_authorization(Some("Basic abc")).is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(Zeroizing<String>);

impl BearerToken {
    /// Parse the value of an `Authorization` header.
    ///
    /// The scheme is matched case-insensitively; the token is the remainder
    /// after the first space, trimmed.
    pub fn from_authorization(header: Option<&str>) -> Result<Self, CredentialError> {
        let header = header.ok_or(CredentialError::Missing)?;
        let trimmed = header.trim();
        if trimmed.is_empty() {
            return Err(CredentialError::Missing);
        }
        let (scheme, rest) = trimmed.split_once(' ').unwrap_or((trimmed, ""));
        if !scheme.eq_ignore_ascii_case("bearer") {
            return Err(CredentialError::UnsupportedScheme);
        }
        let token = rest.trim();
        if token.is_empty() {
            return Err(CredentialError::EmptyToken);
        }
        Ok(Self(Zeroizing::new(token.to_owned())))
    }

    /// Raw token text for handing to the identity provider.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Short SHA-256 prefix safe to log in place of the token.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        hex::encode(&digest[..6])
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BearerToken")
            .field(&self.fingerprint())
            .finish()
    }
}

/// Verified identity attached to an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    email: Email,
    uid: String,
}

impl Claim {
    pub fn new(email: Email, uid: impl Into<String>) -> Self {
        Self {
            email,
            uid: uid.into(),
        }
    }

    /// The ownership key every owner-scoped check compares against.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Provider-side account identifier.
    pub fn uid(&self) -> &str {
        &self.uid
    }
}
