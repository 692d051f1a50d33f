//! DTOs for the Identity Toolkit `accounts:lookup` endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::{Claim, Email};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LookupRequestDto<'a> {
    pub(super) id_token: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct LookupResponseDto {
    #[serde(default)]
    pub(super) users: Vec<AccountDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AccountDto {
    pub(super) local_id: String,
    pub(super) email: Option<String>,
    #[serde(default)]
    pub(super) disabled: bool,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorEnvelopeDto {
    pub(super) error: ErrorBodyDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorBodyDto {
    #[serde(default)]
    pub(super) message: String,
}

impl LookupResponseDto {
    /// Extract the claim of the single account the token belongs to.
    pub(super) fn into_claim(self) -> Result<Claim, String> {
        let account = self
            .users
            .into_iter()
            .next()
            .ok_or_else(|| "token does not belong to any account".to_owned())?;
        if account.disabled {
            return Err("account is disabled".to_owned());
        }
        let raw_email = account
            .email
            .ok_or_else(|| "account has no email address".to_owned())?;
        let email = Email::parse(raw_email).map_err(|err| err.to_string())?;
        Ok(Claim::new(email, account.local_id))
    }
}
