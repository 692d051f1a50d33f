//! Application settings loaded via OrthoConfig.
//!
//! Values come from the command line, `PROFAST_*` environment variables or a
//! configuration file. Required values are optional at load time and checked
//! by their accessors so every missing setting is reported by name.

use std::collections::HashSet;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Deserializer};
use url::Url;
use zeroize::Zeroizing;

use profast::domain::{Email, IntentSettings};
use profast::outbound::identity::DEFAULT_IDENTITY_ENDPOINT;
use profast::outbound::payments::DEFAULT_PAYMENT_ENDPOINT;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 4000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_OUTBOUND_TIMEOUT_SECS: u64 = 10;

/// Problems found while resolving settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("{name} is required (set PROFAST_{env})")]
    Missing { name: &'static str, env: &'static str },
    #[error("invalid {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

fn invalid(name: &'static str, message: impl ToString) -> SettingsError {
    SettingsError::Invalid {
        name,
        message: message.to_string(),
    }
}

/// Split a comma-separated list, dropping blank entries.
fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|item| !item.is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListValue {
    One(String),
    Many(Vec<String>),
}

/// Accept a list setting as either a sequence or a single string.
///
/// The environment layer yields a sequence only when the raw value contains
/// a comma, so a lone entry arrives as a plain string.
fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<ListValue>::deserialize(deserializer)?;
    Ok(value.map(|list| match list {
        ListValue::One(raw) => split_list(&raw).map(str::to_owned).collect(),
        ListValue::Many(items) => items,
    }))
}

/// Server, database and provider settings.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PROFAST")]
pub struct AppSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    #[ortho_config(default = DEFAULT_PORT)]
    pub port: u16,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = DEFAULT_DB_MAX_CONNECTIONS)]
    pub db_max_connections: u32,
    /// API key for the identity provider's account lookup.
    pub identity_api_key: Option<String>,
    pub identity_endpoint: Option<String>,
    /// Secret key for the payment provider.
    pub payment_secret_key: Option<String>,
    pub payment_endpoint: Option<String>,
    /// ISO currency code for new payment intents.
    pub payment_currency: Option<String>,
    /// Payment method types for new intents, comma-separated in the
    /// environment.
    #[serde(default, deserialize_with = "one_or_many")]
    pub payment_method_types: Option<Vec<String>>,
    /// Timeout applied to every call to the identity and payment providers.
    #[ortho_config(default = DEFAULT_OUTBOUND_TIMEOUT_SECS)]
    pub outbound_timeout_secs: u64,
    /// Emails granted the admin role, comma-separated in the environment.
    #[serde(default, deserialize_with = "one_or_many")]
    pub admin_emails: Option<Vec<String>>,
}

impl std::fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("db_max_connections", &self.db_max_connections)
            .field("identity_endpoint", &self.identity_endpoint)
            .field("payment_endpoint", &self.payment_endpoint)
            .field("payment_currency", &self.payment_currency)
            .field("payment_method_types", &self.payment_method_types)
            .field("outbound_timeout_secs", &self.outbound_timeout_secs)
            .field("admin_emails", &self.admin_emails)
            .finish_non_exhaustive()
    }
}

impl AppSettings {
    /// Socket address built from `host` and `port`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let ip: IpAddr = host.parse().map_err(|err| invalid("host", err))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::Missing {
                name: "database_url",
                env: "DATABASE_URL",
            })
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
    }

    pub fn identity_api_key(&self) -> Result<Zeroizing<String>, SettingsError> {
        secret(
            self.identity_api_key.as_deref(),
            "identity_api_key",
            "IDENTITY_API_KEY",
        )
    }

    pub fn identity_endpoint(&self) -> Result<Url, SettingsError> {
        let raw = self
            .identity_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_IDENTITY_ENDPOINT);
        Url::parse(raw).map_err(|err| invalid("identity_endpoint", err))
    }

    pub fn payment_secret_key(&self) -> Result<Zeroizing<String>, SettingsError> {
        secret(
            self.payment_secret_key.as_deref(),
            "payment_secret_key",
            "PAYMENT_SECRET_KEY",
        )
    }

    pub fn payment_endpoint(&self) -> Result<Url, SettingsError> {
        let raw = self
            .payment_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_PAYMENT_ENDPOINT);
        Url::parse(raw).map_err(|err| invalid("payment_endpoint", err))
    }

    /// Currency and method types forwarded with every new intent.
    pub fn intent_settings(&self) -> Result<IntentSettings, SettingsError> {
        let defaults = IntentSettings::default();
        let currency = match self.payment_currency.as_deref().map(str::trim) {
            None => defaults.currency,
            Some("") => return Err(invalid("payment_currency", "must not be blank")),
            Some(code) => code.to_ascii_lowercase(),
        };
        let payment_method_types = match self.payment_method_types.as_deref() {
            None => defaults.payment_method_types,
            Some(listed) => {
                let types: Vec<String> = trimmed_entries(listed).map(str::to_owned).collect();
                if types.is_empty() {
                    return Err(invalid("payment_method_types", "must list at least one type"));
                }
                types
            }
        };
        Ok(IntentSettings {
            currency,
            payment_method_types,
        })
    }

    pub fn outbound_timeout(&self) -> Duration {
        Duration::from_secs(self.outbound_timeout_secs)
    }

    /// The configured admin allow-list; empty when unset.
    pub fn admin_emails(&self) -> Result<HashSet<Email>, SettingsError> {
        self.admin_emails
            .as_deref()
            .map(|listed| {
                trimmed_entries(listed)
                    .map(|entry| Email::parse(entry).map_err(|err| invalid("admin_emails", err)))
                    .collect()
            })
            .unwrap_or_else(|| Ok(HashSet::new()))
    }
}

fn trimmed_entries(listed: &[String]) -> impl Iterator<Item = &str> {
    listed
        .iter()
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
}

fn secret(
    value: Option<&str>,
    name: &'static str,
    env: &'static str,
) -> Result<Zeroizing<String>, SettingsError> {
    value
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| Zeroizing::new(raw.to_owned()))
        .ok_or(SettingsError::Missing { name, env })
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 12] = [
        "PROFAST_HOST",
        "PROFAST_PORT",
        "PROFAST_DATABASE_URL",
        "PROFAST_DB_MAX_CONNECTIONS",
        "PROFAST_IDENTITY_API_KEY",
        "PROFAST_IDENTITY_ENDPOINT",
        "PROFAST_PAYMENT_SECRET_KEY",
        "PROFAST_PAYMENT_ENDPOINT",
        "PROFAST_PAYMENT_CURRENCY",
        "PROFAST_PAYMENT_METHOD_TYPES",
        "PROFAST_OUTBOUND_TIMEOUT_SECS",
        "PROFAST_ADMIN_EMAILS",
    ];

    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("profast")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(env_with(&[]));

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("bind addr"),
            "0.0.0.0:4000".parse().expect("socket addr")
        );
        assert_eq!(settings.db_max_connections(), 10);
        assert_eq!(settings.outbound_timeout(), Duration::from_secs(10));
        assert_eq!(
            settings.payment_endpoint().expect("endpoint").as_str(),
            DEFAULT_PAYMENT_ENDPOINT
        );
        assert_eq!(settings.intent_settings().expect("intent"), IntentSettings::default());
        assert!(settings.admin_emails().expect("admins").is_empty());
    }

    #[rstest]
    #[case("database_url")]
    #[case("identity_api_key")]
    #[case("payment_secret_key")]
    fn required_values_are_reported_by_name(#[case] name: &str) {
        let _guard = lock_env(env_with(&[]));

        let settings = load_from_empty_args();
        let err = match name {
            "database_url" => settings.database_url().map(|_| ()),
            "identity_api_key" => settings.identity_api_key().map(|_| ()),
            _ => settings.payment_secret_key().map(|_| ()),
        }
        .expect_err("missing value");

        assert!(err.to_string().contains(name), "{err}");
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("PROFAST_HOST", "127.0.0.1"),
            ("PROFAST_PORT", "8081"),
            ("PROFAST_DATABASE_URL", "postgres://localhost/profast"),
            ("PROFAST_PAYMENT_CURRENCY", "BDT"),
            ("PROFAST_PAYMENT_METHOD_TYPES", "card, link"),
            ("PROFAST_ADMIN_EMAILS", "root@example.com, ops@example.com"),
            ("PROFAST_IDENTITY_API_KEY", "key-123"),
        ]));

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("bind addr"),
            "127.0.0.1:8081".parse().expect("socket addr")
        );
        assert_eq!(
            settings.database_url().expect("url"),
            "postgres://localhost/profast"
        );
        let intent = settings.intent_settings().expect("intent");
        assert_eq!(intent.currency, "bdt");
        assert_eq!(intent.payment_method_types, vec!["card", "link"]);
        assert_eq!(settings.admin_emails().expect("admins").len(), 2);
        assert_eq!(settings.identity_api_key().expect("key").as_str(), "key-123");
    }

    #[rstest]
    fn single_list_entries_load_without_a_comma() {
        let _guard = lock_env(env_with(&[
            ("PROFAST_PAYMENT_METHOD_TYPES", "card"),
            ("PROFAST_ADMIN_EMAILS", "root@example.com"),
        ]));

        let settings = load_from_empty_args();

        assert_eq!(
            settings.intent_settings().expect("intent").payment_method_types,
            vec!["card"]
        );
        let admins = settings.admin_emails().expect("admins");
        assert!(admins.contains(&Email::parse("root@example.com").expect("email")));
        assert_eq!(admins.len(), 1);
    }

    #[rstest]
    fn debug_output_hides_secrets() {
        let _guard = lock_env(env_with(&[
            ("PROFAST_PAYMENT_SECRET_KEY", "sk_live_hidden"),
            ("PROFAST_DATABASE_URL", "postgres://user:hunter2@db/profast"),
        ]));

        let rendered = format!("{:?}", load_from_empty_args());

        assert!(!rendered.contains("sk_live_hidden"));
        assert!(!rendered.contains("hunter2"));
    }

    #[rstest]
    #[case("PROFAST_HOST", "not-an-ip")]
    #[case("PROFAST_ADMIN_EMAILS", "root@example.com, nope")]
    #[case("PROFAST_PAYMENT_METHOD_TYPES", " , ")]
    fn malformed_values_are_invalid(#[case] var: &str, #[case] value: &str) {
        let _guard = lock_env(env_with(&[(var, value)]));

        let settings = load_from_empty_args();
        let failed = settings.bind_addr().is_err()
            || settings.admin_emails().is_err()
            || settings.intent_settings().is_err();

        assert!(failed);
    }
}
