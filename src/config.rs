//! Runtime configuration loaded from the process environment.
//!
//! Database settings come from `DB_*` variables, the log filter from `LOGLEVEL`.
//! Call `dotenvy::dotenv()` first if a `.env` file should be honoured.

use crate::db::Backend;
use crate::error::StoreError;
use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use url::Url;

pub const DEFAULT_LOGLEVEL: &str = "info";

#[derive(Debug, Clone)]
pub struct Config {
    pub loglevel: String,
    pub db: DbConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, StoreError> {
        let loglevel = Figment::new()
            .merge(Serialized::default("loglevel", DEFAULT_LOGLEVEL))
            .merge(Env::raw().only(&["loglevel"]))
            .extract_inner::<String>("loglevel")?;

        Ok(Self {
            loglevel,
            db: DbConfig::from_env()?,
        })
    }
}

/// Connection parameters. All fields except `driver` are required.
#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    #[serde(default)]
    pub driver: Backend,
    pub host: String,
    #[serde(deserialize_with = "port_from_env")]
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
}

impl DbConfig {
    /// Read `DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USER`, `DB_PASSWORD` and the optional `DB_DRIVER`.
    /// Values are taken verbatim; `DB_PASSWORD=007` stays the string `"007"`.
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_figment(Figment::new().merge(raw_env("DB_")))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, StoreError> {
        Ok(figment.extract()?)
    }

    /// Driver-specific connection URL. Credentials are percent-encoded.
    pub fn connection_url(&self) -> Result<String, StoreError> {
        if self.driver == Backend::Sqlite {
            return Ok(format!("sqlite://{}?mode=rwc", self.name));
        }

        let mut url = Url::parse(&format!(
            "{}://{}:{}/{}",
            self.driver.scheme(),
            self.host,
            self.port,
            self.name
        ))?;
        url.set_username(&self.user)
            .map_err(|_| StoreError::InvalidUrl(format!("cannot set user on {}", self.host)))?;
        url.set_password(Some(&self.password))
            .map_err(|_| StoreError::InvalidUrl(format!("cannot set password on {}", self.host)))?;
        if self.driver == Backend::Postgres {
            url.query_pairs_mut().append_pair("sslmode", "disable");
        }
        Ok(url.to_string())
    }
}

/// Prefixed environment variables as untyped strings, keys lowercased with the prefix stripped.
/// `Env` would parse `123456` or `true` into numbers and booleans.
fn raw_env(prefix: &str) -> Serialized<BTreeMap<String, String>> {
    let vars = std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .filter_map(|(key, value)| {
            let field = key.strip_prefix(prefix)?;
            (!field.is_empty()).then(|| (field.to_ascii_lowercase(), value))
        })
        .collect();
    Serialized::defaults(vars)
}

fn port_from_env<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Number(u16),
        Text(String),
    }

    match Port::deserialize(deserializer)? {
        Port::Number(port) => Ok(port),
        Port::Text(text) => text
            .trim()
            .parse()
            .map_err(|e| serde::de::Error::custom(format!("invalid port `{text}`: {e}"))),
    }
}
