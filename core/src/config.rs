use crate::errors::AccountsError;
use anyhow::{Context, Result, anyhow};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

pub const URL_ENV: &str = "SERVICE_ACCOUNTS_URL";
pub const PROTOCOL_ENV: &str = "SERVICE_ACCOUNTS_PROTOCOL";
pub const SKIP_SSL_VERIFICATION_ENV: &str = "SERVICE_ACCOUNTS_SKIP_SSL_VERIFICATION";

#[cfg(test)]
pub(crate) static CONFIG_ENV_TEST_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub version: Option<u32>,
    pub accounts: Option<AccountsServiceConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountsServiceConfig {
    pub url: Option<String>,
    pub protocol: Option<Protocol>,
    pub skip_ssl_verification: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Http,
    Https,
}

impl Protocol {
    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = AccountsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            _ => Err(AccountsError::InvalidProtocol(value.trim().to_string())),
        }
    }
}

/// Connection settings for the accounts service, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceConfig {
    pub url: String,
    pub protocol: Protocol,
    pub skip_ssl_verification: bool,
}

impl ServiceConfig {
    pub fn new(url: impl Into<String>, protocol: Protocol) -> Self {
        Self {
            url: url.into(),
            protocol,
            skip_ssl_verification: false,
        }
    }

    pub fn with_skip_ssl_verification(mut self, skip: bool) -> Self {
        self.skip_ssl_verification = skip;
        self
    }

    pub fn base_url(&self) -> String {
        normalize_base_url(&self.url, self.protocol)
    }

    /// Certificate and hostname checks are only ever disabled for https with
    /// the explicit skip flag set.
    pub fn insecure_tls(&self) -> bool {
        self.protocol == Protocol::Https && self.skip_ssl_verification
    }

    pub fn validate(&self) -> Result<(), AccountsError> {
        if self.url.trim().is_empty() {
            return Err(AccountsError::MissingServiceUrl);
        }
        Ok(())
    }
}

/// Values that take precedence over the environment and the config file,
/// typically command line flags.
#[derive(Debug, Clone, Default)]
pub struct ServiceOverrides {
    pub url: Option<String>,
    pub protocol: Option<Protocol>,
    pub skip_ssl_verification: Option<bool>,
}

impl Config {
    pub fn load(path_override: Option<&PathBuf>) -> Result<Self> {
        let path = path_override
            .cloned()
            .or_else(default_config_path)
            .ok_or(AccountsError::ConfigPathUnavailable)?;

        if !path.exists() {
            return Ok(Config::default());
        }

        let contents =
            fs::read_to_string(&path).with_context(|| format!("read config {}", path.display()))?;
        let config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn path(path_override: Option<&PathBuf>) -> Result<PathBuf> {
        path_override
            .cloned()
            .or_else(default_config_path)
            .ok_or_else(|| AccountsError::ConfigPathUnavailable.into())
    }

    pub fn save(&self, path_override: Option<&PathBuf>) -> Result<()> {
        let path = Config::path(path_override)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(self)?;
        fs::write(&path, data).with_context(|| format!("write config {}", path.display()))?;
        Ok(())
    }

    /// Merges overrides, environment and file values, in that order of
    /// precedence, falling back to an empty url over plain http.
    pub fn service_config(&self, overrides: &ServiceOverrides) -> Result<ServiceConfig> {
        let file = self.accounts.clone().unwrap_or_default();
        let env = env_overrides()?;

        let url = overrides
            .url
            .clone()
            .or(env.url)
            .or(file.url)
            .unwrap_or_default();
        let protocol = overrides
            .protocol
            .or(env.protocol)
            .or(file.protocol)
            .unwrap_or_default();
        let skip_ssl_verification = overrides
            .skip_ssl_verification
            .or(env.skip_ssl_verification)
            .or(file.skip_ssl_verification)
            .unwrap_or(false);

        Ok(ServiceConfig {
            url,
            protocol,
            skip_ssl_verification,
        })
    }
}

/// Prefixes `protocol://` unless the value already names a scheme and drops
/// trailing slashes so paths can be appended directly.
pub fn normalize_base_url(raw: &str, protocol: Protocol) -> String {
    let trimmed = raw.trim();
    let (scheme, rest) = match trimmed.split_once("://") {
        Some((scheme, rest)) if is_scheme(scheme) => (scheme, rest),
        _ => (protocol.as_str(), trimmed),
    };
    format!("{}://{}", scheme, rest.trim_end_matches('/'))
}

fn is_scheme(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn env_overrides() -> Result<ServiceOverrides> {
    let protocol = env_var_nonempty(&[PROTOCOL_ENV])
        .map(|raw| raw.parse::<Protocol>())
        .transpose()
        .with_context(|| format!("read {}", PROTOCOL_ENV))?;
    let skip_ssl_verification = env_var_nonempty(&[SKIP_SSL_VERIFICATION_ENV])
        .map(|raw| {
            parse_flag(&raw)
                .ok_or_else(|| anyhow!("invalid {} value: {}", SKIP_SSL_VERIFICATION_ENV, raw))
        })
        .transpose()?;

    Ok(ServiceOverrides {
        url: env_var_nonempty(&[URL_ENV]),
        protocol,
        skip_ssl_verification,
    })
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn env_var_nonempty(names: &[&str]) -> Option<String> {
    for name in names {
        if let Ok(value) = std::env::var(name) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

fn default_config_path() -> Option<PathBuf> {
    let home = BaseDirs::new()?.home_dir().to_path_buf();
    Some(home.join(".accounts-client").join("config.json"))
}
