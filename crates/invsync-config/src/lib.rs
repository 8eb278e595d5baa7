//! Configuration for invsync.
//!
//! Built-in field mappings, user TOML overrides, environment variables,
//! and translation to `invsync_core::{FieldMapping, StoreConfig}`. The
//! binary depends on this crate; the core never reads files itself.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use invsync_core::{AccountMapping, FieldMapping, StoreConfig, TlsVerification};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no option '{key}' in section [{section}]")]
    NoSuchOption { section: String, key: String },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no Grist API key configured (set grist.api_key or grist.api_key_env)")]
    NoCredentials,

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level configuration.
///
/// Apart from `[grist]`, every table is a free-form string section:
/// `[devices]` maps logical report keys to columns (keys starting with `_`
/// are settings such as `_table`), `[notes]` and `[accounts]` describe the
/// audit and token tables.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub grist: GristSettings,

    #[serde(flatten, deserialize_with = "lenient::sections")]
    pub sections: BTreeMap<String, BTreeMap<String, String>>,
}

/// Connection settings for the Grist document.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GristSettings {
    /// Host root URL (e.g. "https://docs.getgrist.com").
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub host: Option<String>,

    /// Document id.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub doc_id: Option<String>,

    /// API key (plaintext, prefer `api_key_env`).
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub api_key_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for GristSettings {
    fn default() -> Self {
        Self {
            host: None,
            doc_id: None,
            api_key: None,
            api_key_env: None,
            ca_cert: None,
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grist: GristSettings::default(),
            sections: default_sections(),
        }
    }
}

/// Stock mappings for a Grist inventory document.
fn default_sections() -> BTreeMap<String, BTreeMap<String, String>> {
    fn section(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    BTreeMap::from([
        (
            "devices".to_owned(),
            section(&[
                ("_table", "Devices"),
                ("_silent", "discover_log,account,status"),
                ("account", "Account"),
                ("status", "Status"),
                ("mac_primary", "MAC_Primary"),
                ("mac_secondary", "MAC_Secondary"),
                ("ip_primary", "IP_Primary"),
                ("ip_secondary", "IP_Secondary"),
                ("hostname", "Hostname"),
                ("discover_log", "Discover_Log"),
            ]),
        ),
        (
            "notes".to_owned(),
            section(&[("_table", "Notes"), ("device", "Device"), ("note", "Note")]),
        ),
        (
            "accounts".to_owned(),
            section(&[("_table", "Accounts"), ("token", "Token")]),
        ),
    ])
}

// ── Lenient scalars ─────────────────────────────────────────────────

/// Env values such as `INVSYNC_GRIST__DOC_ID=12345` reach serde as numbers;
/// string-typed options accept any scalar and keep its text.
mod lenient {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
        Bool(bool),
    }

    impl From<Scalar> for String {
        fn from(value: Scalar) -> Self {
            match value {
                Scalar::Text(s) => s,
                Scalar::Unsigned(n) => n.to_string(),
                Scalar::Signed(n) => n.to_string(),
                Scalar::Float(n) => n.to_string(),
                Scalar::Bool(b) => b.to_string(),
            }
        }
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(Option::<Scalar>::deserialize(d)?.map(String::from))
    }

    pub fn sections<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<BTreeMap<String, BTreeMap<String, String>>, D::Error> {
        let raw = BTreeMap::<String, BTreeMap<String, Scalar>>::deserialize(d)?;
        Ok(raw
            .into_iter()
            .map(|(name, section)| {
                let section = section
                    .into_iter()
                    .map(|(key, value)| (key, String::from(value)))
                    .collect();
                (name, section)
            })
            .collect())
    }
}

// ── Option lookup ───────────────────────────────────────────────────

impl Config {
    /// Option value, or `None` when the section or key is missing.
    ///
    /// An empty string is a value, not a missing option.
    pub fn lookup(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|s| s.get(key))
            .map(String::as_str)
    }

    /// Option value, failing with `NoSuchOption` when missing.
    pub fn get(&self, section: &str, key: &str) -> Result<&str, ConfigError> {
        self.lookup(section, key)
            .ok_or_else(|| ConfigError::NoSuchOption {
                section: section.into(),
                key: key.into(),
            })
    }

    /// Like `get`, but an empty value is also rejected.
    fn require(&self, section: &str, key: &str) -> Result<&str, ConfigError> {
        let value = self.get(section, key)?;
        if value.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: format!("{section}.{key}"),
                reason: "must not be empty".into(),
            });
        }
        Ok(value)
    }

    // ── Translation to core types ──────────────────────────────────

    /// Build the devices/notes field mapping.
    pub fn field_mapping(&self) -> Result<FieldMapping, ConfigError> {
        let mapping = FieldMapping::new(
            self.require("devices", "_table")?,
            self.require("notes", "_table")?,
            self.require("notes", "device")?,
            self.require("notes", "note")?,
        );

        let columns = self
            .sections
            .get("devices")
            .into_iter()
            .flatten()
            .filter(|(key, _)| !key.starts_with('_'))
            .map(|(key, column)| (key.clone(), column.trim().to_owned()));

        Ok(mapping
            .with_columns(columns)
            .with_silent(self.silent_keys()))
    }

    /// Logical keys listed in `devices._silent`.
    pub fn silent_keys(&self) -> BTreeSet<String> {
        self.lookup("devices", "_silent")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn account_mapping(&self) -> Result<AccountMapping, ConfigError> {
        Ok(AccountMapping {
            table: self.require("accounts", "_table")?.to_owned(),
            token_column: self.require("accounts", "token")?.to_owned(),
        })
    }

    /// Build a `StoreConfig` from `[grist]`.
    pub fn store_config(&self) -> Result<StoreConfig, ConfigError> {
        let grist = &self.grist;

        let host = grist.host.as_deref().ok_or_else(|| ConfigError::NoSuchOption {
            section: "grist".into(),
            key: "host".into(),
        })?;
        let url: url::Url = host.parse().map_err(|_| ConfigError::Validation {
            field: "grist.host".into(),
            reason: format!("invalid URL: {host}"),
        })?;

        let doc_id = grist
            .doc_id
            .clone()
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| ConfigError::NoSuchOption {
                section: "grist".into(),
                key: "doc_id".into(),
            })?;

        let tls = if grist.insecure {
            TlsVerification::DangerAcceptInvalid
        } else if let Some(ref ca_path) = grist.ca_cert {
            TlsVerification::CustomCa(ca_path.clone())
        } else {
            TlsVerification::SystemDefaults
        };

        Ok(StoreConfig {
            url,
            doc_id,
            api_key: resolve_api_key(grist)?,
            tls,
            timeout: Duration::from_secs(grist.timeout),
        })
    }

    /// Copy safe to print: the plaintext API key is masked.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.grist.api_key.is_some() {
            copy.grist.api_key = Some("********".into());
        }
        copy
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the API key: the variable named by `api_key_env`, then the
/// plaintext `api_key`.
pub fn resolve_api_key(grist: &GristSettings) -> Result<SecretString, ConfigError> {
    if let Some(val) = grist
        .api_key_env
        .as_deref()
        .and_then(|name| std::env::var(name).ok())
    {
        return Ok(SecretString::from(val));
    }

    if let Some(ref key) = grist.api_key {
        return Ok(SecretString::from(key.clone()));
    }

    Err(ConfigError::NoCredentials)
}

// ── Config file paths ───────────────────────────────────────────────

/// Resolve the config directory via XDG / platform conventions.
pub fn config_dir() -> PathBuf {
    ProjectDirs::from("com", "invsync", "invsync").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("invsync");
            p
        },
        |dirs| dirs.config_dir().to_path_buf(),
    )
}

/// User configuration file (connection settings and overrides).
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Site-wide mapping file, read before `config.toml`.
pub fn mappings_path() -> PathBuf {
    config_dir().join("mappings.toml")
}

// ── Config loading ──────────────────────────────────────────────────

/// Load from the canonical `mappings.toml` and `config.toml`, then the
/// environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&[mappings_path(), config_path()])
}

/// Load built-in defaults, then each file in order (missing files are
/// skipped), then `INVSYNC_*` variables (`INVSYNC_GRIST__HOST`,
/// `INVSYNC_DEVICES__HOSTNAME`, ...).
pub fn load_config_from<P: AsRef<Path>>(files: &[P]) -> Result<Config, ConfigError> {
    let figment = files.iter().fold(
        Figment::new().merge(Serialized::defaults(Config::default())),
        |figment, path| figment.merge(Toml::file(path.as_ref())),
    );
    // Only nested keys: INVSYNC_TOKEN and friends belong to the CLI.
    let figment = figment.merge(
        Env::prefixed("INVSYNC_")
            .filter(|key| key.as_str().contains("__"))
            .split("__"),
    );

    let config: Config = figment.extract()?;
    Ok(config)
}
