// ── Runtime store configuration ──
//
// Describes *how* to reach the Grist document. Carries the credential and
// connection tuning, but never touches disk: invsync-config builds a
// `StoreConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed certs on a self-hosted instance).
    DangerAcceptInvalid,
}

/// Configuration for connecting to one Grist document.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Grist host URL (e.g., `https://docs.getgrist.com`).
    pub url: Url,
    /// Document id.
    pub doc_id: String,
    /// Bearer API key.
    pub api_key: SecretString,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
}

impl From<&TlsVerification> for invsync_api::TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => Self::System,
            TlsVerification::CustomCa(path) => Self::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => Self::DangerAcceptInvalid,
        }
    }
}
