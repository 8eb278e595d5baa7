// ── Core error types ──
//
// Domain-level errors from invsync-core. Callers never see reqwest errors
// or raw JSON failures directly; the `From<invsync_api::Error>` impl
// translates transport-layer errors into these variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to record store at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Record store request timed out")]
    Timeout,

    // ── Store errors ─────────────────────────────────────────────────
    #[error("Record store error: {message}")]
    Store {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<invsync_api::Error> for CoreError {
    fn from(err: invsync_api::Error) -> Self {
        match err {
            invsync_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            invsync_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Store {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            invsync_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            invsync_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            invsync_api::Error::Api { status, message } => CoreError::Store {
                message,
                status: Some(status),
            },
            invsync_api::Error::Encoding(e) => {
                CoreError::Internal(format!("Encoding error: {e}"))
            }
            invsync_api::Error::Deserialization { message, body: _ } => CoreError::Store {
                message: format!("malformed response: {message}"),
                status: None,
            },
        }
    }
}
