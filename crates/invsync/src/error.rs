//! CLI error types with miette diagnostics.
//!
//! Maps core and config errors into user-facing errors with help text.

use miette::Diagnostic;
use thiserror::Error;

use invsync_config::ConfigError;
use invsync_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to Grist at {url}")]
    #[diagnostic(
        code(invsync::connection_failed),
        help(
            "Check that the Grist host is reachable.\n\
             URL: {url}\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to Grist timed out")]
    #[diagnostic(
        code(invsync::timeout),
        help("Increase grist.timeout or check the host's responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Grist rejected the API key: {message}")]
    #[diagnostic(
        code(invsync::auth_failed),
        help("Verify grist.api_key, or the variable named by grist.api_key_env.")
    )]
    AuthFailed { message: String },

    #[error("No Grist API key configured")]
    #[diagnostic(
        code(invsync::no_credentials),
        help(
            "Set grist.api_key_env to the name of a variable holding the key,\n\
             or grist.api_key in {path}."
        )
    )]
    NoCredentials { path: String },

    #[error("Invalid token")]
    #[diagnostic(
        code(invsync::invalid_token),
        help("No row in the accounts table carries this token.")
    )]
    InvalidToken,

    // ── Store ────────────────────────────────────────────────────────
    #[error("Record store error: {message}")]
    #[diagnostic(code(invsync::store))]
    Store { message: String },

    // ── Validation / configuration ───────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(invsync::validation))]
    Validation { field: String, reason: String },

    #[error("Missing option '{key}' in section [{section}]")]
    #[diagnostic(
        code(invsync::no_such_option),
        help("Add it to {path} or set INVSYNC_{env_section}__{env_key}.")
    )]
    MissingOption {
        section: String,
        key: String,
        path: String,
        env_section: String,
        env_key: String,
    },

    #[error(transparent)]
    #[diagnostic(code(invsync::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON report: {0}")]
    #[diagnostic(
        code(invsync::json),
        help("The report must be a single JSON object.")
    )]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Timeout => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } | Self::InvalidToken => {
                exit_code::AUTH
            }
            Self::Validation { .. } | Self::MissingOption { .. } | Self::Json(_) => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::Timeout => CliError::Timeout,
            CoreError::Store { message, status } => CliError::Store {
                message: match status {
                    Some(code) => format!("{message} (HTTP {code})"),
                    None => message,
                },
            },
            CoreError::Config { message } => CliError::Validation {
                field: "mapping".into(),
                reason: message,
            },
            CoreError::Internal(message) => CliError::Store { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        let path = invsync_config::config_path().display().to_string();
        match err {
            ConfigError::NoSuchOption { section, key } => CliError::MissingOption {
                env_section: section.to_uppercase(),
                env_key: key.to_uppercase(),
                section,
                key,
                path,
            },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials => CliError::NoCredentials { path },
            other => CliError::Config(other),
        }
    }
}
