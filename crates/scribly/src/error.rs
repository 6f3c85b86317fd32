//! CLI error types with miette diagnostics.
//!
//! Maps API, session and config errors into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use scribly_api::Error as ApiError;
use scribly_config::ConfigError;
use scribly_core::{CoreError, StoreError};

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the server")]
    #[diagnostic(
        code(scribly::connection_failed),
        help(
            "Check that the server is running and the URL is right.\n\
             Try: scribly config show"
        )
    )]
    ConnectionFailed,

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(scribly::timeout),
        help("Increase timeout with --timeout or check server responsiveness.")
    )]
    Timeout { seconds: u64 },

    #[error("Could not set up TLS: {message}")]
    #[diagnostic(
        code(scribly::tls_error),
        help("Use --insecure (-k) to accept a self-signed certificate, or configure ca_cert in your profile.")
    )]
    TlsError { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Not logged in or session expired")]
    #[diagnostic(
        code(scribly::session_invalid),
        help("The stored session was cleared. Run: scribly login")
    )]
    SessionExpired,

    #[error("Not logged in")]
    #[diagnostic(code(scribly::not_logged_in), help("Run: scribly login"))]
    NotLoggedIn,

    #[error("'{target}' requires a login")]
    #[diagnostic(
        code(scribly::login_required),
        help("Redirected to {redirect}\nRun: scribly login --redirect '{target}'")
    )]
    LoginRequired { target: String, redirect: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(scribly::no_credentials),
        help(
            "Pass --username, set SCRIBLY_PASSWORD, or store a password with:\n\
             scribly config set-password --profile {profile}"
        )
    )]
    NoCredentials { profile: String },

    #[error("Permission denied")]
    #[diagnostic(code(scribly::forbidden))]
    Forbidden,

    // ── Resources ────────────────────────────────────────────────────
    #[error("Not found: {path}")]
    #[diagnostic(code(scribly::not_found))]
    NotFound { path: String },

    #[error("No view at '{path}'")]
    #[diagnostic(
        code(scribly::route_not_found),
        help("Known views: {known}")
    )]
    RouteNotFound { path: String, known: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Server rejected the request (code {code}): {message}")]
    #[diagnostic(code(scribly::rejected))]
    Rejected { code: i64, message: String },

    #[error("{message}")]
    #[diagnostic(code(scribly::api_error))]
    Api { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(scribly::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(scribly::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: scribly config init, or pass --server"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(scribly::config))]
    Config(Box<figment::Error>),

    #[error("Could not access the session file")]
    #[diagnostic(
        code(scribly::storage),
        help("Check permissions on the state directory, or point --state-dir elsewhere.")
    )]
    Storage(#[source] StoreError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(scribly::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render output: {0}")]
    #[diagnostic(code(scribly::render))]
    Render(String),

    #[error("Keyring error: {0}")]
    #[diagnostic(code(scribly::keyring))]
    Keyring(String),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Render(err.to_string())
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Render(err.to_string())
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::SessionExpired
            | Self::NotLoggedIn
            | Self::LoginRequired { .. }
            | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::RouteNotFound { .. } | Self::ProfileNotFound { .. } => {
                exit_code::NOT_FOUND
            }
            Self::Forbidden => exit_code::PERMISSION,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Failures of API calls. The session policy has already shown the
    /// user a notice for these, so only the help text is left to print.
    pub fn is_announced(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed
                | Self::Timeout { .. }
                | Self::SessionExpired
                | Self::Forbidden
                | Self::NotFound { .. }
                | Self::Rejected { .. }
                | Self::Api { .. }
        )
    }

    /// Print this error to stderr.
    pub fn report(self) {
        if self.is_announced() {
            if let Some(help) = self.help() {
                eprintln!("  {help}");
            }
        } else {
            eprintln!("{:?}", miette::Report::new(self));
        }
    }
}

// ── API / core → CliError mapping ────────────────────────────────────

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::SessionInvalid => Self::SessionExpired,
            ApiError::Forbidden => Self::Forbidden,
            ApiError::NotFound { path } => Self::NotFound { path },
            ApiError::Timeout { timeout_secs } => Self::Timeout {
                seconds: timeout_secs,
            },
            ApiError::Api { code, message } => Self::Rejected { code, message },
            ApiError::Tls(message) => Self::TlsError { message },
            ApiError::Network { message } => {
                tracing::debug!(%message, "network failure");
                Self::ConnectionFailed
            }
            other => {
                tracing::debug!(error = %other, "request failed");
                Self::Api {
                    message: other.user_message().to_owned(),
                }
            }
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Api(api) => api.into(),
            CoreError::Storage(store) => Self::Storage(store),
            CoreError::RouteNotFound { path } => Self::RouteNotFound {
                path,
                known: String::new(),
            },
            CoreError::InvalidLocation { target, reason } => Self::Validation {
                field: format!("path '{target}'"),
                reason,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Figment(err) => Self::Config(err),
            ConfigError::Keyring(err) => Self::Keyring(err.to_string()),
            ConfigError::Io(err) => Self::Io(err),
            ConfigError::Serialization(err) => Self::Render(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_invalid_maps_to_auth_exit() {
        let err = CliError::from(CoreError::Api(ApiError::SessionInvalid));
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }

    #[test]
    fn network_failures_map_to_connection_exit() {
        let err = CliError::from(ApiError::Network {
            message: "refused".into(),
        });
        assert_eq!(err.exit_code(), exit_code::CONNECTION);
        assert!(err.is_announced());
        assert!(!format!("{err:?}").contains("refused"));
        let err = CliError::from(ApiError::Timeout { timeout_secs: 3 });
        assert_eq!(err.exit_code(), exit_code::TIMEOUT);
    }

    #[test]
    fn other_statuses_keep_the_server_message() {
        let err = CliError::from(ApiError::Http {
            status: 418,
            message: "teapot".into(),
        });
        assert_eq!(err.to_string(), "teapot");
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn application_failures_are_rejections() {
        let err = CliError::from(ApiError::Api {
            code: 400,
            message: "Username taken".into(),
        });
        assert!(matches!(err, CliError::Rejected { code: 400, .. }));
        assert!(err.is_announced());
    }

    #[test]
    fn local_failures_get_a_full_report() {
        let err = CliError::from(ApiError::Tls("invalid CA cert".into()));
        assert!(!err.is_announced());
        assert!(!CliError::NotLoggedIn.is_announced());
        assert!(
            !CliError::LoginRequired {
                target: "/profile".into(),
                redirect: "/login?redirect=%2Fprofile".into(),
            }
            .is_announced()
        );
    }
}
