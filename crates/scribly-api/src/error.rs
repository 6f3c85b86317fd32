use strum::{Display, IntoStaticStr};
use thiserror::Error;

/// Fallback notice when the server gave no usable message.
pub const GENERIC_FAILURE: &str = "Request failed";
pub const SESSION_INVALID_NOTICE: &str = "Not logged in or session expired";
pub const FORBIDDEN_NOTICE: &str = "You do not have permission to do that";
pub const NOT_FOUND_NOTICE: &str = "The requested resource does not exist";
pub const SERVER_ERROR_NOTICE: &str = "Server error, please try again later";
pub const NETWORK_ERROR_NOTICE: &str = "Network error, please check your connection";

/// Top-level error type for the `scribly-api` crate.
///
/// Every failed call ends up as exactly one of these variants. The variant
/// is the classification; [`Error::user_message`] is what a person sees and
/// `Display` carries the technical detail for logs.
#[derive(Debug, Error)]
pub enum Error {
    // ── Application ─────────────────────────────────────────────────
    /// Well-formed envelope whose `code` is not the success sentinel.
    #[error("API rejected the request (code {code}): {message}")]
    Api { code: i64, message: String },

    // ── HTTP status ─────────────────────────────────────────────────
    /// HTTP 401: credential missing, expired or revoked.
    #[error("Session invalid (HTTP 401)")]
    SessionInvalid,

    /// HTTP 403: authenticated but not allowed.
    #[error("Forbidden (HTTP 403)")]
    Forbidden,

    /// HTTP 404.
    #[error("Not found (HTTP 404): {path}")]
    NotFound { path: String },

    /// HTTP 5xx.
    #[error("Server error (HTTP {status})")]
    Server { status: u16 },

    /// Any other non-success status. `message` comes from the body when
    /// the server sent one.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// No response at all (DNS, refused connection, reset).
    #[error("Network error: {message}")]
    Network { message: String },

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// The request body could not be encoded as JSON.
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The body was not an envelope, or `data` did not match the
    /// expected shape.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

/// Failure classification, stable across variants that share a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum ErrorKind {
    Application,
    SessionInvalid,
    Forbidden,
    NotFound,
    ServerError,
    NetworkError,
    RequestFailed,
    InvalidResponse,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Api { .. } => ErrorKind::Application,
            Self::Http { .. } | Self::InvalidUrl(_) | Self::Tls(_) | Self::Encode(_) => {
                ErrorKind::RequestFailed
            }
            Self::SessionInvalid => ErrorKind::SessionInvalid,
            Self::Forbidden => ErrorKind::Forbidden,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Server { .. } => ErrorKind::ServerError,
            Self::Network { .. } | Self::Timeout { .. } => ErrorKind::NetworkError,
            Self::Deserialization { .. } => ErrorKind::InvalidResponse,
        }
    }

    /// The text shown to the user for this failure.
    ///
    /// Server-provided messages are used verbatim; everything else maps to a
    /// fixed notice so raw technical errors never reach the user.
    pub fn user_message(&self) -> &str {
        match self {
            Self::Api { message, .. } | Self::Http { message, .. } => message,
            Self::SessionInvalid => SESSION_INVALID_NOTICE,
            Self::Forbidden => FORBIDDEN_NOTICE,
            Self::NotFound { .. } => NOT_FOUND_NOTICE,
            Self::Server { .. } => SERVER_ERROR_NOTICE,
            Self::Network { .. } | Self::Timeout { .. } => NETWORK_ERROR_NOTICE,
            Self::InvalidUrl(_) | Self::Tls(_) | Self::Encode(_) | Self::Deserialization { .. } => {
                GENERIC_FAILURE
            }
        }
    }

    /// Returns `true` if the server no longer accepts the credential.
    pub fn is_session_invalid(&self) -> bool {
        matches!(self, Self::SessionInvalid)
    }

    /// Returns `true` if no response was received.
    pub fn is_network(&self) -> bool {
        self.kind() == ErrorKind::NetworkError
    }

    /// The envelope code for application-level failures.
    pub fn api_code(&self) -> Option<i64> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_are_kebab_case() {
        assert_eq!(ErrorKind::SessionInvalid.to_string(), "session-invalid");
        assert_eq!(ErrorKind::NetworkError.to_string(), "network-error");
        let name: &'static str = ErrorKind::ServerError.into();
        assert_eq!(name, "server-error");
    }

    #[test]
    fn server_messages_pass_through_verbatim() {
        let err = Error::Api {
            code: 409,
            message: "username already taken".into(),
        };
        assert_eq!(err.user_message(), "username already taken");
        assert_eq!(err.kind(), ErrorKind::Application);
        assert_eq!(err.api_code(), Some(409));
    }

    #[test]
    fn transport_details_stay_out_of_notices() {
        let err = Error::Network {
            message: "tcp connect error: Connection refused (os error 111)".into(),
        };
        assert_eq!(err.user_message(), NETWORK_ERROR_NOTICE);
        assert!(err.to_string().contains("Connection refused"));

        let timeout = Error::Timeout { timeout_secs: 10 };
        assert!(timeout.is_network());
        assert_eq!(timeout.user_message(), NETWORK_ERROR_NOTICE);
    }
}
