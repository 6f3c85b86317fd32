// Request pipeline stages
//
// Two pure stages around the transport:
//   outbound: `ApiRequest` + credential -> `HttpRequest`
//   inbound:  `HttpResponse` / `TransportFailure` -> unwrapped `data` or a
//             classified `Error`
// Neither stage touches session state; reacting to a classification is the
// caller's business (see `FailureObserver`).

use std::time::Duration;

use reqwest::Method;
use serde::Serialize;

use crate::error::Error;

/// Constant path prefix every endpoint lives under.
pub const API_PREFIX: &str = "/api";

/// A call as the domain modules describe it, before any transport concerns.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path below [`API_PREFIX`], e.g. `/posts/42`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// Overrides the client's default timeout for this call only.
    pub timeout: Option<Duration>,
    /// Failures are still returned, but observers are not told.
    pub silent: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            timeout: None,
            silent: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_owned(), value.to_string()));
        self
    }

    /// Add a query pair only when the value is present.
    pub fn query_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Attach a JSON body.
    pub fn json(mut self, body: &(impl Serialize + ?Sized)) -> Result<Self, Error> {
        self.body = Some(serde_json::to_value(body).map_err(Error::Encode)?);
        Ok(self)
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn silent(mut self) -> Self {
        self.silent = true;
        self
    }
}

// ── Outbound ────────────────────────────────────────────────────────

pub mod outbound {
    use std::time::Duration;

    use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
    use tracing::warn;
    use url::Url;

    use super::{API_PREFIX, ApiRequest};
    use crate::error::Error;
    use crate::transport::HttpRequest;

    /// Build the absolute endpoint URL: `{base}/api{path}`.
    pub fn endpoint_url(base_url: &Url, path: &str) -> Result<Url, Error> {
        let base = base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}{API_PREFIX}/{path}"))?)
    }

    /// Turn an `ApiRequest` into a wire request, attaching the bearer
    /// credential when one is present.
    ///
    /// A credential that cannot be encoded as a header value is skipped and
    /// the request goes out unauthenticated; the server decides access.
    pub fn prepare(
        request: ApiRequest,
        base_url: &Url,
        default_timeout: Duration,
        credential: Option<&str>,
    ) -> Result<HttpRequest, Error> {
        let mut url = endpoint_url(base_url, &request.path)?;
        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                pairs.append_pair(key, value);
            }
        }

        let mut headers = HeaderMap::new();
        if let Some(token) = credential {
            match HeaderValue::from_str(&format!("Bearer {token}")) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(e) => warn!(error = %e, "credential not attachable, sending unauthenticated"),
            }
        }

        Ok(HttpRequest {
            method: request.method,
            url,
            headers,
            body: request.body,
            timeout: request.timeout.unwrap_or(default_timeout),
        })
    }
}

// ── Inbound ─────────────────────────────────────────────────────────

pub mod inbound {
    use crate::envelope::{Envelope, ErrorBody};
    use crate::error::{Error, GENERIC_FAILURE};
    use crate::transport::{HttpResponse, TransportFailure};

    const BODY_PREVIEW: usize = 200;

    /// Classify a transport outcome.
    ///
    /// 2xx bodies must be envelopes; their `data` is returned unmodified on
    /// success. Everything else maps onto one `Error` variant.
    pub fn classify(
        path: &str,
        outcome: Result<HttpResponse, TransportFailure>,
    ) -> Result<serde_json::Value, Error> {
        let resp = match outcome {
            Ok(resp) => resp,
            Err(TransportFailure::Timeout(after)) => {
                return Err(Error::Timeout {
                    timeout_secs: after.as_secs(),
                });
            }
            Err(TransportFailure::Connect(message) | TransportFailure::Other(message)) => {
                return Err(Error::Network { message });
            }
        };

        match resp.status {
            200..=299 => unwrap_envelope(&resp.body),
            401 => Err(Error::SessionInvalid),
            403 => Err(Error::Forbidden),
            404 => Err(Error::NotFound {
                path: path.to_owned(),
            }),
            500..=599 => Err(Error::Server {
                status: resp.status,
            }),
            status => Err(Error::Http {
                status,
                message: body_message(&resp.body).unwrap_or_else(|| GENERIC_FAILURE.to_owned()),
            }),
        }
    }

    fn unwrap_envelope(body: &str) -> Result<serde_json::Value, Error> {
        let envelope: Envelope = serde_json::from_str(body).map_err(|e| {
            let preview: String = body.chars().take(BODY_PREVIEW).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.to_owned(),
            }
        })?;

        if envelope.is_success() {
            return Ok(envelope.data.unwrap_or(serde_json::Value::Null));
        }

        Err(Error::Api {
            code: envelope.code,
            message: envelope
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE.to_owned()),
        })
    }

    fn body_message(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
    }
}
