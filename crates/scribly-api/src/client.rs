// Blog API HTTP client
//
// Runs every call through the two pipeline stages around a `Transport`.
// All endpoint modules (auth, posts, comments, ...) are inherent methods
// implemented in separate files so this module stays about mechanics.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::de::{DeserializeOwned, IgnoredAny};
use url::Url;

use crate::error::Error;
use crate::pipeline::{ApiRequest, inbound, outbound};
use crate::transport::{DEFAULT_TIMEOUT, ReqwestTransport, Transport, TransportConfig};

/// Read-only view of the credential to attach to outbound calls.
pub trait CredentialSource: Send + Sync {
    fn credential(&self) -> Option<SecretString>;
}

/// Told about every failed, non-silent call, exactly once per call.
///
/// This is where a consumer decides what a classification means for it
/// (show a notice, drop the session, ...). The client itself never acts on
/// a failure beyond returning it.
pub trait FailureObserver: Send + Sync {
    fn on_failure(&self, error: &Error);
}

/// Client for the blog API.
///
/// Cheap to clone; clones share the transport, credential source and
/// observer.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    base_url: Url,
    timeout: Duration,
    credentials: Option<Arc<dyn CredentialSource>>,
    observer: Option<Arc<dyn FailureObserver>>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("credentials", &self.credentials.is_some())
            .field("observer", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client over `reqwest`.
    ///
    /// `base_url` is the server root (e.g. `http://localhost:8081`); the
    /// `/api` prefix is added per call.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = ReqwestTransport::new(transport)?;
        Ok(Self::with_transport(base_url, Arc::new(http)).with_timeout(transport.timeout))
    }

    /// Create a client over any transport (fakes in tests).
    pub fn with_transport(base_url: Url, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            base_url,
            timeout: DEFAULT_TIMEOUT,
            credentials: None,
            observer: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_credentials(mut self, source: Arc<dyn CredentialSource>) -> Self {
        self.credentials = Some(source);
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn FailureObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// The server root URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Default per-call timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    // ── Calls ────────────────────────────────────────────────────────

    /// Run a request and decode the unwrapped `data` into `T`.
    pub async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, Error> {
        let silent = request.silent;
        let result = self.dispatch(request).await.and_then(|data| decode(&data));

        if let Err(ref err) = result {
            if !silent {
                if let Some(ref observer) = self.observer {
                    observer.on_failure(err);
                }
            }
        }
        result
    }

    /// Run a request whose `data` carries nothing the caller needs.
    pub async fn call_unit(&self, request: ApiRequest) -> Result<(), Error> {
        let _: IgnoredAny = self.call(request).await?;
        Ok(())
    }

    async fn dispatch(&self, request: ApiRequest) -> Result<serde_json::Value, Error> {
        let path = request.path.clone();
        let credential = self.credentials.as_ref().and_then(|c| c.credential());
        let http = outbound::prepare(
            request,
            &self.base_url,
            self.timeout,
            credential.as_ref().map(|c| c.expose_secret()),
        )?;

        let outcome = self.transport.send(http).await;
        inbound::classify(&path, outcome)
    }
}

fn decode<T: DeserializeOwned>(data: &serde_json::Value) -> Result<T, Error> {
    T::deserialize(data).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: data.to_string(),
    })
}
