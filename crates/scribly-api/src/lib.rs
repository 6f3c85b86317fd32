// scribly-api: Async Rust client for the scribly blog API
//
// Every call goes through one pipeline: attach the bearer credential,
// send, then unwrap the `{code, message, data}` envelope or classify the
// failure. Session policy (what to do about a 401, which notice to show)
// belongs to callers via `CredentialSource` / `FailureObserver`.

pub mod auth;
pub mod client;
pub mod comments;
pub mod envelope;
pub mod error;
pub mod favorites;
pub mod likes;
pub mod models;
pub mod pipeline;
pub mod posts;
pub mod transport;

pub use client::{ApiClient, CredentialSource, FailureObserver};
pub use envelope::{Envelope, SUCCESS_CODE};
pub use error::{Error, ErrorKind};
pub use models::*;
pub use pipeline::{API_PREFIX, ApiRequest};
pub use transport::{
    DEFAULT_TIMEOUT, HttpRequest, HttpResponse, ReqwestTransport, TlsMode, Transport,
    TransportConfig, TransportFailure,
};
