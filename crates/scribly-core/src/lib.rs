//! Session layer between `scribly-api` and whatever presents it.
//!
//! - **[`Session`]**: facade for login, register, logout and profile
//!   updates. Owns the API client and wires it to the session state and the
//!   failure policy.
//! - **[`SessionState`]**: the credential + identity pair in memory,
//!   mirrored through a [`CredentialStore`] to any [`KeyValueStore`].
//! - **[`Router`]**: current location and title; runs the navigation
//!   guard before every view change.
//! - **[`Notifier`]**: sink for the short user-facing notices.

pub mod config;
pub mod error;
pub mod notice;
pub mod policy;
pub mod router;
pub mod session;
pub mod state;
pub mod store;

pub use config::{DEFAULT_SITE_TITLE, SessionConfig};
pub use error::{CoreError, StoreError};
pub use notice::{Notice, NoticeLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use policy::SessionPolicy;
pub use router::{
    GuardOutcome, HOME_PATH, LOGIN_PATH, Location, Navigation, Page, Route, RouteTable, Router,
};
pub use session::Session;
pub use state::{SessionSnapshot, SessionState};
pub use store::{CredentialStore, FileStore, KeyValueStore, MemoryStore};
