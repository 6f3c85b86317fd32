// ── Session facade ──
//
// The single authority for who is logged in. Wires the API client to the
// session state (credential source) and the failure policy (observer),
// and owns the router those two share.

use std::fmt;
use std::sync::Arc;

use scribly_api::{
    ApiClient, Identity, LoginRequest, ProfileUpdate, RegisterRequest, ReqwestTransport,
    Transport,
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::error::CoreError;
use crate::notice::{LOGIN_SUCCESS, LOGOUT_SUCCESS, Notice, Notifier, REGISTER_SUCCESS};
use crate::policy::SessionPolicy;
use crate::router::{HOME_PATH, LOGIN_PATH, Navigation, Router};
use crate::state::{SessionSnapshot, SessionState};
use crate::store::{CredentialStore, KeyValueStore};

pub struct Session {
    api: ApiClient,
    state: Arc<SessionState>,
    router: Arc<Router>,
    notifier: Arc<dyn Notifier>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("api", &self.api)
            .field("state", &self.state)
            .field("router", &self.router)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Restore the session from `store` and connect over `reqwest`.
    pub fn open(
        config: &SessionConfig,
        store: Box<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, CoreError> {
        let transport = ReqwestTransport::new(&config.transport)?;
        Self::with_transport(config, Arc::new(transport), store, notifier)
    }

    /// Same as [`Session::open`] over any transport.
    pub fn with_transport(
        config: &SessionConfig,
        transport: Arc<dyn Transport>,
        store: Box<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, CoreError> {
        let state = Arc::new(SessionState::restore(CredentialStore::new(store))?);
        let router = Arc::new(Router::new(
            config.routes.clone(),
            config.site_title.clone(),
            Arc::clone(&state),
            Arc::clone(&notifier),
        ));
        let policy = SessionPolicy::new(
            Arc::clone(&state),
            Arc::clone(&router),
            Arc::clone(&notifier),
        );
        let api = ApiClient::with_transport(config.base_url.clone(), transport)
            .with_timeout(config.transport.timeout)
            .with_credentials(state.clone())
            .with_observer(Arc::new(policy));

        Ok(Self {
            api,
            state,
            router,
            notifier,
        })
    }

    // ── Auth operations ──────────────────────────────────────────────

    /// Log in, store the pair, then go to the recorded redirect target
    /// (home when none). Failures leave the session untouched.
    pub async fn login(&self, form: &LoginRequest) -> Result<Navigation, CoreError> {
        let resp = self.api.login(form).await?;
        self.state.establish(resp.token, resp.user_info)?;
        info!(username = %form.username, "logged in");
        self.notifier.notify(&Notice::success(LOGIN_SUCCESS));

        let target = self.router.post_login_target();
        match self.router.navigate(&target) {
            Ok(nav) => Ok(nav),
            Err(e) => {
                warn!(target = %target, error = %e, "redirect target unusable, going home");
                self.router.navigate(HOME_PATH)
            }
        }
    }

    /// Create an account and go to login. Does not authenticate.
    pub async fn register(&self, form: &RegisterRequest) -> Result<Navigation, CoreError> {
        self.api.register(form).await?;
        info!(username = %form.username, "registered");
        self.notifier.notify(&Notice::success(REGISTER_SUCCESS));
        self.router.navigate(LOGIN_PATH)
    }

    /// End the session. The server call is best effort; the local pair is
    /// always cleared and the user always lands on login.
    pub async fn logout(&self) -> Result<Navigation, CoreError> {
        if self.state.is_authenticated() {
            if let Err(e) = self.api.logout().await {
                debug!(error = %e, "server logout failed, clearing locally");
            }
        }
        self.state.clear()?;
        info!("logged out");
        self.notifier.notify(&Notice::success(LOGOUT_SUCCESS));
        self.router.navigate(LOGIN_PATH)
    }

    /// Merge `patch` into the identity snapshot. No network call.
    pub fn update_local_identity(&self, patch: Identity) -> Result<Identity, CoreError> {
        Ok(self.state.merge_identity(patch)?)
    }

    /// Fetch the profile from the server and replace the snapshot.
    pub async fn refresh_identity(&self) -> Result<Identity, CoreError> {
        let identity = self.api.get_profile().await?;
        Ok(self.state.replace_identity(identity)?)
    }

    /// Update the profile on the server, then merge the confirmed fields.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Identity, CoreError> {
        let confirmed = self.api.update_profile(update).await?;
        let patch = if confirmed == Identity::default() {
            Identity::from(update.clone())
        } else {
            confirmed
        };
        self.update_local_identity(patch)
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.identity()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.state.snapshot().identity.as_ref().and_then(|i| i.id)
    }

    pub fn username(&self) -> Option<String> {
        self.state
            .snapshot()
            .identity
            .as_ref()
            .and_then(|i| i.username.clone())
    }

    /// Nickname, falling back to the username.
    pub fn display_name(&self) -> Option<String> {
        self.state
            .snapshot()
            .identity
            .as_ref()
            .and_then(|i| i.display_name().map(str::to_owned))
    }

    pub fn avatar(&self) -> Option<String> {
        self.state
            .snapshot()
            .identity
            .as_ref()
            .and_then(|i| i.avatar_url.clone())
    }

    pub fn snapshot(&self) -> Arc<SessionSnapshot> {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<SessionSnapshot>> {
        self.state.subscribe()
    }

    /// The API client, wired to this session's credential and policy.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn router(&self) -> &Router {
        &self.router
    }
}
