// ── Failure policy ──
//
// Observes every failed, non-silent API call. One error notice per call;
// a rejected session additionally clears the pair and goes to login.

use std::sync::Arc;

use scribly_api::{Error, FailureObserver};
use tracing::{error, warn};

use crate::notice::{Notice, Notifier};
use crate::router::{LOGIN_PATH, Router};
use crate::state::SessionState;

pub struct SessionPolicy {
    session: Arc<SessionState>,
    router: Arc<Router>,
    notifier: Arc<dyn Notifier>,
}

impl SessionPolicy {
    pub fn new(
        session: Arc<SessionState>,
        router: Arc<Router>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            session,
            router,
            notifier,
        }
    }

    fn expire_session(&self) {
        match self.session.clear() {
            Ok(true) => warn!("server rejected the session, credential cleared"),
            Ok(false) => {}
            Err(e) => error!(error = %e, "failed to clear stored session"),
        }
        if let Err(e) = self.router.navigate(LOGIN_PATH) {
            error!(error = %e, "failed to navigate to login");
        }
    }
}

impl FailureObserver for SessionPolicy {
    fn on_failure(&self, error: &Error) {
        self.notifier.notify(&Notice::error(error.user_message()));
        if error.is_session_invalid() {
            self.expire_session();
        }
    }
}
