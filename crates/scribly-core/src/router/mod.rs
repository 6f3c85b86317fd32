// ── Navigation ──
//
// `Router` owns the current location and page title. Every navigation
// runs the guard first; a restricted view is never committed without a
// session, not even briefly.

pub mod guard;
pub mod route;

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::error::CoreError;
use crate::notice::{LOGIN_REQUIRED, Notice, Notifier};
use crate::state::SessionState;

pub use guard::{GuardOutcome, check, page_title};
pub use route::{Location, REDIRECT_PARAM, Route, RouteTable};

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

/// Result of a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Entered(Location),
    /// The guard cancelled `from` and sent the user to `to`.
    Redirected { from: Location, to: Location },
}

impl Navigation {
    /// Where the user ended up.
    pub fn location(&self) -> &Location {
        match self {
            Self::Entered(loc) | Self::Redirected { to: loc, .. } => loc,
        }
    }
}

/// The committed view: where the user is and the title shown for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub location: Location,
    pub title: String,
}

pub struct Router {
    routes: RouteTable,
    site_title: String,
    session: Arc<SessionState>,
    notifier: Arc<dyn Notifier>,
    page: watch::Sender<Page>,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("page", &*self.page.borrow())
            .finish_non_exhaustive()
    }
}

impl Router {
    pub fn new(
        routes: RouteTable,
        site_title: impl Into<String>,
        session: Arc<SessionState>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let site_title = site_title.into();
        let (page, _) = watch::channel(Page {
            location: Location::root(),
            title: site_title.clone(),
        });
        Self {
            routes,
            site_title,
            session,
            notifier,
            page,
        }
    }

    /// Try to enter `target` (`/path?query`).
    pub fn navigate(&self, target: &str) -> Result<Navigation, CoreError> {
        let location = Location::parse(target)?;
        let route = self.resolve(&location)?;

        match check(
            route,
            &location,
            self.session.is_authenticated(),
            LOGIN_PATH,
        ) {
            GuardOutcome::Proceed => {
                self.commit(route, location.clone());
                Ok(Navigation::Entered(location))
            }
            GuardOutcome::RequireLogin { redirect } => {
                debug!(target = %location, "restricted view, redirecting to login");
                self.notifier.notify(&Notice::warning(LOGIN_REQUIRED));
                let login = self.resolve(&redirect)?;
                self.commit(login, redirect.clone());
                Ok(Navigation::Redirected {
                    from: location,
                    to: redirect,
                })
            }
        }
    }

    /// Where to go after a successful login: the recorded `redirect`
    /// target of the current location, else home.
    pub fn post_login_target(&self) -> String {
        self.page
            .borrow()
            .location
            .query_value(REDIRECT_PARAM)
            .filter(|t| !t.is_empty())
            .unwrap_or(HOME_PATH)
            .to_owned()
    }

    pub fn current(&self) -> Location {
        self.page.borrow().location.clone()
    }

    pub fn title(&self) -> String {
        self.page.borrow().title.clone()
    }

    pub fn page(&self) -> Page {
        self.page.borrow().clone()
    }

    pub fn site_title(&self) -> &str {
        &self.site_title
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Location and title change together, in one update per navigation.
    pub fn subscribe(&self) -> watch::Receiver<Page> {
        self.page.subscribe()
    }

    fn resolve(&self, location: &Location) -> Result<&Route, CoreError> {
        self.routes
            .resolve(&location.path)
            .ok_or_else(|| CoreError::RouteNotFound {
                path: location.path.clone(),
            })
    }

    fn commit(&self, route: &Route, location: Location) {
        self.page.send_replace(Page {
            title: page_title(route, &self.site_title),
            location,
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::notice::{NoticeLevel, RecordingNotifier};
    use crate::store::{CredentialStore, MemoryStore};

    fn router(authenticated: bool) -> (Router, Arc<RecordingNotifier>) {
        let state = SessionState::restore(CredentialStore::new(Box::new(MemoryStore::new()))).unwrap();
        if authenticated {
            state
                .establish(SecretString::from("abc".to_owned()), Default::default())
                .unwrap();
        }
        let notifier = Arc::new(RecordingNotifier::new());
        let router = Router::new(
            RouteTable::blog(),
            "Scribly",
            Arc::new(state),
            notifier.clone(),
        );
        (router, notifier)
    }

    #[test]
    fn restricted_view_redirects_anonymous_user() {
        let (router, notices) = router(false);

        let nav = router.navigate("/profile").unwrap();

        assert_eq!(
            nav,
            Navigation::Redirected {
                from: Location::parse("/profile").unwrap(),
                to: Location::parse("/login?redirect=%2Fprofile").unwrap(),
            }
        );
        assert_eq!(router.current().path, "/login");
        assert_eq!(router.title(), "Log in - Scribly");
        assert_eq!(router.post_login_target(), "/profile");

        let notices = notices.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert_eq!(notices[0].message, LOGIN_REQUIRED);
    }

    #[test]
    fn session_enters_restricted_view() {
        let (router, notices) = router(true);
        let nav = router.navigate("/editor/4").unwrap();
        assert_eq!(nav, Navigation::Entered(Location::parse("/editor/4").unwrap()));
        assert_eq!(router.title(), "Edit post - Scribly");
        assert!(notices.notices().is_empty());
    }

    #[test]
    fn unknown_path_changes_nothing() {
        let (router, _) = router(false);
        let err = router.navigate("/nope").unwrap_err();
        assert!(matches!(err, CoreError::RouteNotFound { ref path } if path == "/nope"));
        assert_eq!(router.current(), Location::root());
        assert_eq!(router.title(), "Scribly");
    }

    #[test]
    fn subscribers_see_location_and_title_together() {
        let (router, _) = router(true);
        let mut rx = router.subscribe();
        rx.borrow_and_update();

        router.navigate("/posts/12").unwrap();

        assert!(rx.has_changed().unwrap());
        let page = rx.borrow_and_update().clone();
        assert_eq!(page.location, Location::parse("/posts/12").unwrap());
        assert_eq!(page.title, "Post - Scribly");
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn post_login_target_defaults_home() {
        let (router, _) = router(false);
        router.navigate("/login").unwrap();
        assert_eq!(router.post_login_target(), HOME_PATH);
    }
}
