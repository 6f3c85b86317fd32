// Navigation guard
//
// Pure decision over cached credential presence. Never validates the
// credential with the server; a stale one is caught by the first call
// that gets a 401.

use super::route::{Location, Route};

/// What the guard decided for one navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Proceed,
    /// Cancel the attempt and go to login instead.
    RequireLogin { redirect: Location },
}

/// Decide whether `target` (resolved to `route`) may be entered.
pub fn check(route: &Route, target: &Location, authenticated: bool, login_path: &str) -> GuardOutcome {
    if route.requires_auth && !authenticated {
        GuardOutcome::RequireLogin {
            redirect: Location::login_redirect(login_path, target),
        }
    } else {
        GuardOutcome::Proceed
    }
}

/// Window title for a view: `"<label> - <site>"`, or just the site title.
pub fn page_title(route: &Route, site_title: &str) -> String {
    match route.label.as_deref() {
        Some(label) if !label.is_empty() => format!("{label} - {site_title}"),
        _ => site_title.to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::router::route::REDIRECT_PARAM;

    #[test]
    fn anonymous_user_is_sent_to_login_with_target() {
        let route = Route::new("/profile").label("Profile").restricted();
        let target = Location::parse("/profile").unwrap();

        match check(&route, &target, false, "/login") {
            GuardOutcome::RequireLogin { redirect } => {
                assert_eq!(redirect.path, "/login");
                assert_eq!(redirect.query_value(REDIRECT_PARAM), Some("/profile"));
            }
            GuardOutcome::Proceed => panic!("restricted view entered anonymously"),
        }
    }

    #[test]
    fn open_views_and_sessions_proceed() {
        let open = Route::new("/posts");
        let restricted = Route::new("/profile").restricted();
        let target = Location::parse("/posts").unwrap();

        assert_eq!(check(&open, &target, false, "/login"), GuardOutcome::Proceed);
        assert_eq!(check(&restricted, &target, true, "/login"), GuardOutcome::Proceed);
    }

    #[test]
    fn title_uses_label_when_present() {
        assert_eq!(
            page_title(&Route::new("/posts").label("Posts"), "Scribly"),
            "Posts - Scribly"
        );
        assert_eq!(page_title(&Route::new("/x"), "Scribly"), "Scribly");
    }
}
