// Route table and locations

use std::fmt;

use url::Url;
use url::form_urlencoded;

use crate::error::CoreError;

/// Query parameter carrying the originally requested location.
pub const REDIRECT_PARAM: &str = "redirect";

/// One routable view: a path pattern, a label for the title, and whether
/// it needs a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub pattern: String,
    pub label: Option<String>,
    pub requires_auth: bool,
}

impl Route {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            label: None,
            requires_auth: false,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn restricted(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    /// Segment-wise match; `:name` segments match any non-empty segment.
    pub fn matches(&self, path: &str) -> bool {
        let mut pattern = segments(&self.pattern);
        let mut actual = segments(path);
        loop {
            match (pattern.next(), actual.next()) {
                (None, None) => return true,
                (Some(p), Some(a)) if p.starts_with(':') || p == a => {}
                _ => return false,
            }
        }
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Ordered set of views; the first match wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// The blog's views.
    pub fn blog() -> Self {
        Self::new(vec![
            Route::new("/").label("Home"),
            Route::new("/posts").label("Posts"),
            Route::new("/posts/:id").label("Post"),
            Route::new("/login").label("Log in"),
            Route::new("/register").label("Register"),
            Route::new("/profile").label("Profile").restricted(),
            Route::new("/my-posts").label("My posts").restricted(),
            Route::new("/editor").label("Write post").restricted(),
            Route::new("/editor/:id").label("Edit post").restricted(),
        ])
    }

    pub fn push(&mut self, route: Route) {
        self.routes.push(route);
    }

    pub fn resolve(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.matches(path))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }
}

/// A navigation target: an absolute in-app path plus decoded query pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Location {
    pub fn root() -> Self {
        Self {
            path: "/".into(),
            query: Vec::new(),
        }
    }

    /// Parse `/path?query`. Only in-app absolute paths are accepted.
    pub fn parse(target: &str) -> Result<Self, CoreError> {
        let invalid = |reason: &str| CoreError::InvalidLocation {
            target: target.to_owned(),
            reason: reason.to_owned(),
        };

        if !target.starts_with('/') || target.starts_with("//") {
            return Err(invalid("must be an absolute in-app path"));
        }

        let base = Url::parse("http://localhost/").map_err(|e| invalid(&e.to_string()))?;
        let url = base.join(target).map_err(|e| invalid(&e.to_string()))?;

        Ok(Self {
            path: url.path().to_owned(),
            query: url.query_pairs().into_owned().collect(),
        })
    }

    /// Login location that remembers `target` for after authentication.
    pub fn login_redirect(login_path: &str, target: &Location) -> Self {
        Self {
            path: login_path.to_owned(),
            query: vec![(REDIRECT_PARAM.to_owned(), target.full_path())],
        }
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Path plus encoded query, suitable for [`Location::parse`].
    pub fn full_path(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.query)
            .finish();
        format!("{}?{query}", self.path)
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_path())
    }
}
