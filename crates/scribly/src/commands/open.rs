//! `open <path>`: run a navigation and report where it lands.
//!
//! A guard redirect is not an error here; the login view (with its
//! `redirect` parameter) is printed like any other destination.

use scribly_core::CoreError;

use crate::cli::GlobalOpts;
use crate::error::CliError;

use super::{Context, util};

pub fn handle(ctx: &Context, path: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let router = ctx.session.router();
    match router.navigate(path) {
        Ok(_) => util::print_view(router, global),
        Err(CoreError::RouteNotFound { path }) => Err(CliError::RouteNotFound {
            path,
            known: router
                .routes()
                .iter()
                .map(|r| r.pattern.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }),
        Err(e) => Err(e.into()),
    }
}
