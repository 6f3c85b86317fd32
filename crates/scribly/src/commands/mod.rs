//! Command dispatch: bridges CLI args -> session / API calls -> output.

pub mod auth;
pub mod comments;
pub mod config_cmd;
pub mod favorites;
pub mod likes;
pub mod open;
pub mod posts;
pub mod util;

use std::io;
use std::sync::Arc;

use scribly_core::{FileStore, Notice, Notifier, Session};

use crate::cli::{Command, GlobalOpts};
use crate::config::{self, Profile};
use crate::error::CliError;
use crate::notifier::TerminalNotifier;
use crate::output;

/// Everything a session-bound command handler needs.
pub struct Context {
    pub session: Session,
    pub profile_name: String,
    pub profile: Profile,
    notifier: Arc<TerminalNotifier>,
}

impl Context {
    /// Resolve the profile, restore its stored session and connect.
    pub fn open(global: &GlobalOpts) -> Result<Self, CliError> {
        let cfg = config::load_config_or_default();
        let profile_name = config::active_profile_name(global, &cfg);
        let profile = config::resolve_profile(&cfg, &profile_name, global)?;
        let session_config = config::session_config(&profile, &cfg)?;

        let path = config::session_file(&profile_name, global);
        tracing::debug!(profile = %profile_name, path = %path.display(), "restoring session");

        let notifier = Arc::new(TerminalNotifier::new(
            output::should_color(global.color, &io::stderr()),
            global.quiet,
        ));
        let session = Session::open(
            &session_config,
            Box::new(FileStore::new(path)),
            Arc::clone(&notifier) as Arc<dyn Notifier>,
        )?;

        Ok(Self {
            session,
            profile_name,
            profile,
            notifier,
        })
    }

    /// Print a success notice for an operation the session layer does
    /// not announce itself.
    pub fn done(&self, message: impl Into<String>) {
        self.notifier.notify(&Notice::success(message));
    }
}

/// Dispatch a session-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(ctx, args, global).await,
        Command::Register(args) => auth::register(ctx, args, global).await,
        Command::Logout => auth::logout(ctx, global).await,
        Command::Whoami => auth::whoami(ctx, global),
        Command::Profile(args) => auth::profile(ctx, args, global).await,
        Command::CheckUsername { username } => auth::check_username(ctx, &username, global).await,
        Command::Posts(args) => posts::handle(ctx, args, global).await,
        Command::Comments(args) => comments::handle(ctx, args, global).await,
        Command::Favorites(args) => favorites::handle(ctx, args, global).await,
        Command::Likes(args) => likes::handle(ctx, args, global).await,
        Command::Open { path } => open::handle(ctx, &path, global),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
