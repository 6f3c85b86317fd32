//! Login, registration, logout and profile handlers.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use scribly_api::{Identity, LoginRequest, PasswordChange, ProfileUpdate, RegisterRequest};
use scribly_config::ConfigError;
use scribly_core::{LOGIN_PATH, Location};

use crate::cli::{GlobalOpts, LoginArgs, ProfileArgs, ProfileCommand, RegisterArgs};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

const PROFILE_PATH: &str = "/profile";

// ── Detail views ────────────────────────────────────────────────────

fn identity_detail(identity: &Identity) -> String {
    output::detail_lines(&[
        ("ID", identity.id.map(|id| id.to_string())),
        ("Username", identity.username.clone()),
        ("Nickname", identity.nickname.clone()),
        ("Email", identity.email.clone()),
        ("Avatar", identity.avatar_url.clone()),
        ("Bio", identity.bio.clone()),
    ])
}

fn print_identity(identity: &Identity, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(global.output, identity, identity_detail, |i| {
        i.username.clone().unwrap_or_default()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn login(ctx: &Context, args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let router = ctx.session.router();
    if let Some(ref target) = args.redirect {
        let target = Location::parse(target)?;
        router.navigate(&Location::login_redirect(LOGIN_PATH, &target).full_path())?;
    }

    let username = match args.username {
        Some(username) => username,
        None => match scribly_config::resolve_username(&ctx.profile, &ctx.profile_name) {
            Ok(username) => username,
            Err(ConfigError::NoCredentials { .. }) => util::prompt_text("Username")?,
            Err(e) => return Err(e.into()),
        },
    };

    let password = if args.password_stdin {
        util::read_stdin_secret()?
    } else {
        match scribly_config::resolve_password(&ctx.profile, &ctx.profile_name) {
            Ok(password) => password,
            Err(ConfigError::NoCredentials { .. }) => util::prompt_secret("Password")?,
            Err(e) => return Err(e.into()),
        }
    };

    ctx.session
        .login(&LoginRequest::new(username, password))
        .await?;
    util::print_view(router, global)
}

pub async fn register(
    ctx: &Context,
    args: RegisterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let username = match args.username {
        Some(u) => u,
        None => util::prompt_text("Username")?,
    };
    let email = match args.email {
        Some(e) => e,
        None => util::prompt_text("Email")?,
    };
    let (password, confirm_password) = if args.password_stdin {
        let password = util::read_stdin_secret()?;
        (password.clone(), password)
    } else {
        (
            util::prompt_secret("Password")?,
            util::prompt_secret("Confirm password")?,
        )
    };
    check_confirmation(&password, &confirm_password)?;

    let form = RegisterRequest {
        username,
        email,
        password,
        confirm_password,
        nickname: args.nickname,
    };
    ctx.session.register(&form).await?;
    util::print_view(ctx.session.router(), global)
}

pub async fn logout(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    ctx.session.logout().await?;
    util::print_view(ctx.session.router(), global)
}

/// Show the stored identity. Never touches the network.
pub fn whoami(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    if !ctx.session.is_authenticated() {
        return Err(CliError::NotLoggedIn);
    }
    let identity = ctx.session.identity().unwrap_or_default();
    print_identity(&identity, global)
}

pub async fn profile(ctx: &Context, args: ProfileArgs, global: &GlobalOpts) -> Result<(), CliError> {
    util::enter(ctx, PROFILE_PATH)?;

    match args.command {
        ProfileCommand::Show { refresh } => {
            let identity = if refresh {
                ctx.session.refresh_identity().await?
            } else {
                ctx.session.identity().unwrap_or_default()
            };
            print_identity(&identity, global)
        }

        ProfileCommand::Update {
            nickname,
            bio,
            avatar,
        } => {
            let update = ProfileUpdate {
                nickname,
                bio,
                avatar_url: avatar,
            };
            if update.is_empty() {
                return Err(CliError::Validation {
                    field: "profile".into(),
                    reason: "pass at least one of --nickname, --bio, --avatar".into(),
                });
            }
            let identity = ctx.session.update_profile(&update).await?;
            ctx.done("Profile updated");
            print_identity(&identity, global)
        }

        ProfileCommand::Password => {
            let old_password = util::prompt_secret("Current password")?;
            let new_password = util::prompt_secret("New password")?;
            let confirm_password = util::prompt_secret("Confirm new password")?;
            check_confirmation(&new_password, &confirm_password)?;

            ctx.session
                .api()
                .change_password(&PasswordChange {
                    old_password,
                    new_password,
                    confirm_password,
                })
                .await?;
            ctx.done("Password changed");
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct Availability<'a> {
    username: &'a str,
    available: bool,
}

pub async fn check_username(
    ctx: &Context,
    username: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let available = ctx.session.api().check_username(username).await?;
    let result = Availability {
        username,
        available,
    };
    let out = output::render_single(
        global.output,
        &result,
        |r| {
            let verdict = if r.available { "available" } else { "taken" };
            format!("{} is {verdict}", r.username)
        },
        |r| r.available.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn check_confirmation(password: &SecretString, confirm: &SecretString) -> Result<(), CliError> {
    if password.expose_secret() != confirm.expose_secret() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "the two passwords do not match".into(),
        });
    }
    Ok(())
}
