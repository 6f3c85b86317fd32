//! CLI configuration: thin wrapper around `scribly_config`.
//!
//! Adds the resolution steps that depend on `GlobalOpts` flag overrides
//! (--server, --insecure, --timeout, --state-dir).

use std::path::PathBuf;

use scribly_core::SessionConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use scribly_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, save_config, session_path,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.active_profile_name().to_owned())
}

/// The active profile with flag overrides applied.
///
/// A profile that is not configured is only acceptable when `--server`
/// supplies the URL.
pub fn resolve_profile(
    config: &Config,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<Profile, CliError> {
    let mut profile = match config.profiles.get(profile_name) {
        Some(profile) => profile.clone(),
        None if global.server.is_some() => Profile::default(),
        None => return Err(profile_not_found(config, profile_name)),
    };

    if let Some(ref server) = global.server {
        profile.server.clone_from(server);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if global.timeout.is_some() {
        profile.timeout = global.timeout;
    }
    Ok(profile)
}

/// Translate the resolved profile into a `SessionConfig`.
pub fn session_config(profile: &Profile, config: &Config) -> Result<SessionConfig, CliError> {
    Ok(scribly_config::profile_to_session_config(
        profile,
        &config.defaults,
    )?)
}

/// Where this profile's session is persisted.
pub fn session_file(profile_name: &str, global: &GlobalOpts) -> PathBuf {
    session_path(profile_name, global.state_dir.as_deref())
}

pub fn profile_not_found(config: &Config, name: &str) -> CliError {
    let mut available: Vec<_> = config.profiles.keys().cloned().collect();
    available.sort();
    CliError::ProfileNotFound {
        name: name.into(),
        available: if available.is_empty() {
            "(none)".into()
        } else {
            available.join(", ")
        },
    }
}
