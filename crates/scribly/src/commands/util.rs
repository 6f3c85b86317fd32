//! Shared helpers for command handlers.

use std::io::{self, BufRead, IsTerminal};

use secrecy::SecretString;
use serde::Serialize;

use scribly_core::{Navigation, Router};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::Context;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.trim_end_matches('?').into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(io::Error::other(e)))?;
    Ok(confirmed)
}

/// Map a dialoguer / interactive I/O failure into `CliError`.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

pub fn prompt_text(prompt: &str) -> Result<String, CliError> {
    let value: String = dialoguer::Input::new()
        .with_prompt(prompt)
        .interact_text()
        .map_err(prompt_err)?;
    non_empty(prompt, value)
}

pub fn prompt_secret(prompt: &str) -> Result<SecretString, CliError> {
    let value = rpassword::prompt_password(format!("{prompt}: ")).map_err(prompt_err)?;
    non_empty(prompt, value).map(SecretString::from)
}

/// First line of stdin, without the line ending.
pub fn read_stdin_secret() -> Result<SecretString, CliError> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let trimmed = line.trim_end_matches(['\r', '\n']).to_owned();
    non_empty("password", trimmed).map(SecretString::from)
}

fn non_empty(field: &str, value: String) -> Result<String, CliError> {
    if value.is_empty() {
        return Err(CliError::Validation {
            field: field.to_lowercase(),
            reason: "cannot be empty".into(),
        });
    }
    Ok(value)
}

/// Enter a restricted view before doing its work. A guard redirect turns
/// into a login-required error carrying the target.
pub fn enter(ctx: &Context, path: &str) -> Result<(), CliError> {
    match ctx.session.router().navigate(path)? {
        Navigation::Entered(_) => Ok(()),
        Navigation::Redirected { from, to } => Err(CliError::LoginRequired {
            target: from.full_path(),
            redirect: to.full_path(),
        }),
    }
}

// ── Current view ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct View {
    pub location: String,
    pub title: String,
}

impl View {
    pub fn current(router: &Router) -> Self {
        Self {
            location: router.current().full_path(),
            title: router.title(),
        }
    }
}

/// Print where the router ended up.
pub fn print_view(router: &Router, global: &GlobalOpts) -> Result<(), CliError> {
    let view = View::current(router);
    let out = output::render_single(
        global.output,
        &view,
        |v| format!("{}  ({})", v.location, v.title),
        |v| v.location.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Id of a freshly created resource: either the bare `data` value or its
/// `id` field.
pub fn created_id(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => other
            .get("id")
            .map(ToString::to_string)
            .unwrap_or_default(),
    }
}

/// Truncate to `max` characters for table cells.
pub fn ellipsize(text: &str, max: usize) -> String {
    let flat = text.replace(['\n', '\r'], " ");
    if flat.chars().count() <= max {
        return flat;
    }
    let mut cut: String = flat.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn created_id_accepts_bare_and_object_forms() {
        assert_eq!(created_id(&json!(42)), "42");
        assert_eq!(created_id(&json!({"id": 7, "title": "x"})), "7");
        assert_eq!(created_id(&json!(null)), "");
    }

    #[test]
    fn ellipsize_flattens_and_truncates() {
        assert_eq!(ellipsize("short", 10), "short");
        assert_eq!(ellipsize("line\nbreak", 20), "line break");
        assert_eq!(ellipsize("abcdefghij", 5), "abcd…");
    }
}
