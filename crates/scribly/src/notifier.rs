//! Terminal sink for session notices.
//!
//! Notices go to stderr so stdout stays clean for command output. Quiet
//! mode drops success and info notices; warnings and errors always print.

use std::io::{self, Write};

use owo_colors::OwoColorize;

use scribly_core::{Notice, NoticeLevel, Notifier};

#[derive(Debug, Clone, Copy)]
pub struct TerminalNotifier {
    color: bool,
    quiet: bool,
}

impl TerminalNotifier {
    pub fn new(color: bool, quiet: bool) -> Self {
        Self { color, quiet }
    }

    fn render(&self, notice: &Notice) -> String {
        let mark = match notice.level {
            NoticeLevel::Success => "✓",
            NoticeLevel::Info => "i",
            NoticeLevel::Warning => "!",
            NoticeLevel::Error => "✗",
        };
        if !self.color {
            return format!("{mark} {}", notice.message);
        }
        let mark = match notice.level {
            NoticeLevel::Success => mark.green().bold().to_string(),
            NoticeLevel::Info => mark.cyan().bold().to_string(),
            NoticeLevel::Warning => mark.yellow().bold().to_string(),
            NoticeLevel::Error => mark.red().bold().to_string(),
        };
        format!("{mark} {}", notice.message.bold())
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: &Notice) {
        if self.quiet && matches!(notice.level, NoticeLevel::Success | NoticeLevel::Info) {
            return;
        }
        let line = self.render(notice);
        let _ = writeln!(io::stderr().lock(), "{line}");
    }
}
