use std::io::IsTerminal;
use std::sync::OnceLock;

use rae_sync::{Notice, NoticeLevel};

use crate::cli::{GlobalFlags, OutputFormat};

#[derive(Clone, Copy, Debug)]
pub struct UiPrefs {
    pub table_color: bool,
    pub progress: bool,
    pub term_width: Option<usize>,
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    let is_tty = std::io::stdout().is_terminal();
    let table_color = is_tty
        && flags.format == OutputFormat::Table
        && !flags.quiet
        && std::env::var_os("NO_COLOR").is_none();
    let progress = std::io::stderr().is_terminal() && !flags.quiet;

    let term_width = std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|width| *width >= 40);

    let _ = UI_PREFS.set(UiPrefs {
        table_color,
        progress,
        term_width,
    });
}

#[must_use]
pub fn prefs() -> UiPrefs {
    *UI_PREFS.get().unwrap_or(&UiPrefs {
        table_color: false,
        progress: false,
        term_width: None,
    })
}

/// One stderr line per notice. `--quiet` keeps only errors.
pub fn print_notices(notices: &[Notice], flags: &GlobalFlags) {
    for notice in notices {
        if let Some(line) = notice_line(notice, flags.quiet) {
            eprintln!("{line}");
        }
    }
}

fn notice_line(notice: &Notice, quiet: bool) -> Option<String> {
    let tag = match notice.level {
        NoticeLevel::Error => "error",
        NoticeLevel::Info if quiet => return None,
        NoticeLevel::Success if quiet => return None,
        NoticeLevel::Info => "info",
        NoticeLevel::Success => "ok",
    };
    Some(format!("[{tag}] {}: {}", notice.title, notice.message))
}
