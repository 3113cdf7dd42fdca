use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use rae_sync::orchestrator::ProgressSink;

use crate::ui;

/// Percent bar on stderr, or nothing when progress display is off.
pub struct Progress {
    bar: Option<ProgressBar>,
}

fn bar_template() -> &'static str {
    match ui::prefs().term_width {
        Some(cols) if cols >= 80 => "{bar:40.cyan/blue} {pos:>3}% {msg}",
        _ => "{wide_bar:.cyan/blue} {pos:>3}% {msg}",
    }
}

impl Progress {
    #[must_use]
    pub fn percent(message: &str) -> Self {
        if !ui::prefs().progress {
            return Self { bar: None };
        }

        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template(bar_template())
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    #[must_use]
    pub fn spinner(message: &str) -> Self {
        if !ui::prefs().progress {
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    pub fn finish_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    pub fn finish_with(&self, ok: bool, message: &str) {
        if let Some(bar) = &self.bar {
            if ok {
                bar.finish_with_message(message.to_string());
            } else {
                bar.abandon_with_message(message.to_string());
            }
        }
    }
}

impl ProgressSink for Progress {
    fn set(&mut self, percent: u8) {
        if let Some(bar) = &self.bar {
            bar.set_position(u64::from(percent.min(100)));
        }
    }
}
