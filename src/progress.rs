//! Terminal progress for inventory collection

use indicatif::{ProgressBar, ProgressStyle};
use resource::Progress;
use std::time::Duration;

/// Spinner counting processed resources.
pub struct Spinner {
    bar: ProgressBar,
    label: String,
}

impl Spinner {
    /// Visible spinner, or a hidden one in quiet mode.
    pub fn new(label: &str, quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
                bar.set_style(style);
            }
            bar.enable_steady_tick(Duration::from_millis(120));
            bar
        };
        bar.set_message(label.to_string());
        Self {
            bar,
            label: label.to_string(),
        }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl Progress for Spinner {
    fn inc(&self) {
        self.bar.inc(1);
        self.bar
            .set_message(format!("{} ({} resources)", self.label, self.bar.position()));
    }

    fn stop(&self) {
        self.bar.finish_and_clear();
    }
}
