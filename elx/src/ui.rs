//! Terminal rendering of install progress.

use std::time::Duration;

use colored::Colorize;
use elx_core::InstallReporter;
use indicatif::{ProgressBar, ProgressStyle};

/// Creates and configures a default spinner ProgressBar.
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Feeds installer callbacks into a spinner line.
pub struct SpinnerReporter {
    bar: ProgressBar,
}

impl SpinnerReporter {
    pub fn new(message: &str) -> Self {
        Self {
            bar: create_spinner(message),
        }
    }

    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl InstallReporter for SpinnerReporter {
    fn progress(&self, loaded_mb: f64, total_mb: f64) {
        self.bar
            .set_message(format!("Downloading {loaded_mb:.2}/{total_mb:.2}MB"));
    }

    fn message(&self, text: &str) {
        self.bar.set_message(text.to_string());
    }

    fn error(&self, text: &str) {
        self.bar
            .suspend(|| eprintln!("{} {}", "Warning:".yellow().bold(), text));
    }
}
