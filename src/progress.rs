use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub trait ProgressReporter: Send + Sync {
    fn start(&self);
    fn update(&self, visited: u64);
    fn finish(&self, visited: u64);
}

/// Spinner on stderr showing how many entries have been visited.
pub struct TerminalProgressReporter {
    bar: ProgressBar,
}

impl Default for TerminalProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalProgressReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            bar.set_style(style);
        }
        Self { bar }
    }
}

impl ProgressReporter for TerminalProgressReporter {
    fn start(&self) {
        self.bar.set_message("Scanning entries...");
        self.bar.enable_steady_tick(Duration::from_millis(100));
    }

    fn update(&self, visited: u64) {
        if visited % 64 == 0 {
            self.bar
                .set_message(format!("Scanning entries... {} visited", visited));
        }
    }

    fn finish(&self, visited: u64) {
        self.bar
            .finish_with_message(format!("Scan complete: {} entries", visited));
    }
}
