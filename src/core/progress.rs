//! Progress spinner shown on stderr while a run is active

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::config::{PROGRESS_TEMPLATE, PROGRESS_TICK_MS};

/// Live dispatched/finished counters behind a spinner
///
/// A hidden progress keeps counting but never draws, which is what JSON
/// output, debug logging and non-terminal stderr get.
pub struct RunProgress {
    bar: ProgressBar,
    dispatched: AtomicUsize,
    finished: AtomicUsize,
}

impl RunProgress {
    pub fn new(visible: bool) -> Self {
        let bar = if visible {
            let bar = ProgressBar::new_spinner();
            bar.set_style(create_progress_style());
            bar.enable_steady_tick(Duration::from_millis(PROGRESS_TICK_MS));
            bar.set_message("discovering repositories...");
            bar
        } else {
            ProgressBar::hidden()
        };
        Self {
            bar,
            dispatched: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
        }
    }

    pub fn hidden() -> Self {
        Self::new(false)
    }

    pub fn repository_dispatched(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
        self.refresh();
    }

    pub fn repository_finished(&self) {
        self.finished.fetch_add(1, Ordering::Relaxed);
        self.refresh();
    }

    /// Runs `f` with the spinner cleared so output doesn't interleave with it
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.bar.suspend(f)
    }

    pub fn finish(&self, message: String) {
        if self.bar.is_hidden() {
            return;
        }
        self.bar.finish_with_message(message);
    }

    fn refresh(&self) {
        let dispatched = self.dispatched.load(Ordering::Relaxed);
        let finished = self.finished.load(Ordering::Relaxed);
        self.bar
            .set_message(format!("{dispatched} dispatched • {finished} finished"));
    }
}

fn create_progress_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template(PROGRESS_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
