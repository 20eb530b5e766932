use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while a query geocodes and builds its index.
///
/// A silent reporter swallows every call so JSON output stays clean.
pub struct ProgressReporter {
    spinner: Option<ProgressBar>,
}

impl ProgressReporter {
    pub fn new_spinner(message: &str, silent: bool) -> Self {
        if silent {
            return Self { spinner: None };
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { spinner: Some(pb) }
    }

    pub fn set_message(&self, message: &str) {
        if let Some(ref pb) = self.spinner {
            pb.set_message(message.to_string());
        }
    }

    pub fn finish_and_clear(&self) {
        if let Some(ref pb) = self.spinner {
            pb.finish_and_clear();
        }
    }

    pub fn is_silent(&self) -> bool {
        self.spinner.is_none()
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if let Some(ref pb) = self.spinner {
            if !pb.is_finished() {
                pb.finish_and_clear();
            }
        }
    }
}
