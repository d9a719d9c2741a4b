use std::time::Duration;

use indicatif::ProgressBar;

/// Spinner on stderr counting processed records. Hidden when stderr is not a terminal.
pub struct Progress {
    spinner: ProgressBar,
    label: String,
}

impl Progress {
    pub fn start(label: &str) -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner.set_message(format!("{label}..."));
        Self {
            spinner,
            label: label.to_string(),
        }
    }

    pub fn tick(&self) {
        self.spinner.inc(1);
        self.spinner
            .set_message(format!("{}... {}", self.label, self.spinner.position()));
    }

    pub fn finish(self) {
        self.spinner.finish_and_clear();
    }
}
