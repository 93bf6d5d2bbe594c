//! Loading spinner that becomes a no-op when the `progress` feature is disabled

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};
#[cfg(feature = "progress")]
use std::time::Duration;

/// Spinner drawn on stderr while a dataset is read and indexed.
/// Hidden automatically when stderr is not a terminal.
pub struct Spinner {
    #[cfg(feature = "progress")]
    bar: ProgressBar,
}

impl Spinner {
    #[cfg(feature = "progress")]
    pub fn start(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    #[cfg(not(feature = "progress"))]
    pub fn start(_message: &str) -> Self {
        Self {}
    }

    /// Stop ticking and erase the spinner line
    pub fn finish(self) {
        #[cfg(feature = "progress")]
        self.bar.finish_and_clear();
    }
}
