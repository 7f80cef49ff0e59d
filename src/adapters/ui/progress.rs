//! Progress display for the batch send. Thin indicatif wrapper.

use indicatif::{ProgressBar, ProgressStyle};

/// Bar for a reaction batch: one tick per symbol, message slot shows the
/// last outcome.
pub fn batch_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("static progress template")
            .progress_chars("=>-"),
    );
    bar
}
