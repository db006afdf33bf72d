use indicatif::{ProgressBar, ProgressStyle};

pub fn create_progress_bar(len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner} [{bar:30}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .tick_strings(&["-", "\\", "|", "/"])
            .progress_chars("=> "),
    );
    bar.enable_steady_tick(std::time::Duration::from_millis(80));
    bar
}
