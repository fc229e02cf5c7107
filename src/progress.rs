//! Progress reporting: one count bar per subreddit, drawn on stderr.

use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "{spinner:.green} {msg} {pos}/{len} [{bar:.cyan/blue}] {percent:>3}%  \
                        submission/s: {per_sec}  elapsed: {elapsed_precise}";

/// Count-style progress bar (submissions processed out of `total`), labeled.
pub fn make_count_progress(total: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
        pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏  "));
    }
    if !label.is_empty() {
        pb.set_message(label.to_string());
    }
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Optional bar for a run: a no-op when progress is disabled.
pub struct ProgressScope {
    pb: Option<ProgressBar>,
}

impl ProgressScope {
    pub fn count<T: Into<String>>(enabled: bool, label: T, total: u64) -> Self {
        let pb = enabled.then(|| make_count_progress(total, &label.into()));
        Self { pb }
    }
    /// Shrink the bar once the real number of items is known.
    pub fn set_total(&self, total: u64) {
        if let Some(pb) = &self.pb { pb.set_length(total); }
    }
    #[inline] pub fn inc_items(&self, delta: u64) { if let Some(pb) = &self.pb { pb.inc(delta); } }
    pub fn finish<T: Into<String>>(&self, msg: T) {
        if let Some(pb) = &self.pb { pb.finish_with_message(msg.into()); }
    }
}
