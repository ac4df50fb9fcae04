//! Progress reporting: a count-style bar over dispatched chunks.

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::{Arc, OnceLock};

/// Optional global MultiProgress so several analyses can render bars side by side.
/// If unset, bars draw to the default terminal target.
static GLOBAL_MP: OnceLock<Arc<MultiProgress>> = OnceLock::new();

/// Install a global MultiProgress used by all subsequently created bars.
/// Safe to call once; later calls are ignored.
pub fn set_global_multiprogress(mp: Arc<MultiProgress>) {
    let _ = GLOBAL_MP.set(mp);
}

fn new_bar(total: u64) -> ProgressBar {
    match GLOBAL_MP.get() {
        Some(mp) => mp.add(ProgressBar::new(total)),
        None => ProgressBar::new(total),
    }
}

/// Chunks completed out of chunks dispatched, with an optional label.
pub fn make_chunk_progress(total: u64, label: &str) -> ProgressBar {
    let pb = new_bar(total);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} {msg} {pos}/{len} chunks [{bar:.cyan/blue}] {percent:>3}%  \
         elapsed: {elapsed_precise}",
    ) {
        pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏  "));
    }
    if !label.is_empty() {
        pb.set_message(label.to_string());
    }
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
