use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::thread::sleep;
use std::time::Duration;

static INIT_ONCE: std::sync::Once = std::sync::Once::new();

/// Install the fmt subscriber once per process. `RUST_LOG` wins; default is `info`.
pub fn init_tracing_once() {
    INIT_ONCE.call_once(|| {
        let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let _ = tracing_subscriber::fmt().with_env_filter(env_filter).try_init();
    });
}

/// Split a comma/semicolon/whitespace separated word list, lowercased, sorted, deduped.
pub fn split_word_list(raw: &str) -> Vec<String> {
    let mut v: Vec<String> = raw
        .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();
    v.sort();
    v.dedup();
    v
}

/// Read a word list from environment variable `var`; empty when unset.
pub fn words_from_env(var: &str) -> Vec<String> {
    match std::env::var(var) {
        Ok(s) => split_word_list(&s),
        Err(_) => Vec::new(),
    }
}

// -------- file ops with retries (AV scanners / network shares) --------

/// Transient errors worth a retry: sharing/lock violations and device hiccups.
/// The codes are Windows ones; elsewhere the same numbers mean EIO, EISDIR, EPIPE.
#[cfg(windows)]
fn is_retriable(e: &io::Error) -> bool {
    matches!(e.raw_os_error(), Some(5) | Some(21) | Some(32) | Some(33) | Some(1006) | Some(1117) | Some(1224))
}

#[cfg(not(windows))]
fn is_retriable(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock)
}

fn with_retries<T>(tries: usize, delay_ms: u64, mut op: impl FnMut() -> io::Result<T>) -> io::Result<T> {
    let mut attempt = 0usize;
    loop {
        match op() {
            Ok(v) => return Ok(v),
            Err(e) if is_retriable(&e) && attempt + 1 < tries.max(1) => {
                attempt += 1;
                sleep(Duration::from_millis(delay_ms.saturating_mul(attempt as u64)));
            }
            Err(e) => return Err(e),
        }
    }
}

pub fn open_with_backoff(path: &Path, tries: usize, delay_ms: u64) -> io::Result<File> {
    with_retries(tries, delay_ms, || File::open(path))
}

pub fn create_with_backoff(path: &Path, tries: usize, delay_ms: u64) -> io::Result<File> {
    with_retries(tries, delay_ms, || File::create(path))
}

/// Remove `path`; a missing file counts as success.
pub fn remove_with_backoff(path: &Path, tries: usize, delay_ms: u64) -> Result<()> {
    match with_retries(tries, delay_ms, || fs::remove_file(path)) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("remove {}", path.display())),
    }
}

/// Promote a finished temp file onto `dest`, replacing any previous artifact.
///
/// Rename over the old file first so `dest` never goes missing where the platform
/// allows it. Only if that is refused is the old file removed and the rename retried,
/// then copy+remove as a last resort (cross-device, sharing).
pub fn replace_file_atomic_backoff(tmp: &Path, dest: &Path) -> Result<()> {
    if with_retries(20, 50, || fs::rename(tmp, dest)).is_ok() {
        return Ok(());
    }
    if dest.is_file() {
        remove_with_backoff(dest, 20, 50)?;
        if with_retries(20, 50, || fs::rename(tmp, dest)).is_ok() {
            return Ok(());
        }
    }
    with_retries(20, 50, || fs::copy(tmp, dest))
        .with_context(|| format!("copy {} -> {}", tmp.display(), dest.display()))?;
    remove_with_backoff(tmp, 20, 50)
}
