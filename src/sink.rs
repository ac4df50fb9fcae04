//! Artifact writers. Tables are staged next to the destination as
//! `<name>.inprogress` and renamed into place only once fully flushed.

use crate::record::Record;
use crate::util::{create_with_backoff, remove_with_backoff, replace_file_atomic_backoff};
use anyhow::{Context, Result};
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// A row type with a fixed header, so empty tables still get one.
pub trait TableRow: Serialize {
    const HEADER: &'static [&'static str];
}

impl TableRow for Record {
    const HEADER: &'static [&'static str] = &["id", "user", "text", "timestamp", "likes", "reposts", "location"];
}

impl TableRow for crate::word_count::WordCount {
    const HEADER: &'static [&'static str] = &["word", "total_count"];
}

impl TableRow for crate::sentiment::DailySentiment {
    const HEADER: &'static [&'static str] = &[
        "date",
        "avg_sentiment",
        "total_tweets",
        "positive_tweets",
        "negative_tweets",
        "neutral_tweets",
    ];
}

impl TableRow for crate::engagement::UserEngagement {
    const HEADER: &'static [&'static str] = &[
        "user",
        "total_tweets",
        "total_likes",
        "total_retweets",
        "total_engagement",
        "avg_engagement",
    ];
}

impl TableRow for crate::emotion::EmotionTotal {
    const HEADER: &'static [&'static str] = &["emotion", "total"];
}

fn staging_path(dest: &Path) -> PathBuf {
    let mut name: OsString = dest.file_name().map(|n| n.to_os_string()).unwrap_or_else(|| "out".into());
    name.push(".inprogress");
    dest.with_file_name(name)
}

fn write_table<T: TableRow>(tmp: &Path, rows: &[T], write_buf: usize) -> Result<()> {
    let file = create_with_backoff(tmp, 16, 50).with_context(|| format!("create {}", tmp.display()))?;
    let mut w = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::with_capacity(write_buf.max(8 * 1024), file));
    w.write_record(T::HEADER)?;
    for r in rows {
        w.serialize(r)?;
    }
    let mut inner = w.into_inner().map_err(|e| anyhow::anyhow!("flush {}: {}", tmp.display(), e.error()))?;
    inner.flush()?;
    Ok(())
}

/// Write `rows` to the staging file beside `dest` and return its path. `dest` itself
/// is untouched until [`promote_staged`].
pub(crate) fn stage_csv<T: TableRow>(dest: &Path, rows: &[T], write_buf: usize) -> Result<PathBuf> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    }
    let tmp = staging_path(dest);
    if let Err(e) = write_table(&tmp, rows, write_buf) {
        let _ = remove_with_backoff(&tmp, 4, 25);
        return Err(e);
    }
    Ok(tmp)
}

pub(crate) fn promote_staged(tmp: &Path, dest: &Path) -> Result<()> {
    replace_file_atomic_backoff(tmp, dest)?;
    tracing::info!(path = %dest.display(), "wrote table");
    Ok(())
}

/// Best-effort removal of staging files after a failed multi-table write.
pub(crate) fn discard_staged(tmps: &[PathBuf]) {
    for tmp in tmps {
        if let Err(e) = remove_with_backoff(tmp, 4, 25) {
            tracing::warn!(path = %tmp.display(), error = %e, "could not remove staging file");
        }
    }
}

/// Write `rows` as CSV with a header to `dest`, replacing any previous file.
pub fn write_csv<T: TableRow>(dest: &Path, rows: &[T], write_buf: usize) -> Result<()> {
    let tmp = stage_csv(dest, rows, write_buf)?;
    promote_staged(&tmp, dest)
}
