//! Record sources: CSV or NDJSON files (optionally `.zst`), or a directory of them.
//!
//! Rows are validated as they are parsed; the first bad row fails the load with
//! `PipelineError::InvalidInput` naming the file and row number.

use crate::error::PipelineError;
use crate::record::Record;
use crate::util::open_with_backoff;
use anyhow::{Context, Result};
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zstd::stream::read::Decoder;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Ndjson,
}

/// Classify a path by extension: `(format, zstd_compressed)`.
pub fn detect_format(path: &Path) -> Option<(InputFormat, bool)> {
    let name = path.file_name()?.to_str()?.to_ascii_lowercase();
    let (stem, zst) = match name.strip_suffix(".zst") {
        Some(stem) => (stem.to_string(), true),
        None => (name, false),
    };
    if stem.ends_with(".csv") {
        Some((InputFormat::Csv, zst))
    } else if stem.ends_with(".ndjson") || stem.ends_with(".jsonl") {
        Some((InputFormat::Ndjson, zst))
    } else {
        None
    }
}

fn open_input(path: &Path, zst: bool, read_buf: usize) -> Result<Box<dyn Read>> {
    let file = open_with_backoff(path, 16, 50).with_context(|| format!("open {}", path.display()))?;
    if zst {
        let mut dec = Decoder::new(file).with_context(|| format!("zstd header {}", path.display()))?;
        dec.window_log_max(31)?;
        Ok(Box::new(BufReader::with_capacity(read_buf, dec)))
    } else {
        Ok(Box::new(BufReader::with_capacity(read_buf, file)))
    }
}

fn bad_row(path: &Path, row: usize, err: impl std::fmt::Display) -> anyhow::Error {
    PipelineError::invalid(format!("{} row {}: {}", path.display(), row, err)).into()
}

/// Parse CSV with a header row. Row numbers in errors are 1-based data rows.
pub fn read_csv<R: Read>(reader: R, path: &Path) -> Result<Vec<Record>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut out = Vec::new();
    for (i, row) in rdr.deserialize::<Record>().enumerate() {
        out.push(row.map_err(|e| bad_row(path, i + 1, e))?);
    }
    Ok(out)
}

/// Parse one JSON object per line; blank lines are skipped.
pub fn read_ndjson<R: Read>(reader: R, path: &Path) -> Result<Vec<Record>> {
    let mut r = BufReader::new(reader);
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut line_no = 0usize;
    loop {
        buf.clear();
        if r.read_line(&mut buf)? == 0 {
            break;
        }
        line_no += 1;
        let line = buf.trim();
        if line.is_empty() {
            continue;
        }
        let rec: Record = serde_json::from_str(line).map_err(|e| bad_row(path, line_no, e))?;
        out.push(rec);
    }
    Ok(out)
}

pub const DEFAULT_READ_BUFFER: usize = 256 * 1024;

/// Load one input file with the default read buffer.
pub fn load_file(path: &Path) -> Result<Vec<Record>> {
    load_file_cfg(path, DEFAULT_READ_BUFFER)
}

pub fn load_file_cfg(path: &Path, read_buf: usize) -> Result<Vec<Record>> {
    let (format, zst) = detect_format(path)
        .ok_or_else(|| PipelineError::invalid(format!("unsupported input type: {}", path.display())))?;
    let reader = open_input(path, zst, read_buf.max(8 * 1024))?;
    let recs = match format {
        InputFormat::Csv => read_csv(reader, path)?,
        InputFormat::Ndjson => read_ndjson(reader, path)?,
    };
    tracing::info!(path = %path.display(), records = recs.len(), "loaded input");
    Ok(recs)
}

/// Supported input files directly under or below `dir`, sorted for a stable load order.
pub fn discover_inputs(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && detect_format(e.path()).is_some())
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// Load a file, or every supported file under a directory (concatenated in path order).
pub fn load_path(path: &Path) -> Result<Vec<Record>> {
    load_path_cfg(path, DEFAULT_READ_BUFFER)
}

pub fn load_path_cfg(path: &Path, read_buf: usize) -> Result<Vec<Record>> {
    if !path.is_dir() {
        return load_file_cfg(path, read_buf);
    }
    let files = discover_inputs(path);
    if files.is_empty() {
        tracing::warn!(dir = %path.display(), "no .csv/.ndjson/.jsonl inputs found");
    }
    let mut all = Vec::new();
    for f in &files {
        all.extend(load_file_cfg(f, read_buf)?);
    }
    Ok(all)
}
