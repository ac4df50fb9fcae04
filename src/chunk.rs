//! Contiguous chunking of a record slice for the map stage.

use crate::error::PipelineError;
use crate::record::Record;

/// A borrowed, contiguous run of records handed to one map invocation.
#[derive(Clone, Copy, Debug)]
pub struct Chunk<'a> {
    pub index: usize,
    pub records: &'a [Record],
}

impl<'a> Chunk<'a> {
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Split `records` into chunks of `ceil(N / k)` records (the last one may be shorter).
///
/// Concatenating the chunks in index order reproduces `records` exactly. When `k > N`
/// the result is N single-record chunks; no empty chunk is ever produced.
pub fn chunk_records(records: &[Record], k: usize) -> Result<Vec<Chunk<'_>>, PipelineError> {
    if k == 0 {
        return Err(PipelineError::invalid("chunk count must be at least 1"));
    }
    if records.is_empty() {
        return Err(PipelineError::invalid("record set is empty"));
    }
    let size = records.len().div_ceil(k);
    Ok(records
        .chunks(size)
        .enumerate()
        .map(|(index, records)| Chunk { index, records })
        .collect())
}
