//! Word counts: per-chunk token tallies summed per word.

use crate::analysis::Analysis;
use crate::chunk::Chunk;
use crate::error::PipelineError;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub total_count: u64,
}

/// Tokens are the whitespace-separated pieces of the cleaned text, compared as-is
/// (cleaning already lowercases).
#[derive(Clone, Copy, Debug, Default)]
pub struct WordCountAnalysis;

pub fn count_words(chunk: &Chunk<'_>) -> AHashMap<String, u64> {
    let mut m: AHashMap<String, u64> = AHashMap::new();
    for rec in chunk.records {
        for tok in rec.tokens() {
            match m.get_mut(tok) {
                Some(c) => *c += 1,
                None => {
                    m.insert(tok.to_owned(), 1);
                }
            }
        }
    }
    m
}

pub fn merge_word_counts(total: &mut AHashMap<String, u64>, part: AHashMap<String, u64>) {
    for (k, v) in part {
        *total.entry(k).or_insert(0) += v;
    }
}

impl Analysis for WordCountAnalysis {
    type Partial = AHashMap<String, u64>;
    type Row = WordCount;

    fn name(&self) -> &'static str {
        "word counts"
    }

    fn map(&self, chunk: &Chunk<'_>) -> Result<Self::Partial, PipelineError> {
        Ok(count_words(chunk))
    }

    /// Descending by total; ties broken by word ascending.
    fn reduce(&self, partials: Vec<Self::Partial>) -> Vec<WordCount> {
        let mut total = AHashMap::new();
        for p in partials {
            merge_word_counts(&mut total, p);
        }
        let mut rows: Vec<WordCount> = total
            .into_iter()
            .map(|(word, total_count)| WordCount { word, total_count })
            .collect();
        rows.sort_unstable_by(|a, b| b.total_count.cmp(&a.total_count).then_with(|| a.word.cmp(&b.word)));
        rows
    }
}
