//! Emotion totals: NRC-style category hits summed over the whole record set.

use crate::analysis::Analysis;
use crate::chunk::Chunk;
use crate::error::PipelineError;
use crate::lexicon::{Emotion, EmotionCounts, EmotionLexicon};
use serde::Serialize;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EmotionTotal {
    pub emotion: Emotion,
    pub total: u64,
}

pub struct EmotionAnalysis {
    lexicon: Arc<EmotionLexicon>,
}

impl EmotionAnalysis {
    pub fn new(lexicon: Arc<EmotionLexicon>) -> Self {
        Self { lexicon }
    }
}

impl Default for EmotionAnalysis {
    fn default() -> Self {
        Self::new(Arc::new(EmotionLexicon::default()))
    }
}

impl Analysis for EmotionAnalysis {
    type Partial = EmotionCounts;
    type Row = EmotionTotal;

    fn name(&self) -> &'static str {
        "emotion totals"
    }

    fn map(&self, chunk: &Chunk<'_>) -> Result<Self::Partial, PipelineError> {
        let mut acc = EmotionCounts::default();
        for rec in chunk.records {
            acc.merge(&self.lexicon.counts(rec.tokens()));
        }
        Ok(acc)
    }

    /// Every category is reported, zeros included. Descending by total, ties by name.
    fn reduce(&self, partials: Vec<Self::Partial>) -> Vec<EmotionTotal> {
        let mut total = EmotionCounts::default();
        for p in &partials {
            total.merge(p);
        }
        let mut rows: Vec<EmotionTotal> = total.iter().map(|(emotion, n)| EmotionTotal { emotion, total: n }).collect();
        rows.sort_unstable_by(|a, b| b.total.cmp(&a.total).then_with(|| a.emotion.as_str().cmp(b.emotion.as_str())));
        rows
    }
}
