//! Daily sentiment: per-record lexicon scores grouped by calendar day.

use crate::analysis::Analysis;
use crate::chunk::Chunk;
use crate::date::{parse_day, serialize_day};
use crate::error::PipelineError;
use crate::lexicon::SentimentScorer;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use time::Date;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DailySentiment {
    #[serde(serialize_with = "serialize_day")]
    pub date: Date,
    pub avg_sentiment: f64,
    pub total_tweets: u64,
    pub positive_tweets: u64,
    pub negative_tweets: u64,
    pub neutral_tweets: u64,
}

pub struct SentimentAnalysis {
    scorer: Arc<dyn SentimentScorer>,
}

impl SentimentAnalysis {
    pub fn new(scorer: Arc<dyn SentimentScorer>) -> Self {
        Self { scorer }
    }
}

#[derive(Default)]
struct DayAcc {
    sum: i64,
    total: u64,
    positive: u64,
    negative: u64,
    neutral: u64,
}

impl DayAcc {
    fn push(&mut self, score: i64) {
        self.sum += score;
        self.total += 1;
        match score.signum() {
            1 => self.positive += 1,
            -1 => self.negative += 1,
            _ => self.neutral += 1,
        }
    }
}

impl Analysis for SentimentAnalysis {
    /// One `(day, score)` per record; nothing is grouped inside a chunk.
    type Partial = Vec<(Date, i64)>;
    type Row = DailySentiment;

    fn name(&self) -> &'static str {
        "daily sentiment"
    }

    fn map(&self, chunk: &Chunk<'_>) -> Result<Self::Partial, PipelineError> {
        let mut out = Vec::with_capacity(chunk.len());
        for rec in chunk.records {
            let day = parse_day(&rec.timestamp)
                .map_err(|reason| PipelineError::map_failure(chunk.index, rec.id.as_str(), reason))?;
            let score = self.scorer.score(&mut rec.tokens());
            out.push((day, score));
        }
        Ok(out)
    }

    /// Ascending by date. The mean is taken from the exact integer sum.
    fn reduce(&self, partials: Vec<Self::Partial>) -> Vec<DailySentiment> {
        let mut days: BTreeMap<Date, DayAcc> = BTreeMap::new();
        for (day, score) in partials.into_iter().flatten() {
            days.entry(day).or_default().push(score);
        }
        days.into_iter()
            .map(|(date, acc)| DailySentiment {
                date,
                avg_sentiment: acc.sum as f64 / acc.total as f64,
                total_tweets: acc.total,
                positive_tweets: acc.positive,
                negative_tweets: acc.negative,
                neutral_tweets: acc.neutral,
            })
            .collect()
    }
}
