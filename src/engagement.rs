//! User engagement: likes + reposts projected per record, then summed per user.

use crate::analysis::Analysis;
use crate::chunk::Chunk;
use crate::error::PipelineError;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Projection emitted by the engagement map, one per record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngagementTuple {
    pub user: String,
    pub likes: u64,
    pub reposts: u64,
    pub engagement: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserEngagement {
    pub user: String,
    pub total_tweets: u64,
    pub total_likes: u64,
    pub total_retweets: u64,
    pub total_engagement: u64,
    pub avg_engagement: f64,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct EngagementAnalysis;

#[derive(Default)]
struct UserAcc {
    tweets: u64,
    likes: u64,
    reposts: u64,
    engagement: u64,
}

impl Analysis for EngagementAnalysis {
    type Partial = Vec<EngagementTuple>;
    type Row = UserEngagement;

    fn name(&self) -> &'static str {
        "user engagement"
    }

    fn map(&self, chunk: &Chunk<'_>) -> Result<Self::Partial, PipelineError> {
        chunk
            .records
            .iter()
            .map(|r| {
                let engagement = r
                    .engagement()
                    .ok_or_else(|| PipelineError::map_failure(chunk.index, r.id.as_str(), "engagement overflow"))?;
                Ok(EngagementTuple { user: r.user.clone(), likes: r.likes, reposts: r.reposts, engagement })
            })
            .collect()
    }

    /// Descending by total engagement; ties broken by user ascending.
    /// Per-user totals saturate at `u64::MAX`.
    fn reduce(&self, partials: Vec<Self::Partial>) -> Vec<UserEngagement> {
        let mut users: AHashMap<String, UserAcc> = AHashMap::new();
        for t in partials.into_iter().flatten() {
            let acc = users.entry(t.user).or_default();
            acc.tweets += 1;
            acc.likes = acc.likes.saturating_add(t.likes);
            acc.reposts = acc.reposts.saturating_add(t.reposts);
            acc.engagement = acc.engagement.saturating_add(t.engagement);
        }
        let mut rows: Vec<UserEngagement> = users
            .into_iter()
            .map(|(user, acc)| UserEngagement {
                user,
                total_tweets: acc.tweets,
                total_likes: acc.likes,
                total_retweets: acc.reposts,
                total_engagement: acc.engagement,
                avg_engagement: acc.engagement as f64 / acc.tweets as f64,
            })
            .collect();
        rows.sort_unstable_by(|a, b| {
            b.total_engagement.cmp(&a.total_engagement).then_with(|| a.user.cmp(&b.user))
        });
        rows
    }
}

/// Headline numbers for a dataset, derived from the per-user table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub total_records: u64,
    pub unique_users: u64,
    pub avg_likes_per_record: f64,
}

impl Summary {
    pub fn from_engagement(rows: &[UserEngagement]) -> Self {
        let total_records: u64 = rows.iter().map(|r| r.total_tweets).sum();
        let likes = rows.iter().fold(0u64, |acc, r| acc.saturating_add(r.total_likes));
        Self {
            total_records,
            unique_users: rows.len() as u64,
            avg_likes_per_record: if total_records == 0 { 0.0 } else { likes as f64 / total_records as f64 },
        }
    }
}
