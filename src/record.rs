use serde::{Deserialize, Serialize};

/// One social-media post as loaded from a CSV, NDJSON, or document-store source.
///
/// Numeric engagement counters are unsigned, so negative or fractional values are
/// rejected by the parser rather than discovered during aggregation. The timestamp
/// stays as written; the sentiment map extracts the calendar day from it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRecord")]
pub struct Record {
    pub id: String,
    pub user: String,
    pub text: String,
    pub timestamp: String,
    pub likes: u64,
    pub reposts: u64,
    pub location: String,
}

/// Input row as it appears on disk. Exports differ in column naming and often carry
/// several candidates for the same field (`text` next to `cleaned_text`), so every
/// name is read and the preferred one is picked in `TryFrom`.
#[derive(Debug, Default, Deserialize)]
struct RawRecord {
    id: Option<String>,
    tweet_id: Option<String>,
    post_id: Option<String>,

    user: Option<String>,
    user_id: Option<String>,
    username: Option<String>,

    cleaned_text: Option<String>,
    clean_text: Option<String>,
    text: Option<String>,

    timestamp: Option<String>,
    created_at: Option<String>,
    date: Option<String>,

    likes: Option<u64>,
    reposts: Option<u64>,
    retweets: Option<u64>,
    location: Option<String>,
}

/// First present, non-blank candidate.
fn pick(candidates: [Option<String>; 3]) -> Option<String> {
    candidates.into_iter().flatten().find(|s| !s.trim().is_empty())
}

impl TryFrom<RawRecord> for Record {
    type Error = String;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let id = pick([raw.id, raw.tweet_id, raw.post_id]).ok_or("missing id column (id/tweet_id/post_id)")?;
        let user = pick([raw.user, raw.user_id, raw.username])
            .ok_or_else(|| format!("record {id}: missing user column (user/user_id/username)"))?;
        let timestamp = pick([raw.timestamp, raw.created_at, raw.date])
            .ok_or_else(|| format!("record {id}: missing timestamp column (timestamp/created_at/date)"))?;
        Ok(Self {
            text: pick([raw.cleaned_text, raw.clean_text, raw.text]).unwrap_or_default(),
            likes: raw.likes.unwrap_or(0),
            reposts: raw.reposts.or(raw.retweets).unwrap_or(0),
            location: raw.location.unwrap_or_default(),
            id,
            user,
            timestamp,
        })
    }
}

impl Record {
    pub fn new(
        id: impl Into<String>,
        user: impl Into<String>,
        text: impl Into<String>,
        timestamp: impl Into<String>,
        likes: u64,
        reposts: u64,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            user: user.into(),
            text: text.into(),
            timestamp: timestamp.into(),
            likes,
            reposts,
            location: location.into(),
        }
    }

    /// Whitespace tokens of the (already cleaned) text.
    #[inline]
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.text.split_whitespace()
    }

    /// `likes + reposts`, or `None` when the sum does not fit in a `u64`.
    #[inline]
    pub fn engagement(&self) -> Option<u64> {
        self.likes.checked_add(self.reposts)
    }
}
