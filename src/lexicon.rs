//! Sentiment and emotion lexicons, pluggable by method name.
//!
//! The map stage only needs `tokens → i64` (or `tokens → emotion counts`), so every
//! scorer is a pure, shareable value passed in through the pipeline options.

use ahash::{AHashMap, AHashSet};
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Integer scores keep reductions exact regardless of chunking.
pub trait SentimentScorer: Send + Sync {
    fn name(&self) -> &str;
    fn score<'t>(&self, tokens: &mut dyn Iterator<Item = &'t str>) -> i64;

    fn score_text(&self, text: &str) -> i64 {
        self.score(&mut text.split_whitespace())
    }
}

#[inline]
fn fold_case(token: &str) -> Cow<'_, str> {
    if token.bytes().any(|b| b.is_ascii_uppercase()) || !token.is_ascii() {
        Cow::Owned(token.to_lowercase())
    } else {
        Cow::Borrowed(token)
    }
}

const BING_POSITIVE: &[&str] = &[
    "amazing", "awesome", "beautiful", "best", "better", "brilliant", "cool", "enjoy", "excellent",
    "excited", "fantastic", "fun", "glad", "good", "great", "happy", "like", "love", "lovely",
    "nice", "perfect", "positive", "success", "super", "thanks", "win", "wonderful",
];

const BING_NEGATIVE: &[&str] = &[
    "angry", "annoying", "awful", "bad", "boring", "broken", "crash", "disappointed", "fail",
    "hate", "horrible", "negative", "poor", "problem", "sad", "scam", "sick", "terrible", "ugly",
    "worse", "worst", "wrong",
];

/// Binary positive/negative word sets: score = positive hits − negative hits.
#[derive(Clone, Debug)]
pub struct BingLexicon {
    positive: AHashSet<String>,
    negative: AHashSet<String>,
}

impl Default for BingLexicon {
    fn default() -> Self {
        Self::from_words(BING_POSITIVE.iter().copied(), BING_NEGATIVE.iter().copied())
    }
}

impl BingLexicon {
    pub fn from_words<P, N, S>(positive: P, negative: N) -> Self
    where
        P: IntoIterator<Item = S>,
        N: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            positive: positive.into_iter().map(|w| w.as_ref().trim().to_lowercase()).collect(),
            negative: negative.into_iter().map(|w| w.as_ref().trim().to_lowercase()).collect(),
        }
    }

    /// Add words to the positive and negative sets. A word listed on both sides ends up
    /// scoring zero, which is what the sets imply.
    pub fn extend<I, J>(&mut self, positive: I, negative: J)
    where
        I: IntoIterator<Item = String>,
        J: IntoIterator<Item = String>,
    {
        self.positive.extend(positive.into_iter().map(|w| w.to_lowercase()));
        self.negative.extend(negative.into_iter().map(|w| w.to_lowercase()));
    }

    pub fn positive_len(&self) -> usize {
        self.positive.len()
    }
    pub fn negative_len(&self) -> usize {
        self.negative.len()
    }
}

impl SentimentScorer for BingLexicon {
    fn name(&self) -> &str {
        "bing"
    }
    fn score<'t>(&self, tokens: &mut dyn Iterator<Item = &'t str>) -> i64 {
        let mut s = 0i64;
        for t in tokens {
            let t = fold_case(t);
            if self.positive.contains(t.as_ref()) {
                s += 1;
            }
            if self.negative.contains(t.as_ref()) {
                s -= 1;
            }
        }
        s
    }
}

const AFINN: &[(&str, i64)] = &[
    ("abandon", -2), ("amazing", 4), ("angry", -3), ("annoying", -2), ("awesome", 4),
    ("awful", -3), ("bad", -3), ("beautiful", 3), ("best", 3), ("better", 2), ("boring", -3),
    ("brilliant", 4), ("broken", -1), ("cool", 1), ("crash", -2), ("disappointed", -2),
    ("enjoy", 2), ("excellent", 3), ("excited", 3), ("fail", -2), ("fantastic", 4), ("fun", 4),
    ("glad", 3), ("good", 3), ("great", 3), ("happy", 3), ("hate", -3), ("horrible", -3),
    ("like", 2), ("love", 3), ("nice", 3), ("outstanding", 5), ("perfect", 3), ("poor", -2),
    ("problem", -2), ("sad", -2), ("scam", -2), ("sick", -2), ("superb", 5), ("terrible", -3),
    ("thanks", 2), ("torture", -4), ("ugly", -3), ("win", 4), ("wonderful", 4), ("worst", -3),
    ("wrong", -2),
];

/// Weighted lexicon: score = sum of per-word weights in `-5..=5`.
#[derive(Clone, Debug)]
pub struct AfinnLexicon {
    weights: AHashMap<String, i64>,
}

impl Default for AfinnLexicon {
    fn default() -> Self {
        Self { weights: AFINN.iter().map(|(w, v)| (w.to_string(), *v)).collect() }
    }
}

impl AfinnLexicon {
    pub fn weight(&self, word: &str) -> Option<i64> {
        self.weights.get(fold_case(word).as_ref()).copied()
    }
}

impl SentimentScorer for AfinnLexicon {
    fn name(&self) -> &str {
        "afinn"
    }
    fn score<'t>(&self, tokens: &mut dyn Iterator<Item = &'t str>) -> i64 {
        tokens.filter_map(|t| self.weights.get(fold_case(t).as_ref())).sum()
    }
}

/// Named scoring methods selectable from configuration or the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LexiconMethod {
    #[default]
    Bing,
    Afinn,
}

impl LexiconMethod {
    pub fn scorer(self) -> Arc<dyn SentimentScorer> {
        match self {
            LexiconMethod::Bing => Arc::new(BingLexicon::default()),
            LexiconMethod::Afinn => Arc::new(AfinnLexicon::default()),
        }
    }
}

impl fmt::Display for LexiconMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LexiconMethod::Bing => "bing",
            LexiconMethod::Afinn => "afinn",
        })
    }
}

impl FromStr for LexiconMethod {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bing" => Ok(LexiconMethod::Bing),
            "afinn" => Ok(LexiconMethod::Afinn),
            other => Err(format!("unknown lexicon method {other:?} (expected bing or afinn)")),
        }
    }
}

// ----------------------------- Emotions ------------------------------------

/// NRC-style emotion categories plus the two polarity buckets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Anger,
    Anticipation,
    Disgust,
    Fear,
    Joy,
    Sadness,
    Surprise,
    Trust,
    Negative,
    Positive,
}

impl Emotion {
    pub const ALL: [Emotion; 10] = [
        Emotion::Anger,
        Emotion::Anticipation,
        Emotion::Disgust,
        Emotion::Fear,
        Emotion::Joy,
        Emotion::Sadness,
        Emotion::Surprise,
        Emotion::Trust,
        Emotion::Negative,
        Emotion::Positive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Anger => "anger",
            Emotion::Anticipation => "anticipation",
            Emotion::Disgust => "disgust",
            Emotion::Fear => "fear",
            Emotion::Joy => "joy",
            Emotion::Sadness => "sadness",
            Emotion::Surprise => "surprise",
            Emotion::Trust => "trust",
            Emotion::Negative => "negative",
            Emotion::Positive => "positive",
        }
    }

    #[inline]
    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-emotion hit counts for some span of text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmotionCounts([u64; 10]);

impl EmotionCounts {
    pub fn get(&self, e: Emotion) -> u64 {
        self.0[e.slot()]
    }
    pub fn add(&mut self, e: Emotion, n: u64) {
        self.0[e.slot()] += n;
    }
    pub fn merge(&mut self, other: &EmotionCounts) {
        for (a, b) in self.0.iter_mut().zip(other.0.iter()) {
            *a += *b;
        }
    }
    pub fn iter(&self) -> impl Iterator<Item = (Emotion, u64)> + '_ {
        Emotion::ALL.iter().map(move |e| (*e, self.get(*e)))
    }
}

use Emotion::*;

const NRC: &[(&str, &[Emotion])] = &[
    ("abandon", &[Fear, Negative, Sadness]),
    ("amazing", &[Joy, Positive, Surprise]),
    ("angry", &[Anger, Disgust, Negative]),
    ("awful", &[Anger, Disgust, Fear, Negative, Sadness]),
    ("bad", &[Anger, Disgust, Fear, Negative, Sadness]),
    ("beautiful", &[Joy, Positive]),
    ("crash", &[Fear, Negative, Sadness, Surprise]),
    ("excited", &[Anticipation, Joy, Positive, Surprise]),
    ("fail", &[Disgust, Fear, Negative, Sadness]),
    ("fun", &[Anticipation, Joy, Positive]),
    ("good", &[Anticipation, Joy, Positive, Surprise, Trust]),
    ("happy", &[Anticipation, Joy, Positive, Trust]),
    ("hate", &[Anger, Disgust, Fear, Negative, Sadness]),
    ("hope", &[Anticipation, Joy, Positive, Surprise, Trust]),
    ("horrible", &[Anger, Disgust, Fear, Negative]),
    ("love", &[Joy, Positive]),
    ("perfect", &[Anticipation, Joy, Positive, Trust]),
    ("sad", &[Negative, Sadness]),
    ("scam", &[Anger, Disgust, Negative]),
    ("sick", &[Disgust, Negative, Sadness]),
    ("surprise", &[Fear, Joy, Positive, Surprise]),
    ("terrible", &[Anger, Disgust, Fear, Negative, Sadness]),
    ("trust", &[Trust]),
    ("win", &[Anticipation, Joy, Positive, Surprise, Trust]),
    ("worst", &[Negative]),
];

/// Word → emotion associations.
#[derive(Clone, Debug)]
pub struct EmotionLexicon {
    words: AHashMap<String, Vec<Emotion>>,
}

impl Default for EmotionLexicon {
    fn default() -> Self {
        Self { words: NRC.iter().map(|(w, es)| (w.to_string(), es.to_vec())).collect() }
    }
}

impl EmotionLexicon {
    pub fn counts<'t>(&self, tokens: impl IntoIterator<Item = &'t str>) -> EmotionCounts {
        let mut out = EmotionCounts::default();
        for t in tokens {
            if let Some(es) = self.words.get(fold_case(t).as_ref()) {
                for e in es {
                    out.add(*e, 1);
                }
            }
        }
        out
    }
}
