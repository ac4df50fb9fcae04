//! Text cleaning: the step that produces the whitespace-tokenizable `text` column
//! consumed by the map stage.

use crate::record::Record;
use ahash::AHashSet;
use regex::Regex;

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "has", "have", "i",
    "in", "is", "it", "its", "me", "my", "of", "on", "or", "so", "that", "the", "this", "to",
    "was", "we", "were", "with", "you", "your",
];

/// Compiled cleaning rules. Build once, share across threads.
#[derive(Clone, Debug)]
pub struct TextCleaner {
    url: Regex,
    mention: Regex,
    non_word: Regex,
    stopwords: Option<AHashSet<&'static str>>,
    min_token_len: usize,
}

impl Default for TextCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl TextCleaner {
    pub fn new() -> Self {
        Self {
            url: Regex::new(r"(?i)\b(?:https?://|www\.)\S+").expect("url regex"),
            mention: Regex::new(r"@\w+").expect("mention regex"),
            non_word: Regex::new(r"[^a-z0-9\s]+").expect("non-word regex"),
            stopwords: None,
            min_token_len: 1,
        }
    }

    pub fn with_stopwords(mut self, yes: bool) -> Self {
        self.stopwords = if yes { Some(STOPWORDS.iter().copied().collect()) } else { None };
        self
    }

    pub fn with_min_token_len(mut self, n: usize) -> Self {
        self.min_token_len = n.max(1);
        self
    }

    /// Lowercase, strip URLs and @mentions, keep hashtag words without `#`,
    /// fold apostrophes (`don't` → `dont`), drop punctuation and digit-only tokens.
    pub fn clean(&self, raw: &str) -> String {
        let lower = raw.to_lowercase().replace(['\'', '’'], "");
        let s = self.url.replace_all(&lower, " ");
        let s = self.mention.replace_all(&s, " ");
        let s = self.non_word.replace_all(&s, " ");
        let mut out = String::with_capacity(s.len());
        for tok in s.split_whitespace() {
            if tok.len() < self.min_token_len || tok.bytes().all(|b| b.is_ascii_digit()) {
                continue;
            }
            if let Some(stop) = &self.stopwords {
                if stop.contains(tok) {
                    continue;
                }
            }
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(tok);
        }
        out
    }

    pub fn clean_record(&self, rec: &Record) -> Record {
        Record { text: self.clean(&rec.text), ..rec.clone() }
    }

    /// Clean every record, dropping the ones left without any token.
    pub fn clean_records(&self, records: &[Record]) -> Vec<Record> {
        let out: Vec<Record> = records
            .iter()
            .map(|r| self.clean_record(r))
            .filter(|r| !r.text.is_empty())
            .collect();
        if out.len() < records.len() {
            tracing::info!(dropped = records.len() - out.len(), "records with no tokens after cleaning");
        }
        out
    }
}
