//! Document-store seam: an alternate record source/sink for the pipeline.
//!
//! `DocumentStore` mirrors the operations the analyses need from a collection
//! (insert / count / find / aggregate / drop). `MemoryStore` is an in-process
//! implementation; documents are `serde_json::Value`s shaped like `Record`.

use crate::date::{format_day, parse_day};
use crate::record::Record;
use anyhow::{anyhow, Result};
use parking_lot::RwLock;
use serde_json::{json, Map, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Conjunctive record filter. `None` fields match everything.
#[derive(Clone, Debug, Default)]
pub struct RecordFilter {
    pub user: Option<String>,
    pub location: Option<String>,
    pub min_likes: Option<u64>,
    /// Case-insensitive whole-token match on the text.
    pub keyword: Option<String>,
}

impl RecordFilter {
    pub fn all() -> Self {
        Self::default()
    }
    pub fn user(mut self, u: impl Into<String>) -> Self {
        self.user = Some(u.into());
        self
    }
    pub fn location(mut self, l: impl Into<String>) -> Self {
        self.location = Some(l.into());
        self
    }
    pub fn min_likes(mut self, n: u64) -> Self {
        self.min_likes = Some(n);
        self
    }
    pub fn keyword(mut self, k: impl AsRef<str>) -> Self {
        self.keyword = Some(k.as_ref().trim().to_lowercase());
        self
    }

    pub fn matches(&self, r: &Record) -> bool {
        if let Some(u) = &self.user {
            if &r.user != u {
                return false;
            }
        }
        if let Some(l) = &self.location {
            if !r.location.eq_ignore_ascii_case(l) {
                return false;
            }
        }
        if let Some(n) = self.min_likes {
            if r.likes < n {
                return false;
            }
        }
        if let Some(k) = &self.keyword {
            if !r.tokens().any(|t| t.eq_ignore_ascii_case(k)) {
                return false;
            }
        }
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupKey {
    User,
    Location,
    /// Calendar day of the timestamp; unparseable timestamps group under `"invalid"`.
    Date,
}

/// Aggregation stages, applied in order.
///
/// `Match` and `Group` operate on records and must come before `Sort`/`Limit`
/// stages that reference group output fields. `Group` emits documents
/// `{_id, count, total_likes, total_reposts}`.
#[derive(Clone, Debug)]
pub enum Stage {
    Match(RecordFilter),
    Group(GroupKey),
    Sort { field: String, descending: bool },
    Limit(usize),
}

pub trait DocumentStore: Send + Sync {
    /// Append records; returns how many were inserted.
    fn insert(&self, records: &[Record]) -> Result<usize>;
    fn count(&self) -> usize;
    /// Matching documents, optionally projected onto `fields` and truncated to `limit`.
    fn find(&self, filter: &RecordFilter, fields: Option<&[&str]>, limit: Option<usize>) -> Result<Vec<Value>>;
    fn aggregate(&self, pipeline: &[Stage]) -> Result<Vec<Value>>;
    /// Remove every document.
    fn drop_collection(&self) -> Result<()>;

    /// Typed read of matching records, in insertion order.
    fn find_records(&self, filter: &RecordFilter, limit: Option<usize>) -> Result<Vec<Record>> {
        self.find(filter, None, limit)?
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(|e| anyhow!("document is not a record: {e}")))
            .collect()
    }
}

#[derive(Default)]
pub struct MemoryStore {
    docs: RwLock<Vec<Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn project(doc: Value, fields: Option<&[&str]>) -> Value {
    match (doc, fields) {
        (Value::Object(obj), Some(fields)) => {
            let mut out = Map::new();
            for f in fields {
                if let Some(v) = obj.get(*f) {
                    out.insert((*f).to_string(), v.clone());
                }
            }
            Value::Object(out)
        }
        (doc, _) => doc,
    }
}

fn compare_field(a: &Value, b: &Value, field: &str) -> Ordering {
    match (a.get(field), b.get(field)) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

#[derive(Default)]
struct GroupAcc {
    count: u64,
    likes: u64,
    reposts: u64,
}

fn group(records: &[Record], key: GroupKey) -> Vec<Value> {
    let mut groups: BTreeMap<String, GroupAcc> = BTreeMap::new();
    for r in records {
        let k = match key {
            GroupKey::User => r.user.clone(),
            GroupKey::Location => r.location.clone(),
            GroupKey::Date => parse_day(&r.timestamp).map(format_day).unwrap_or_else(|_| "invalid".into()),
        };
        let acc = groups.entry(k).or_default();
        acc.count += 1;
        acc.likes = acc.likes.saturating_add(r.likes);
        acc.reposts = acc.reposts.saturating_add(r.reposts);
    }
    groups
        .into_iter()
        .map(|(id, acc)| json!({"_id": id, "count": acc.count, "total_likes": acc.likes, "total_reposts": acc.reposts}))
        .collect()
}

impl DocumentStore for MemoryStore {
    fn insert(&self, records: &[Record]) -> Result<usize> {
        self.docs.write().extend_from_slice(records);
        Ok(records.len())
    }

    fn count(&self) -> usize {
        self.docs.read().len()
    }

    fn find(&self, filter: &RecordFilter, fields: Option<&[&str]>, limit: Option<usize>) -> Result<Vec<Value>> {
        let docs = self.docs.read();
        docs.iter()
            .filter(|r| filter.matches(r))
            .take(limit.unwrap_or(usize::MAX))
            .map(|r| Ok(project(serde_json::to_value(r)?, fields)))
            .collect()
    }

    fn aggregate(&self, pipeline: &[Stage]) -> Result<Vec<Value>> {
        let mut records: Vec<Record> = self.docs.read().clone();

        let mut out: Option<Vec<Value>> = None;
        for stage in pipeline {
            match stage {
                Stage::Match(f) => {
                    if out.is_some() {
                        return Err(anyhow!("match must precede group and sort stages"));
                    }
                    records.retain(|r| f.matches(r));
                }
                Stage::Group(key) => {
                    if out.is_some() {
                        return Err(anyhow!("group must be the first document-producing stage"));
                    }
                    out = Some(group(&records, *key));
                }
                Stage::Sort { field, descending } => {
                    let mut v = match out.take() {
                        Some(v) => v,
                        None => records.iter().map(serde_json::to_value).collect::<Result<Vec<_>, _>>()?,
                    };
                    v.sort_by(|a, b| {
                        let o = compare_field(a, b, field);
                        if *descending { o.reverse() } else { o }
                    });
                    out = Some(v);
                }
                Stage::Limit(n) => match out.as_mut() {
                    Some(v) => v.truncate(*n),
                    None => records.truncate(*n),
                },
            }
        }
        match out {
            Some(v) => Ok(v),
            None => records.iter().map(|r| Ok(serde_json::to_value(r)?)).collect(),
        }
    }

    fn drop_collection(&self) -> Result<()> {
        self.docs.write().clear();
        Ok(())
    }
}
