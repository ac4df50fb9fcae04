#[path = "common/mod.rs"]
mod common;

use common::*;
use socialmr::{DocumentStore, GroupKey, MemoryStore, Record, RecordFilter, SocialPipeline, Stage};

fn loaded_store() -> MemoryStore {
    let store = MemoryStore::new();
    let mut records = four_records();
    records[1].location = "LA".into();
    assert_eq!(store.insert(&records).unwrap(), 4);
    store
}

/// insert / count / drop_collection round out the collection lifecycle.
#[test]
fn insert_count_drop() {
    let store = loaded_store();
    assert_eq!(store.count(), 4);
    store.insert(&four_records()[..1]).unwrap();
    assert_eq!(store.count(), 5);
    store.drop_collection().unwrap();
    assert_eq!(store.count(), 0);
    assert!(store.find_records(&RecordFilter::all(), None).unwrap().is_empty());
}

/// Filters combine conjunctively; projection keeps only the named fields; limit truncates.
#[test]
fn find_with_filter_projection_and_limit() {
    let store = loaded_store();

    let alice = store.find_records(&RecordFilter::all().user("alice"), None).unwrap();
    assert_eq!(alice.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), ["t1", "t3"]);

    let popular = store.find(&RecordFilter::all().min_likes(5), Some(&["id", "likes"]), None).unwrap();
    assert_eq!(popular.len(), 2);
    for doc in &popular {
        let obj = doc.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert!(obj.contains_key("id") && obj.contains_key("likes"));
    }

    let today = store.find_records(&RecordFilter::all().keyword("TODAY"), Some(1)).unwrap();
    assert_eq!(today.len(), 1);
    assert_eq!(today[0].id, "t2");

    let la = store.find_records(&RecordFilter::all().location("la"), None).unwrap();
    assert_eq!(la.len(), 1);
}

/// match → group by user → sort by count desc → limit.
#[test]
fn aggregate_group_sort_limit() {
    let store = loaded_store();
    let docs = store
        .aggregate(&[
            Stage::Match(RecordFilter::all().location("NYC")),
            Stage::Group(GroupKey::User),
            Stage::Sort { field: "count".into(), descending: true },
            Stage::Limit(1),
        ])
        .unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0]["_id"], "alice");
    assert_eq!(docs[0]["count"], 2);
    assert_eq!(docs[0]["total_likes"], 15);

    let by_day = store.aggregate(&[Stage::Group(GroupKey::Date)]).unwrap();
    let days: Vec<&str> = by_day.iter().map(|d| d["_id"].as_str().unwrap()).collect();
    assert_eq!(days, ["2024-01-01", "2024-01-02"]);

    let bad = store.aggregate(&[Stage::Group(GroupKey::User), Stage::Match(RecordFilter::all())]);
    assert!(bad.is_err());
}

/// The store is an alternate record source: results match the in-memory run.
#[test]
fn pipeline_over_store_records() {
    let store = MemoryStore::new();
    store.insert(&synthetic_records(25)).unwrap();
    let from_store: Vec<Record> = store.find_records(&RecordFilter::all(), None).unwrap();
    let p = SocialPipeline::new().workers(2).chunks(4);
    assert_eq!(p.word_counts(&from_store).unwrap(), p.word_counts(&synthetic_records(25)).unwrap());
}

/// Group sums saturate rather than overflow on extreme counters.
#[test]
fn group_totals_saturate() {
    let store = MemoryStore::new();
    store
        .insert(&[
            Record::new("a", "dave", "x", "2024-01-01", u64::MAX, u64::MAX, "NYC"),
            Record::new("b", "dave", "y", "2024-01-01", 5, 5, "NYC"),
        ])
        .unwrap();
    let docs = store.aggregate(&[Stage::Group(GroupKey::User)]).unwrap();
    assert_eq!(docs[0]["count"], 2);
    assert_eq!(docs[0]["total_likes"], u64::MAX);
    assert_eq!(docs[0]["total_reposts"], u64::MAX);
}
