#[path = "common/mod.rs"]
mod common;

use common::*;
use socialmr::{chunk_records, PipelineError, Record};

/// Concatenating chunks in index order reproduces the input for every N and K tried.
#[test]
fn chunks_cover_input_exactly_once() {
    for n in 1..=23usize {
        let records = synthetic_records(n);
        for k in 1..=30usize {
            let chunks = chunk_records(&records, k).unwrap();
            let joined: Vec<Record> = chunks.iter().flat_map(|c| c.records.iter().cloned()).collect();
            assert_eq!(joined, records, "n={n} k={k}");

            let size = n.div_ceil(k);
            assert!(chunks.iter().all(|c| !c.is_empty()), "no empty chunks (n={n} k={k})");
            assert!(chunks.iter().all(|c| c.len() <= size));
            assert_eq!(chunks.len(), n.div_ceil(size));
            for (i, c) in chunks.iter().enumerate() {
                assert_eq!(c.index, i);
            }
        }
    }
}

/// K larger than N: N single-record chunks, nothing lost.
#[test]
fn more_chunks_than_records() {
    let records = four_records();
    let chunks = chunk_records(&records, 10).unwrap();
    assert_eq!(chunks.len(), 4);
    assert!(chunks.iter().all(|c| c.len() == 1));
    let ids: Vec<&str> = chunks.iter().map(|c| c.records[0].id.as_str()).collect();
    assert_eq!(ids, ["t1", "t2", "t3", "t4"]);
}

/// Ceiling division: 10 records over 4 chunks → 3,3,3,1.
#[test]
fn last_chunk_may_be_smaller() {
    let records = synthetic_records(10);
    let sizes: Vec<usize> = chunk_records(&records, 4).unwrap().iter().map(|c| c.len()).collect();
    assert_eq!(sizes, [3, 3, 3, 1]);
}

#[test]
fn zero_chunks_and_empty_input_are_invalid() {
    let records = four_records();
    assert!(matches!(chunk_records(&records, 0), Err(PipelineError::InvalidInput(_))));
    assert!(matches!(chunk_records(&[], 3), Err(PipelineError::InvalidInput(_))));
}
