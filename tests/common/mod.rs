#![allow(dead_code)]

use socialmr::Record;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use tempfile::TempDir;

pub fn rec(id: &str, user: &str, text: &str, ts: &str, likes: u64, reposts: u64) -> Record {
    Record::new(id, user, text, ts, likes, reposts, "NYC")
}

/// The four-record scenario:
/// - t1 (alice, 2024-01-01): "love" + "great" → +2
/// - t2 (bob,   2024-01-01): "bad"            → -1
/// - t3 (alice, 2024-01-02): no lexicon words → 0
/// - t4 (carol, 2024-01-02): no lexicon words → 0
pub fn four_records() -> Vec<Record> {
    vec![
        rec("t1", "alice", "i love this great day", "2024-01-01T09:00:00Z", 10, 2),
        rec("t2", "bob", "bad weather today", "2024-01-01 18:30:00", 3, 1),
        rec("t3", "alice", "just a normal day", "2024-01-02T08:15:00", 5, 0),
        rec("t4", "carol", "nothing special today", "2024-01-02", 0, 4),
    ]
}

/// A larger synthetic set (deterministic) for K-invariance checks.
pub fn synthetic_records(n: usize) -> Vec<Record> {
    let words = ["rust", "good", "bad", "data", "love", "hate", "day", "news", "great", "terrible"];
    let users = ["u1", "u2", "u3", "u4", "u5"];
    (0..n)
        .map(|i| {
            let text = (0..(i % 5 + 1))
                .map(|j| words[(i * 7 + j * 3) % words.len()])
                .collect::<Vec<_>>()
                .join(" ");
            Record::new(
                format!("r{i}"),
                users[i % users.len()],
                text,
                format!("2024-02-{:02}T12:00:00Z", i % 9 + 1),
                (i * 13 % 50) as u64,
                (i * 5 % 7) as u64,
                if i % 2 == 0 { "NYC" } else { "LA" },
            )
        })
        .collect()
}

pub fn write_file(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut f = File::create(path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
}

/// Write `content` into a zstd-compressed file.
pub fn write_zst(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    enc.write_all(content.as_bytes()).unwrap();
    enc.finish().unwrap();
}

pub const CSV_HEADER: &str = "tweet_id,user_id,cleaned_text,timestamp,likes,retweets,location\n";

pub fn four_records_csv() -> String {
    let mut s = String::from(CSV_HEADER);
    for r in four_records() {
        s.push_str(&format!("{},{},{},{},{},{},{}\n", r.id, r.user, r.text, r.timestamp, r.likes, r.reposts, r.location));
    }
    s
}

pub fn read_lines(path: &Path) -> Vec<String> {
    let f = File::open(path).unwrap();
    BufReader::new(f).lines().map(|l| l.unwrap()).filter(|s| !s.is_empty()).collect()
}

/// Scratch directory; removed when the guard drops, so keep it bound for the test's length.
pub fn scratch_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}
