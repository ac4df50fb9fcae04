#[path = "common/mod.rs"]
mod common;

use common::*;
use socialmr::{
    load_path, PipelineError, SentimentAnalysis, SocialPipeline, WordCountAnalysis, WorkerPool,
    DAILY_SENTIMENT_FILE, USER_STATS_FILE, WORD_COUNT_FILE,
};
use std::fs;
use std::path::Path;

fn staging_leftovers(dir: &Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".inprogress"))
        .collect()
}

/// `run_all` writes the three tables with their headers.
#[test]
fn run_all_writes_three_tables() {
    let tmp = scratch_dir();
    let out = tmp.path();
    let report = SocialPipeline::new().workers(2).run_all(&four_records(), out).unwrap();

    assert_eq!(report.word_counts, out.join(WORD_COUNT_FILE));
    assert_eq!(report.summary.total_records, 4);

    let words = read_lines(&report.word_counts);
    assert_eq!(words[0], "word,total_count");
    assert_eq!(words[1], "day,2");

    let daily = read_lines(&out.join(DAILY_SENTIMENT_FILE));
    assert_eq!(daily[0], "date,avg_sentiment,total_tweets,positive_tweets,negative_tweets,neutral_tweets");
    assert_eq!(daily.len(), 3);
    assert!(daily[1].starts_with("2024-01-01,0.5,2,1,1,0"));
    assert!(daily[2].starts_with("2024-01-02,"));

    let users = read_lines(&out.join(USER_STATS_FILE));
    assert_eq!(users[0], "user,total_tweets,total_likes,total_retweets,total_engagement,avg_engagement");
    assert!(users[1].starts_with("alice,2,15,2,17,8.5"));

    assert!(staging_leftovers(out).is_empty());
}

/// Two runs on identical input and K produce byte-identical files.
#[test]
fn reruns_are_byte_identical() {
    let records = synthetic_records(80);
    let (a, b) = (scratch_dir(), scratch_dir());
    SocialPipeline::new().workers(3).chunks(5).run_all(&records, a.path()).unwrap();
    SocialPipeline::new().workers(3).chunks(5).run_all(&records, b.path()).unwrap();
    for name in [WORD_COUNT_FILE, DAILY_SENTIMENT_FILE, USER_STATS_FILE] {
        assert_eq!(fs::read(a.path().join(name)).unwrap(), fs::read(b.path().join(name)).unwrap(), "{name}");
    }
}

/// Writing into a directory that already holds results replaces them in place.
#[test]
fn rerun_replaces_previous_tables() {
    let tmp = scratch_dir();
    let out = tmp.path();
    fs::write(out.join(WORD_COUNT_FILE), "stale\n").unwrap();
    SocialPipeline::new().workers(2).run_all(&four_records(), out).unwrap();
    assert_eq!(read_lines(&out.join(WORD_COUNT_FILE))[0], "word,total_count");

    let dest = out.join("words.csv");
    let p = SocialPipeline::new().workers(2);
    p.run_to_csv(&WordCountAnalysis, &four_records(), &dest).unwrap();
    p.run_to_csv(&WordCountAnalysis, &four_records()[..1], &dest).unwrap();
    assert_eq!(read_lines(&dest).len(), 6); // header + "i love this great day"
    assert!(staging_leftovers(out).is_empty());
}

/// A bad timestamp aborts the run: MapFailure naming the record, and no file written.
#[test]
fn map_failure_writes_nothing() {
    let mut records = four_records();
    records[1].timestamp = "not a date".into();
    let tmp = scratch_dir();
    let out = tmp.path().join("results");

    let err = SocialPipeline::new().workers(2).chunks(2).run_all(&records, &out).unwrap_err();
    let pe = err.downcast_ref::<PipelineError>().expect("typed pipeline error");
    assert!(matches!(pe, PipelineError::MapFailure { .. }));
    assert_eq!(pe.record_id(), Some("t2"));

    assert!(!out.join(WORD_COUNT_FILE).exists());
    assert!(!out.join(DAILY_SENTIMENT_FILE).exists());
    assert!(!out.join(USER_STATS_FILE).exists());
}

/// When the last table cannot be staged, none of the three is promoted and earlier
/// staging files are cleaned up; a previous result stays as it was.
#[cfg(unix)]
#[test]
fn write_failure_promotes_nothing() {
    let tmp = scratch_dir();
    let out = tmp.path();
    fs::write(out.join(WORD_COUNT_FILE), "previous\n").unwrap();
    // A directory where the user-stats staging file should go makes its creation fail.
    fs::create_dir(out.join(format!("{USER_STATS_FILE}.inprogress"))).unwrap();

    assert!(SocialPipeline::new().workers(2).run_all(&four_records(), out).is_err());

    assert_eq!(read_lines(&out.join(WORD_COUNT_FILE)), ["previous"]);
    assert!(!out.join(DAILY_SENTIMENT_FILE).exists());
    assert!(!out.join(USER_STATS_FILE).exists());
    assert!(!out.join(format!("{WORD_COUNT_FILE}.inprogress")).exists());
    assert!(!out.join(format!("{DAILY_SENTIMENT_FILE}.inprogress")).exists());
}

#[test]
fn empty_input_and_zero_chunks_rejected_up_front() {
    let err = SocialPipeline::new().workers(2).word_counts(&[]).unwrap_err();
    assert!(matches!(err, PipelineError::InvalidInput(_)));

    let err = SocialPipeline::new().workers(2).chunks(0).word_counts(&four_records()).unwrap_err();
    assert!(matches!(err, PipelineError::InvalidInput(_)));

    let err = SocialPipeline::new().workers(0).chunks(2).word_counts(&four_records()).unwrap_err();
    assert!(matches!(err, PipelineError::PoolUnavailable(_)));

    let tmp = scratch_dir();
    let err = SocialPipeline::new().workers(2).run_all(&[], tmp.path()).unwrap_err();
    assert!(matches!(err.downcast_ref::<PipelineError>(), Some(PipelineError::InvalidInput(_))));
}

/// Default sizing: hardware − reserve, never below 1.
#[test]
fn default_worker_count_has_floor_of_one() {
    let n = SocialPipeline::new().reserve(10_000).worker_count().unwrap();
    assert_eq!(n, 1);
    let rows = SocialPipeline::new().reserve(10_000).word_counts(&four_records()).unwrap();
    assert!(!rows.is_empty());
}

/// One caller-owned pool serves several analyses with the same results as per-run pools.
#[test]
fn shared_pool_matches_per_run_pools() {
    let records = synthetic_records(40);
    let p = SocialPipeline::new().workers(3).chunks(7);
    let pool = WorkerPool::new(3).unwrap();

    assert_eq!(p.run_with(&pool, &WordCountAnalysis, &records).unwrap(), p.word_counts(&records).unwrap());
    let sentiment = SentimentAnalysis::new(p.options().scorer.clone());
    assert_eq!(p.run_with(&pool, &sentiment, &records).unwrap(), p.daily_sentiment(&records).unwrap());

    let err = p.run_with(&pool, &WordCountAnalysis, &[]).unwrap_err();
    assert!(matches!(err, PipelineError::InvalidInput(_)));
}

/// CSV (with column aliases), NDJSON, and zstd inputs load to the same records,
/// and a directory is loaded file by file in path order.
#[test]
fn sources_load_csv_ndjson_and_zst() {
    let tmp = scratch_dir();
    let dir = tmp.path();
    let csv_path = dir.join("in").join("a_tweets.csv");
    write_file(&csv_path, &four_records_csv());
    assert_eq!(load_path(&csv_path).unwrap(), four_records());

    let ndjson: String = four_records()
        .iter()
        .map(|r| serde_json::to_string(r).unwrap() + "\n\n")
        .collect();
    let nd_path = dir.join("in").join("b_tweets.ndjson.zst");
    write_zst(&nd_path, &ndjson);
    assert_eq!(load_path(&nd_path).unwrap(), four_records());

    write_file(&dir.join("in").join("notes.txt"), "ignored");
    let all = load_path(&dir.join("in")).unwrap();
    assert_eq!(all.len(), 8);
    assert_eq!(all[0].id, "t1");
    assert_eq!(all[4].id, "t1");

    // The configured read buffer reaches every loader, plain and compressed.
    let small = SocialPipeline::new().io_read_buffer(8 * 1024);
    assert_eq!(small.options().read_buffer_bytes, 8 * 1024);
    assert_eq!(small.load(&dir.join("in")).unwrap(), all);
}

/// Exports that keep the raw text beside the cleaned one (and a date beside the
/// timestamp) load with the cleaned text and the full timestamp.
#[test]
fn cleaned_export_with_duplicate_columns() {
    let tmp = scratch_dir();
    let p = tmp.path().join("tweets_cleaned.csv");
    write_file(
        &p,
        "tweet_id,user_id,text,cleaned_text,timestamp,date,likes,retweets,location\n\
         t1,alice,I LOVE this!!! http://x.co,i love this,2024-01-01T09:00:00Z,2024-01-01,10,2,NYC\n\
         t2,bob,Bad weather @you,bad weather,,2024-01-03,3,1,LA\n",
    );
    let recs = load_path(&p).unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].text, "i love this");
    assert_eq!(recs[0].timestamp, "2024-01-01T09:00:00Z");
    assert_eq!((recs[0].likes, recs[0].reposts), (10, 2));
    assert_eq!(recs[1].text, "bad weather");
    assert_eq!(recs[1].timestamp, "2024-01-03");

    let rows = SocialPipeline::new().workers(2).daily_sentiment(&recs).unwrap();
    assert_eq!(rows.len(), 2);
}

/// A negative like count or a row without a timestamp is rejected at load time with the row number.
#[test]
fn invalid_rows_fail_at_load() {
    let tmp = scratch_dir();
    let dir = tmp.path();
    let p = dir.join("bad.csv");
    write_file(&p, &format!("{CSV_HEADER}t1,alice,hello,2024-01-01,-3,0,NYC\n"));
    let err = load_path(&p).unwrap_err();
    let pe = err.downcast_ref::<PipelineError>().expect("typed error");
    assert!(matches!(pe, PipelineError::InvalidInput(_)));
    assert!(pe.to_string().contains("row 1"));

    let p = dir.join("no_time.csv");
    write_file(&p, &format!("{CSV_HEADER}t1,alice,hello,2024-01-01,1,0,NYC\nt2,bob,hi,,1,0,NYC\n"));
    let err = load_path(&p).unwrap_err().to_string();
    assert!(err.contains("row 2") && err.contains("timestamp"), "{err}");

    let unknown = dir.join("data.parquet");
    write_file(&unknown, "x");
    assert!(load_path(&unknown).is_err());
}

/// `run_to_csv` persists any analysis through its table header.
#[test]
fn run_to_csv_single_analysis() {
    let tmp = scratch_dir();
    let out = tmp.path().join("nested").join("words.csv");
    let rows = SocialPipeline::new()
        .workers(2)
        .run_to_csv(&WordCountAnalysis, &four_records(), &out)
        .unwrap();
    let lines = read_lines(&out);
    assert_eq!(lines.len(), rows.len() + 1);
    assert_eq!(lines[0], "word,total_count");
}
