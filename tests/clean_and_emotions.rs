#[path = "common/mod.rs"]
mod common;

use common::*;
use socialmr::{load_path, write_csv, Emotion, EmotionLexicon, SocialPipeline, TextCleaner, EMOTION_TOTALS_FILE};

#[test]
fn cleaner_strips_noise() {
    let c = TextCleaner::new();
    assert_eq!(
        c.clean("Loving the new #RustLang release!!! https://t.co/xyz @ferris don't miss it 2024"),
        "loving the new rustlang release dont miss it"
    );
    assert_eq!(c.clean("   "), "");

    let c = TextCleaner::new().with_stopwords(true).with_min_token_len(3);
    assert_eq!(c.clean("This is a GREAT day for the team, ok?"), "great day team");
}

/// Records with nothing left after cleaning are dropped; the rest keep their metadata.
#[test]
fn clean_records_and_write_csv() {
    let raw = vec![
        rec("1", "alice", "Great DAY!!! http://x.y", "2024-01-01", 3, 1),
        rec("2", "bob", "@someone 123 !!!", "2024-01-01", 0, 0),
    ];
    let cleaned = TextCleaner::new().clean_records(&raw);
    assert_eq!(cleaned.len(), 1);
    assert_eq!(cleaned[0].text, "great day");
    assert_eq!(cleaned[0].likes, 3);

    let tmp = scratch_dir();
    let out = tmp.path().join("tweets_cleaned.csv");
    write_csv(&out, &cleaned, 64 * 1024).unwrap();
    assert_eq!(read_lines(&out)[0], "id,user,text,timestamp,likes,reposts,location");
    assert_eq!(load_path(&out).unwrap(), cleaned);
}

#[test]
fn emotion_lexicon_counts() {
    let lex = EmotionLexicon::default();
    let c = lex.counts("so happy and hope to win".split_whitespace());
    assert_eq!(c.get(Emotion::Joy), 3);
    assert_eq!(c.get(Emotion::Trust), 3);
    assert_eq!(c.get(Emotion::Anger), 0);
}

/// Emotion totals cover every category and agree across chunkings.
#[test]
fn emotion_totals_all_categories() {
    let records = synthetic_records(30);
    let one = SocialPipeline::new().workers(1).chunks(1).emotion_totals(&records).unwrap();
    let many = SocialPipeline::new().workers(3).chunks(9).emotion_totals(&records).unwrap();
    assert_eq!(one, many);
    assert_eq!(one.len(), Emotion::ALL.len());
    assert!(one.windows(2).all(|w| w[0].total >= w[1].total));

    let tmp = scratch_dir();
    let out = tmp.path().join(EMOTION_TOTALS_FILE);
    write_csv(&out, &one, 64 * 1024).unwrap();
    let lines = read_lines(&out);
    assert_eq!(lines[0], "emotion,total");
    assert_eq!(lines.len(), 11);
}
