mod config;
mod date;
mod error;
mod record;
mod util;

mod chunk;
mod pool;
mod progress;
mod analysis;

mod word_count;
mod sentiment;
mod engagement;
mod emotion;
mod lexicon;
mod clean;

mod source;
mod sink;
mod store;
mod pipeline;

pub use crate::config::PipelineOptions;
pub use crate::error::PipelineError;
pub use crate::record::Record;
pub use crate::date::{format_day, parse_day};
pub use crate::pipeline::{
    RunReport, SocialPipeline, DAILY_SENTIMENT_FILE, EMOTION_TOTALS_FILE, USER_STATS_FILE, WORD_COUNT_FILE,
};

// Core map/reduce building blocks.
pub use crate::analysis::Analysis;
pub use crate::chunk::{chunk_records, Chunk};
pub use crate::pool::{default_worker_count, hardware_parallelism, WorkerPool};

// Analyses and their output rows.
pub use crate::word_count::{count_words, merge_word_counts, WordCount, WordCountAnalysis};
pub use crate::sentiment::{DailySentiment, SentimentAnalysis};
pub use crate::engagement::{EngagementAnalysis, EngagementTuple, Summary, UserEngagement};
pub use crate::emotion::{EmotionAnalysis, EmotionTotal};

// Lexicons (pluggable by method name).
pub use crate::lexicon::{
    AfinnLexicon, BingLexicon, Emotion, EmotionCounts, EmotionLexicon, LexiconMethod, SentimentScorer,
};

// Text cleaning for raw inputs.
pub use crate::clean::TextCleaner;

// Sources, sinks, and the document-store seam.
pub use crate::source::{detect_format, discover_inputs, load_file, load_file_cfg, load_path, load_path_cfg, read_csv, read_ndjson, InputFormat};
pub use crate::sink::{write_csv, TableRow};
pub use crate::store::{DocumentStore, GroupKey, MemoryStore, RecordFilter, Stage};

// Expose multiprogress and logging helpers to binaries.
pub use crate::progress::set_global_multiprogress;
pub use crate::util::{init_tracing_once, split_word_list, words_from_env};
