use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use indicatif::MultiProgress;
use socialmr::{
    init_tracing_once, load_path, set_global_multiprogress, words_from_env, write_csv, BingLexicon,
    LexiconMethod, SocialPipeline, TextCleaner, EMOTION_TOTALS_FILE,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Chunked parallel analytics over social-media record sets.
#[derive(Parser, Debug)]
#[command(name = "socialmr", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clean raw text (lowercase, strip URLs/mentions/punctuation) and write a CSV.
    Clean {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long, default_value = "tweets_cleaned.csv")]
        output: PathBuf,
        /// Also drop common English stopwords.
        #[arg(long)]
        stopwords: bool,
    },
    /// Word counts, daily sentiment, and user engagement tables.
    Run {
        #[command(flatten)]
        common: CommonArgs,
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
        /// Sentiment method: bing or afinn.
        #[arg(long, default_value = "bing")]
        lexicon: LexiconMethod,
    },
    /// Emotion category totals.
    Emotions {
        #[command(flatten)]
        common: CommonArgs,
        #[arg(short, long, default_value = EMOTION_TOTALS_FILE)]
        output: PathBuf,
    },
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// CSV/NDJSON file (optionally .zst) or a directory of them.
    #[arg(short, long)]
    input: PathBuf,
    /// Worker threads (default: available parallelism minus --reserve).
    #[arg(long)]
    workers: Option<usize>,
    #[arg(long, default_value_t = 1)]
    reserve: usize,
    /// Number of chunks (default: one per worker).
    #[arg(long)]
    chunks: Option<usize>,
    /// Read buffer per input file, in KiB.
    #[arg(long, default_value_t = 256)]
    read_buffer_kib: usize,
    /// Clean text before analysing (for raw inputs).
    #[arg(long)]
    clean: bool,
    #[arg(long)]
    progress: bool,
}

impl CommonArgs {
    fn pipeline(&self) -> SocialPipeline {
        let mut p = SocialPipeline::new()
            .reserve(self.reserve)
            .progress(self.progress)
            .io_read_buffer(self.read_buffer_kib * 1024);
        if let Some(n) = self.workers { p = p.workers(n); }
        if let Some(k) = self.chunks { p = p.chunks(k); }
        p
    }

    fn records(&self, pipeline: &SocialPipeline) -> Result<Vec<socialmr::Record>> {
        let recs = pipeline.load(&self.input)?;
        Ok(if self.clean { TextCleaner::new().clean_records(&recs) } else { recs })
    }
}

fn main() -> Result<()> {
    init_tracing_once();
    let cli = Cli::parse();

    match cli.command {
        Command::Clean { input, output, stopwords } => {
            let recs = load_path(&input)?;
            let cleaned = TextCleaner::new().with_stopwords(stopwords).clean_records(&recs);
            write_csv(&output, &cleaned, 256 * 1024)?;
            println!("Cleaned {} of {} records -> {}", cleaned.len(), recs.len(), output.display());
        }
        Command::Run { common, out_dir, lexicon } => {
            if common.progress {
                set_global_multiprogress(Arc::new(MultiProgress::new()));
            }
            let mut pipeline = common.pipeline().lexicon(lexicon);
            if lexicon == LexiconMethod::Bing {
                let mut bing = BingLexicon::default();
                bing.extend(words_from_env("SENTIMENT_EXTRA_POSITIVE"), words_from_env("SENTIMENT_EXTRA_NEGATIVE"));
                tracing::debug!(positive = bing.positive_len(), negative = bing.negative_len(), "bing lexicon");
                pipeline = pipeline.scorer(Arc::new(bing));
            }
            let records = common.records(&pipeline)?;
            let report = pipeline.run_all(&records, &out_dir)?;
            println!("Total records processed: {}", report.summary.total_records);
            println!("Unique users analysed:   {}", report.summary.unique_users);
            println!("Avg. likes per record:   {:.2}", report.summary.avg_likes_per_record);
            println!("Wrote {}", report.word_counts.display());
            println!("Wrote {}", report.daily_sentiment.display());
            println!("Wrote {}", report.user_stats.display());
        }
        Command::Emotions { common, output } => {
            let pipeline = common.pipeline();
            let records = common.records(&pipeline)?;
            let rows = pipeline.emotion_totals(&records)?;
            write_csv(&output, &rows, pipeline.options().write_buffer_bytes)?;
            for r in &rows {
                println!("{:<13} {}", r.emotion.as_str(), r.total);
            }
        }
    }
    Ok(())
}
